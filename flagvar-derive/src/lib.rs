//! Derive macro for `flagvar::Bindable`.
//!
//! ```ignore
//! #[derive(Default, Bindable)]
//! pub struct Config {
//!     /// Address to listen on.
//!     pub listen_addr: String,
//!
//!     #[flagvar(nested)]
//!     pub database: Database,
//!
//!     #[flagvar(rename = "v", usage = "Verbosity level")]
//!     pub verbosity: u8,
//!
//!     #[flagvar(with = parse_level)]
//!     pub level: Level,
//!
//!     #[flagvar(skip)]
//!     pub cache: Vec<u8>,
//!
//!     token: String, // private: never bound
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{
    Attribute, Data, DeriveInput, Expr, ExprPath, Field, Fields, Lit, LitStr, Meta, Token,
    Visibility, parse_macro_input,
};

/// Implement `flagvar::Bindable` for a struct with named fields.
///
/// Fields are listed in declaration order. `///` doc comments become usage
/// text. Fields that are not `pub` are listed as unsettable.
///
/// Field attributes, inside `#[flagvar(...)]`:
///
/// - `skip`: leave the field out.
/// - `nested`: the field is itself `Bindable`; bind its fields under this
///   field's name when recursion is on.
/// - `rename = "name"`: use `name` verbatim as the flag's local name.
/// - `usage = "text"`: usage text, instead of the doc comment.
/// - `with = path`: build the adapter with `path(&mut field)`, a function
///   returning an `impl flagvar::Value`.
#[proc_macro_derive(Bindable, attributes(flagvar))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unit => {
                return Ok(impl_bindable(&input, Vec::new()));
            }
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Bindable can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Bindable can only be derived for structs",
            ));
        }
    };

    let mut entries = Vec::new();
    for field in fields {
        if let Some(entry) = field_entry(field)? {
            entries.push(entry);
        }
    }
    Ok(impl_bindable(&input, entries))
}

fn impl_bindable(input: &DeriveInput, entries: Vec<TokenStream2>) -> TokenStream2 {
    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        impl #impl_generics ::flagvar::Bindable for #name #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::flagvar::Field<'_>> {
                ::std::vec![#(#entries),*]
            }

            fn type_name(&self) -> &'static str {
                #name_str
            }
        }
    }
}

/// Field-level `#[flagvar(...)]` settings.
#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    nested: bool,
    rename: Option<LitStr>,
    usage: Option<LitStr>,
    with: Option<ExprPath>,
}

fn parse_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("flagvar") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                out.skip = true;
            } else if meta.path.is_ident("nested") {
                out.nested = true;
            } else if meta.path.is_ident("rename") {
                meta.input.parse::<Token![=]>()?;
                out.rename = Some(meta.input.parse()?);
            } else if meta.path.is_ident("usage") {
                meta.input.parse::<Token![=]>()?;
                out.usage = Some(meta.input.parse()?);
            } else if meta.path.is_ident("with") {
                meta.input.parse::<Token![=]>()?;
                out.with = Some(meta.input.parse()?);
            } else {
                return Err(meta.error("unknown flagvar attribute"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

fn field_entry(field: &Field) -> syn::Result<Option<TokenStream2>> {
    let attrs = parse_attrs(&field.attrs)?;
    if attrs.skip {
        return Ok(None);
    }
    let Some(ident) = field.ident.as_ref() else {
        return Err(syn::Error::new_spanned(field, "expected a named field"));
    };
    let ident_str = ident.unraw().to_string();

    if !matches!(field.vis, Visibility::Public(_)) {
        return Ok(Some(quote! { ::flagvar::Field::unsettable(#ident_str) }));
    }
    if attrs.nested && attrs.with.is_some() {
        return Err(syn::Error::new_spanned(
            ident,
            "`nested` and `with` cannot be combined",
        ));
    }

    let slot = if attrs.nested {
        quote! { ::flagvar::Slot::Record(&mut self.#ident) }
    } else if let Some(with) = &attrs.with {
        quote! { ::flagvar::Slot::Value(::std::boxed::Box::new(#with(&mut self.#ident))) }
    } else {
        quote! { ::flagvar::BindField::slot(&mut self.#ident) }
    };

    let usage = match attrs.usage {
        Some(usage) => usage.value(),
        None => doc_comment(&field.attrs),
    };
    let rename = attrs.rename.map(|name| quote! { .rename(#name) });

    Ok(Some(quote! {
        ::flagvar::Field::new(#ident_str, #slot).usage(#usage) #rename
    }))
}

/// Doc comment lines joined with spaces.
fn doc_comment(attrs: &[Attribute]) -> String {
    let lines: Vec<String> = attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let Meta::NameValue(nv) = &attr.meta
                && let Expr::Lit(lit) = &nv.value
                && let Lit::Str(s) = &lit.lit
            {
                return Some(s.value().trim().to_string());
            }
            None
        })
        .filter(|line| !line.is_empty())
        .collect();
    lines.join(" ")
}
