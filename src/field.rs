//! Field descriptors: how a record describes itself to the binder.
//!
//! There is no runtime reflection, so a record lists its fields explicitly by
//! implementing [`Bindable`], usually through `#[derive(Bindable)]`. Each
//! [`Field`] carries the field's identifier, its usage text and a [`Slot`]: an
//! exclusive reference into the record tagged with the field's kind.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::value::{Scalar, Value};

/// A record whose fields can be bound to flags.
///
/// ```
/// use flagvar::{BindField, Bindable, Field};
///
/// struct Server {
///     host: String,
///     port: u16,
/// }
///
/// impl Bindable for Server {
///     fn fields(&mut self) -> Vec<Field<'_>> {
///         vec![
///             Field::new("host", self.host.slot()).usage("Host to bind"),
///             Field::new("port", self.port.slot()),
///         ]
///     }
/// }
/// ```
pub trait Bindable {
    /// The record's fields in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;

    /// Name of the record type, used in error context.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// One field of a [`Bindable`] record.
pub struct Field<'a> {
    pub(crate) ident: &'static str,
    pub(crate) rename: Option<&'static str>,
    pub(crate) usage: &'static str,
    pub(crate) settable: bool,
    pub(crate) slot: Slot<'a>,
}

impl<'a> Field<'a> {
    pub fn new(ident: &'static str, slot: Slot<'a>) -> Self {
        Self {
            ident,
            rename: None,
            usage: "",
            settable: true,
            slot,
        }
    }

    /// A field the binder must skip, such as a private one.
    pub fn unsettable(ident: &'static str) -> Self {
        Self {
            settable: false,
            ..Self::new(ident, Slot::Unsupported("unsettable"))
        }
    }

    pub fn usage(mut self, usage: &'static str) -> Self {
        self.usage = usage;
        self
    }

    /// Use `name` verbatim as the field's local flag name instead of deriving
    /// one from the identifier.
    pub fn rename(mut self, name: &'static str) -> Self {
        self.rename = Some(name);
        self
    }

    pub fn ident(&self) -> &'static str {
        self.ident
    }

    pub fn is_settable(&self) -> bool {
        self.settable
    }

    pub fn slot(&self) -> &Slot<'a> {
        &self.slot
    }
}

/// An exclusive reference to a field, tagged with the field's kind.
pub enum Slot<'a> {
    Bool(&'a mut bool),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    F32(&'a mut f32),
    F64(&'a mut f64),
    Str(&'a mut String),
    /// A type only a registered exact-type adapter can handle.
    Other(&'a mut dyn Any),
    /// A nested record, descended into when recursion is enabled.
    Record(&'a mut dyn Bindable),
    /// An adapter the field supplies itself.
    Value(Box<dyn Value + 'a>),
    /// A type with no adapter, such as a collection. Carries the type name.
    Unsupported(&'static str),
}

impl<'a> Slot<'a> {
    /// Exact type of the referenced variable, if the slot references one.
    pub fn type_id(&self) -> Option<TypeId> {
        let id = match self {
            Slot::Bool(_) => TypeId::of::<bool>(),
            Slot::I8(_) => TypeId::of::<i8>(),
            Slot::I16(_) => TypeId::of::<i16>(),
            Slot::I32(_) => TypeId::of::<i32>(),
            Slot::I64(_) => TypeId::of::<i64>(),
            Slot::Isize(_) => TypeId::of::<isize>(),
            Slot::U8(_) => TypeId::of::<u8>(),
            Slot::U16(_) => TypeId::of::<u16>(),
            Slot::U32(_) => TypeId::of::<u32>(),
            Slot::U64(_) => TypeId::of::<u64>(),
            Slot::Usize(_) => TypeId::of::<usize>(),
            Slot::F32(_) => TypeId::of::<f32>(),
            Slot::F64(_) => TypeId::of::<f64>(),
            Slot::Str(_) => TypeId::of::<String>(),
            Slot::Other(v) => (**v).type_id(),
            Slot::Record(_) | Slot::Value(_) | Slot::Unsupported(_) => return None,
        };
        Some(id)
    }

    /// The referenced variable as `Any`, or the slot back if it has none.
    pub fn into_any(self) -> Result<&'a mut dyn Any, Self> {
        let any: &'a mut dyn Any = match self {
            Slot::Bool(v) => v,
            Slot::I8(v) => v,
            Slot::I16(v) => v,
            Slot::I32(v) => v,
            Slot::I64(v) => v,
            Slot::Isize(v) => v,
            Slot::U8(v) => v,
            Slot::U16(v) => v,
            Slot::U32(v) => v,
            Slot::U64(v) => v,
            Slot::Usize(v) => v,
            Slot::F32(v) => v,
            Slot::F64(v) => v,
            Slot::Str(v) => v,
            Slot::Other(v) => v,
            other => return Err(other),
        };
        Ok(any)
    }

    /// Adapter chosen by the slot's kind, if the kind has one.
    pub fn into_value(self) -> Option<Box<dyn Value + 'a>> {
        let value: Box<dyn Value + 'a> = match self {
            Slot::Bool(v) => Box::new(Scalar::new(v)),
            Slot::I8(v) => Box::new(Scalar::new(v)),
            Slot::I16(v) => Box::new(Scalar::new(v)),
            Slot::I32(v) => Box::new(Scalar::new(v)),
            Slot::I64(v) => Box::new(Scalar::new(v)),
            Slot::Isize(v) => Box::new(Scalar::new(v)),
            Slot::U8(v) => Box::new(Scalar::new(v)),
            Slot::U16(v) => Box::new(Scalar::new(v)),
            Slot::U32(v) => Box::new(Scalar::new(v)),
            Slot::U64(v) => Box::new(Scalar::new(v)),
            Slot::Usize(v) => Box::new(Scalar::new(v)),
            Slot::F32(v) => Box::new(Scalar::new(v)),
            Slot::F64(v) => Box::new(Scalar::new(v)),
            Slot::Str(v) => Box::new(Scalar::new(v)),
            Slot::Value(v) => v,
            Slot::Other(_) | Slot::Record(_) | Slot::Unsupported(_) => return None,
        };
        Some(value)
    }

    /// Short description of the slot's kind for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Slot::Bool(_) => "bool",
            Slot::I8(_) => "i8",
            Slot::I16(_) => "i16",
            Slot::I32(_) => "i32",
            Slot::I64(_) => "i64",
            Slot::Isize(_) => "isize",
            Slot::U8(_) => "u8",
            Slot::U16(_) => "u16",
            Slot::U32(_) => "u32",
            Slot::U64(_) => "u64",
            Slot::Usize(_) => "usize",
            Slot::F32(_) => "f32",
            Slot::F64(_) => "f64",
            Slot::Str(_) => "String",
            Slot::Other(_) => "other",
            Slot::Record(_) => "record",
            Slot::Value(_) => "value",
            Slot::Unsupported(name) => *name,
        }
    }
}

/// Field types the binder knows how to reference.
pub trait BindField {
    fn slot(&mut self) -> Slot<'_>;
}

macro_rules! bind_kinds {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl BindField for $ty {
                fn slot(&mut self) -> Slot<'_> {
                    Slot::$variant(self)
                }
            }
        )*
    };
}

bind_kinds!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    String => Str,
    Duration => Other,
    TimeDelta => Other,
    DateTime<Utc> => Other,
);

macro_rules! unsupported {
    ($([$($gen:tt)*] $ty:ty),* $(,)?) => {
        $(
            impl<$($gen)*> BindField for $ty {
                fn slot(&mut self) -> Slot<'_> {
                    Slot::Unsupported(std::any::type_name::<Self>())
                }
            }
        )*
    };
}

unsupported!(
    [T] Vec<T>,
    [T] VecDeque<T>,
    [T] HashSet<T>,
    [T] BTreeSet<T>,
    [K, V] HashMap<K, V>,
    [K, V] BTreeMap<K, V>,
    [T, const N: usize] [T; N],
);
