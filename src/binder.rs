//! Walks a record's fields and registers an adapter for each one.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::debug;

use crate::case::lisp_case;
use crate::error::FlagvarError;
use crate::field::{Bindable, Field, Slot};
use crate::options::BindOptions;
use crate::registry::Registry;
use crate::timestamp::Timestamp;
use crate::value::{DurationValue, TimeDeltaValue, Value};

/// Builds an adapter for one exact field type.
trait Factory {
    fn make<'a>(&self, any: &'a mut dyn Any) -> Option<Box<dyn Value + 'a>>;
}

struct TypedFactory<T> {
    make: for<'a> fn(&'a mut T) -> Box<dyn Value + 'a>,
}

impl<T: Any> Factory for TypedFactory<T> {
    fn make<'a>(&self, any: &'a mut dyn Any) -> Option<Box<dyn Value + 'a>> {
        any.downcast_mut::<T>().map(self.make)
    }
}

/// Binds record fields to flags in a [`Registry`].
///
/// An adapter is resolved for each field in two steps: first by the field's
/// exact type in the override table, then by the field's kind (bool, each
/// integer and float width, `String`). [`Binder::new`] installs overrides for
/// `std::time::Duration`, `chrono::TimeDelta` and `chrono::DateTime<Utc>`
/// (RFC 3339); [`Binder::with_type`] adds or replaces one.
///
/// ```
/// use flagvar::{Binder, FlagSet};
/// # use flagvar::{BindField, Bindable, Field};
/// # #[derive(Default)]
/// # struct Config { port: u16 }
/// # impl Bindable for Config {
/// #     fn fields(&mut self) -> Vec<Field<'_>> { vec![Field::new("port", self.port.slot())] }
/// # }
///
/// let mut config = Config::default();
/// let mut flags = FlagSet::new("app");
/// Binder::new().bind(&mut flags, &mut config).unwrap();
/// flags.set("port", "8080").unwrap();
/// drop(flags);
/// assert_eq!(config.port, 8080);
/// ```
pub struct Binder {
    options: BindOptions,
    overrides: HashMap<TypeId, Box<dyn Factory>>,
}

impl Default for Binder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder {
    pub fn new() -> Self {
        Self::with_options(BindOptions::default())
    }

    pub fn with_options(options: BindOptions) -> Self {
        Self {
            options,
            overrides: HashMap::new(),
        }
        .with_type::<Duration>(|v| Box::new(DurationValue::new(v)))
        .with_type::<TimeDelta>(|v| Box::new(TimeDeltaValue::new(v)))
        .with_type::<DateTime<Utc>>(|v| Box::new(Timestamp::rfc3339(v)))
    }

    pub fn lisp_case(mut self, enabled: bool) -> Self {
        self.options = self.options.lisp_case(enabled);
        self
    }

    pub fn recursive(mut self, enabled: bool) -> Self {
        self.options = self.options.recursive(enabled);
        self
    }

    pub fn separator(mut self, separator: &str) -> Self {
        self.options = self.options.separator(separator);
        self
    }

    /// Use `make` to build the adapter for every field of exact type `T`,
    /// ahead of the kind table.
    pub fn with_type<T: Any>(mut self, make: for<'a> fn(&'a mut T) -> Box<dyn Value + 'a>) -> Self {
        self.overrides
            .insert(TypeId::of::<T>(), Box::new(TypedFactory { make }));
        self
    }

    pub fn options(&self) -> &BindOptions {
        &self.options
    }

    /// Register an adapter in `registry` for every settable field of `record`.
    ///
    /// Fields are visited depth first in declaration order. A name already in
    /// the registry fails the whole pass with
    /// [`DuplicateName`](FlagvarError::DuplicateName); flags registered before
    /// the failure stay registered. Fields with no adapter are skipped.
    pub fn bind<'a, R, B>(&self, registry: &mut R, record: &'a mut B) -> Result<(), FlagvarError>
    where
        R: Registry<'a> + ?Sized,
        B: Bindable + ?Sized,
    {
        self.bind_record(registry, "", record)
    }

    fn bind_record<'a, R, B>(
        &self,
        registry: &mut R,
        parent: &str,
        record: &'a mut B,
    ) -> Result<(), FlagvarError>
    where
        R: Registry<'a> + ?Sized,
        B: Bindable + ?Sized,
    {
        let record_type = record.type_name();
        for field in record.fields() {
            let Field {
                ident,
                rename,
                usage,
                settable,
                slot,
            } = field;
            if !settable {
                debug!(record = record_type, field = ident, "skipping unsettable field");
                continue;
            }

            let local = match rename {
                Some(name) => name.to_string(),
                None if self.options.is_lisp_case() => lisp_case(ident),
                None => ident.to_string(),
            };
            if local.is_empty() {
                return Err(FlagvarError::Field {
                    record: record_type,
                    field: ident,
                    source: Box::new(FlagvarError::InvalidArgument("empty flag name".into())),
                });
            }
            let name = self.options.join(parent, &local);

            match slot {
                Slot::Record(nested) if self.options.is_recursive() => {
                    self.bind_record(registry, &name, nested)?;
                }
                slot => {
                    let kind = slot.kind();
                    let Some(value) = self.resolve(slot) else {
                        debug!(flag = %name, kind, "skipping field with no adapter");
                        continue;
                    };
                    register(registry, name, usage, value).map_err(|source| {
                        FlagvarError::Field {
                            record: record_type,
                            field: ident,
                            source: Box::new(source),
                        }
                    })?;
                }
            }
        }
        Ok(())
    }

    fn resolve<'a>(&self, slot: Slot<'a>) -> Option<Box<dyn Value + 'a>> {
        let factory = slot.type_id().and_then(|id| self.overrides.get(&id));
        match factory {
            Some(factory) => match slot.into_any() {
                Ok(any) => factory.make(any),
                Err(slot) => slot.into_value(),
            },
            None => slot.into_value(),
        }
    }
}

fn register<'a, R>(
    registry: &mut R,
    name: String,
    usage: &str,
    value: Box<dyn Value + 'a>,
) -> Result<(), FlagvarError>
where
    R: Registry<'a> + ?Sized,
{
    if registry.contains(&name) {
        return Err(FlagvarError::DuplicateName { name });
    }
    debug!(flag = %name, "registering flag");
    registry.register(name, usage.to_string(), value)
}

/// Bind `record` into `registry` with `options` and the default type
/// overrides. See [`Binder::bind`].
pub fn bind<'a, R, B>(
    registry: &mut R,
    record: &'a mut B,
    options: &BindOptions,
) -> Result<(), FlagvarError>
where
    R: Registry<'a> + ?Sized,
    B: Bindable + ?Sized,
{
    Binder::with_options(options.clone()).bind(registry, record)
}
