use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::FlagvarError;
use crate::value::Value;

/// Fixed mapping from choice keys to values. Keys iterate in sorted order.
pub type Mapping<T> = BTreeMap<String, T>;

/// Adapter restricting a variable to a closed set of named values.
///
/// The mapping is fixed at construction. Its values share the variable's
/// type, so a mismatched mapping does not compile.
///
/// Formatting renders the first key (in sorted order) whose value equals the
/// variable. A value outside the mapping renders with its `Debug` form.
///
/// ```
/// use flagvar::{OneOf, Value};
///
/// #[derive(Debug, Clone, PartialEq)]
/// enum Level { Quiet, Loud }
///
/// let mut level = Level::Quiet;
/// let mut value = OneOf::new(&mut level, [("quiet", Level::Quiet), ("loud", Level::Loud)]);
/// value.set("loud").unwrap();
/// assert_eq!(value.to_string(), "loud");
/// ```
pub struct OneOf<'a, T> {
    slot: &'a mut T,
    mapping: Mapping<T>,
}

impl<'a, T> OneOf<'a, T>
where
    T: Clone + PartialEq + fmt::Debug + 'static,
{
    pub fn new<K, I>(slot: &'a mut T, choices: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, T)>,
    {
        Self {
            slot,
            mapping: choices.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn mapping(&self) -> &Mapping<T> {
        &self.mapping
    }

    /// The valid keys, sorted.
    pub fn choices(&self) -> Vec<String> {
        self.mapping.keys().cloned().collect()
    }
}

impl<T> Value for OneOf<'_, T>
where
    T: Clone + PartialEq + fmt::Debug + 'static,
{
    fn set(&mut self, text: &str) -> Result<(), FlagvarError> {
        match self.mapping.get(text) {
            Some(value) => {
                *self.slot = value.clone();
                Ok(())
            }
            None => Err(FlagvarError::InvalidChoice {
                value: text.to_string(),
                choices: self.choices(),
            }),
        }
    }

    fn get(&self) -> Option<&dyn Any> {
        Some(&*self.slot)
    }
}

impl<T> fmt::Display for OneOf<'_, T>
where
    T: Clone + PartialEq + fmt::Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mapping.iter().find(|(_, v)| *v == &*self.slot) {
            Some((key, _)) => f.write_str(key),
            None => write!(f, "{:?}", self.slot),
        }
    }
}
