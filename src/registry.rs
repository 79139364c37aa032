//! The flag registry the binder registers adapters with, and [`FlagSet`], the
//! registry this crate ships.

use std::collections::HashMap;

use tracing::trace;

use crate::error::FlagvarError;
use crate::value::Value;

/// A name to adapter store that rejects duplicate names.
///
/// `'a` is the lifetime of the record the adapters point into.
pub trait Registry<'a> {
    fn contains(&self, name: &str) -> bool;

    /// Store `value` under `name`. Fails with
    /// [`DuplicateName`](FlagvarError::DuplicateName) if the name is taken.
    fn register(
        &mut self,
        name: String,
        usage: String,
        value: Box<dyn Value + 'a>,
    ) -> Result<(), FlagvarError>;
}

/// A registered flag.
pub struct Flag<'a> {
    name: String,
    usage: String,
    default_text: String,
    set: bool,
    value: Box<dyn Value + 'a>,
}

impl<'a> Flag<'a> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The value's text when the flag was registered.
    pub fn default_text(&self) -> &str {
        &self.default_text
    }

    /// Whether any source has set the flag since registration.
    pub fn is_set(&self) -> bool {
        self.set
    }

    pub fn value(&self) -> &(dyn Value + 'a) {
        &*self.value
    }
}

/// Ordered set of named flags, each bound to a variable through its adapter.
///
/// Values reach the flags from TOML tables ([`apply_table`](Self::apply_table),
/// [`apply_file`](Self::apply_file)), environment variables
/// ([`apply_env`](Self::apply_env)) and command-line arguments
/// ([`parse`](Self::parse), with the `clap` feature). Sources are applied in
/// call order, so later ones override earlier ones.
pub struct FlagSet<'a> {
    name: String,
    flags: Vec<Flag<'a>>,
    index: HashMap<String, usize>,
    pub(crate) separator: String,
    pub(crate) strict: bool,
}

impl<'a> FlagSet<'a> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flags: Vec::new(),
            index: HashMap::new(),
            separator: ".".to_string(),
            strict: true,
        }
    }

    /// Separator used to join nested TOML keys into flag names. Match the
    /// binder's separator (default: `"."`).
    pub fn with_separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    /// Reject keys that name no flag when applying TOML (default: `true`).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<&Flag<'a>> {
        self.index.get(name).map(|&i| &self.flags[i])
    }

    /// Flags in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Flag<'a>> {
        self.flags.iter()
    }

    /// Every flag's name and current value.
    pub fn listing(&self) -> Vec<(String, String)> {
        self.flags
            .iter()
            .map(|f| (f.name.clone(), f.value.to_string()))
            .collect()
    }

    /// Set a flag from text.
    pub fn set(&mut self, name: &str, text: &str) -> Result<(), FlagvarError> {
        self.apply(name, text, "api")
    }

    /// Set a flag from text, tagging the trace event with where the text came
    /// from.
    pub(crate) fn apply(
        &mut self,
        name: &str,
        text: &str,
        source: &'static str,
    ) -> Result<(), FlagvarError> {
        let &i = self
            .index
            .get(name)
            .ok_or_else(|| FlagvarError::UnknownFlag(name.to_string()))?;
        let flag = &mut self.flags[i];
        flag.value
            .set(text)
            .map_err(|source| FlagvarError::InvalidValue {
                name: name.to_string(),
                source: Box::new(source),
            })?;
        flag.set = true;
        trace!(flag = name, value = text, source, "flag set");
        Ok(())
    }
}

impl<'a> Registry<'a> for FlagSet<'a> {
    fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn register(
        &mut self,
        name: String,
        usage: String,
        value: Box<dyn Value + 'a>,
    ) -> Result<(), FlagvarError> {
        if self.contains(&name) {
            return Err(FlagvarError::DuplicateName { name });
        }
        self.index.insert(name.clone(), self.flags.len());
        self.flags.push(Flag {
            default_text: value.to_string(),
            name,
            usage,
            set: false,
            value,
        });
        Ok(())
    }
}
