use std::fmt;

use crate::error::FlagvarError;
use crate::value::Value;

/// Adapter that appends to a `Vec<String>` on every `set`.
///
/// With a separator each value is split on it and every piece is appended, so
/// `--tag a,b --tag c` collects `["a", "b", "c"]`. Without one the whole text is
/// a single element.
pub struct StringList<'a> {
    slot: &'a mut Vec<String>,
    separator: String,
}

impl<'a> StringList<'a> {
    pub fn new(slot: &'a mut Vec<String>, separator: &str) -> Self {
        Self {
            slot,
            separator: separator.to_string(),
        }
    }

    /// A list that takes each value whole.
    pub fn repeated(slot: &'a mut Vec<String>) -> Self {
        Self::new(slot, "")
    }

    pub fn comma_separated(slot: &'a mut Vec<String>) -> Self {
        Self::new(slot, ",")
    }
}

impl Value for StringList<'_> {
    fn set(&mut self, text: &str) -> Result<(), FlagvarError> {
        if self.separator.is_empty() {
            self.slot.push(text.to_string());
        } else {
            self.slot
                .extend(text.split(self.separator.as_str()).map(str::to_string));
        }
        Ok(())
    }
}

impl fmt::Display for StringList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.separator.is_empty() {
            write!(f, "{:?}", self.slot)
        } else {
            f.write_str(&self.slot.join(&self.separator))
        }
    }
}
