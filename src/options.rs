/// Controls how the binder names flags and whether it descends into nested
/// records.
///
/// ```
/// use flagvar::BindOptions;
///
/// let options = BindOptions::default().recursive(true).separator("-");
/// assert!(options.is_lisp_case());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindOptions {
    lisp_case: bool,
    recursive: bool,
    separator: String,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            lisp_case: true,
            recursive: false,
            separator: ".".to_string(),
        }
    }
}

impl BindOptions {
    /// Derive flag names from field identifiers with [`lisp_case`](crate::lisp_case)
    /// (default: `true`). When off, identifiers are used as written.
    pub fn lisp_case(mut self, enabled: bool) -> Self {
        self.lisp_case = enabled;
        self
    }

    /// Descend into nested record fields instead of skipping them
    /// (default: `false`).
    pub fn recursive(mut self, enabled: bool) -> Self {
        self.recursive = enabled;
        self
    }

    /// String joining a nested field's name to its parent's (default: `"."`).
    pub fn separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    pub fn is_lisp_case(&self) -> bool {
        self.lisp_case
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    pub fn get_separator(&self) -> &str {
        &self.separator
    }

    /// Compose a field's external name from its parent's.
    pub(crate) fn join(&self, parent: &str, local: &str) -> String {
        if parent.is_empty() {
            local.to_string()
        } else {
            format!("{parent}{}{local}", self.separator)
        }
    }
}
