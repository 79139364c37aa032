use std::collections::HashMap;

use crate::error::FlagvarError;
use crate::registry::FlagSet;

/// Environment variable that sets flag `name` under `prefix`.
///
/// `-` and `_` become `_`, any other non-alphanumeric character (such as the
/// `.` separating nested names) becomes `__`, and the result is uppercased:
/// flag `server.max-connections` under prefix `MYAPP` reads
/// `MYAPP__SERVER__MAX_CONNECTIONS`.
pub fn env_key(prefix: &str, name: &str) -> String {
    let mut key = format!("{prefix}__");
    for c in name.chars() {
        match c {
            '-' | '_' => key.push('_'),
            c if c.is_alphanumeric() => key.extend(c.to_uppercase()),
            _ => key.push_str("__"),
        }
    }
    key
}

impl FlagSet<'_> {
    /// Set every flag whose [`env_key`] appears in `vars`.
    ///
    /// Takes an iterator so tests can pass synthetic data instead of
    /// `std::env::vars()`. Variables that name no flag are ignored.
    ///
    /// Flags differing only in `-` versus `_` (or in case) share a key. If
    /// such a key is present this fails with
    /// [`InvalidArgument`](FlagvarError::InvalidArgument) naming both flags,
    /// before any flag is set.
    pub fn apply_env(
        &mut self,
        prefix: &str,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), FlagvarError> {
        let needle = format!("{prefix}__");
        let vars: HashMap<String, String> = vars
            .into_iter()
            .filter(|(key, _)| key.starts_with(&needle))
            .collect();
        if vars.is_empty() {
            return Ok(());
        }

        let mut claimed: HashMap<String, &str> = HashMap::new();
        let mut matched = Vec::new();
        for flag in self.iter() {
            let key = env_key(prefix, flag.name());
            let Some(text) = vars.get(&key) else {
                continue;
            };
            if let Some(other) = claimed.insert(key.clone(), flag.name()) {
                return Err(FlagvarError::InvalidArgument(format!(
                    "{key} is ambiguous: it sets both '{other}' and '{}'",
                    flag.name()
                )));
            }
            matched.push((flag.name().to_string(), text.clone()));
        }
        for (name, text) in matched {
            self.apply(&name, &text, "env")?;
        }
        Ok(())
    }
}
