//! TOML configuration as a value source.
//!
//! Nested tables are flattened into flag names by joining keys with the
//! flag set's separator, so
//!
//! ```toml
//! [server]
//! max-connections = 64
//! ```
//!
//! sets flag `server.max-connections`. Scalars are rendered to text and handed
//! to the flag's adapter, which does the parsing. Arrays set the flag once per
//! element in order, which is how string lists accumulate.

use std::path::Path;

use toml::{Table, Value};
use tracing::debug;

use crate::error::FlagvarError;
use crate::registry::FlagSet;

/// Flatten `table` into `(flag name, texts)` pairs in key order.
pub fn flatten_table(
    table: &Table,
    separator: &str,
) -> Result<Vec<(String, Vec<String>)>, FlagvarError> {
    let mut out = Vec::new();
    flatten_into(table, "", separator, &mut out)?;
    Ok(out)
}

fn flatten_into(
    table: &Table,
    prefix: &str,
    separator: &str,
    out: &mut Vec<(String, Vec<String>)>,
) -> Result<(), FlagvarError> {
    for (key, value) in table {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{separator}{key}")
        };
        match value {
            Value::Table(sub) => flatten_into(sub, &name, separator, out)?,
            Value::Array(items) => {
                let texts = items
                    .iter()
                    .map(|item| text(&name, item))
                    .collect::<Result<Vec<_>, _>>()?;
                out.push((name, texts));
            }
            other => {
                let text = text(&name, other)?;
                out.push((name, vec![text]));
            }
        }
    }
    Ok(())
}

fn text(name: &str, value: &Value) -> Result<String, FlagvarError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Float(f) => Ok(f.to_string()),
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Datetime(d) => Ok(d.to_string()),
        Value::Array(_) | Value::Table(_) => Err(FlagvarError::InvalidArgument(format!(
            "'{name}': nested arrays and tables inside arrays are not supported"
        ))),
    }
}

impl FlagSet<'_> {
    /// Set flags from a parsed TOML table.
    ///
    /// In strict mode (the default) a key that names no flag fails with
    /// [`UnknownFlag`](FlagvarError::UnknownFlag) before any flag is set.
    /// Otherwise such keys are skipped.
    pub fn apply_table(&mut self, table: &Table) -> Result<(), FlagvarError> {
        let entries = flatten_table(table, &self.separator)?;
        if self.strict
            && let Some((name, _)) = entries.iter().find(|(name, _)| self.lookup(name).is_none())
        {
            return Err(FlagvarError::UnknownFlag(name.clone()));
        }
        for (name, texts) in entries {
            if self.lookup(&name).is_none() {
                debug!(key = %name, "skipping unknown configuration key");
                continue;
            }
            for text in texts {
                self.apply(&name, &text, "toml")?;
            }
        }
        Ok(())
    }

    /// Read and parse the TOML file at `path`, then [`apply_table`](Self::apply_table).
    pub fn apply_file(&mut self, path: impl AsRef<Path>) -> Result<(), FlagvarError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| FlagvarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table: Table = toml::from_str(&content).map_err(|source| FlagvarError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        self.apply_table(&table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::Binder;
    use crate::fixtures::test::Structure;
    use crate::list::StringList;
    use crate::registry::Registry;
    use crate::timestamp::{Timestamp, zero_timestamp};
    use chrono::{TimeZone, Utc};
    use std::fs;
    use tempfile::TempDir;

    fn table(src: &str) -> Table {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn flatten_joins_nested_keys() {
        let src = "a = 1\n[b]\nc = \"x\"\n[b.d]\ne = true\n";
        let entries = flatten_table(&table(src), "/").unwrap();
        assert_eq!(
            entries,
            vec![
                ("a".to_string(), vec!["1".to_string()]),
                ("b/c".into(), vec!["x".into()]),
                ("b/d/e".into(), vec!["true".into()]),
            ]
        );
    }

    #[test]
    fn flatten_rejects_tables_in_arrays() {
        let err = flatten_table(&table("a = [{ b = 1 }]\n"), ".").unwrap_err();
        assert!(matches!(err, FlagvarError::InvalidArgument(_)));
    }

    #[test]
    fn applies_scalars_and_nested_tables() {
        let mut s = Structure::default();
        let mut flags = FlagSet::new("test");
        Binder::new().recursive(true).bind(&mut flags, &mut s).unwrap();
        flags
            .apply_table(&table(
                "bool = true\nint64 = -5\nfloat64 = 2.5\nduration = \"1h30m\"\n\n[nested]\nmax-connections = 7\n",
            ))
            .unwrap();
        drop(flags);
        assert!(s.bool);
        assert_eq!(s.int64, -5);
        assert_eq!(s.float64, 2.5);
        assert_eq!(s.duration.as_secs(), 5400);
        assert_eq!(s.nested.max_connections, 7);
    }

    #[test]
    fn strict_rejects_unknown_key_before_setting_anything() {
        let mut s = Structure::default();
        let mut flags = FlagSet::new("test");
        Binder::new().bind(&mut flags, &mut s).unwrap();
        let err = flags
            .apply_table(&table("int8 = 1\ntypo = 2\n"))
            .unwrap_err();
        assert!(matches!(err, FlagvarError::UnknownFlag(ref name) if name == "typo"));
        drop(flags);
        assert_eq!(s.int8, 0);
    }

    #[test]
    fn lenient_skips_unknown_key() {
        let mut s = Structure::default();
        let mut flags = FlagSet::new("test").strict(false);
        Binder::new().bind(&mut flags, &mut s).unwrap();
        flags.apply_table(&table("int8 = 1\ntypo = 2\n")).unwrap();
        drop(flags);
        assert_eq!(s.int8, 1);
    }

    #[test]
    fn arrays_set_each_element() {
        let mut tags = Vec::new();
        let mut flags = FlagSet::new("test");
        flags
            .register(
                "tag".into(),
                String::new(),
                Box::new(StringList::repeated(&mut tags)),
            )
            .unwrap();
        flags.apply_table(&table("tag = [\"a\", \"b\"]\n")).unwrap();
        drop(flags);
        assert_eq!(tags, ["a", "b"]);
    }

    #[test]
    fn datetime_literals_reach_timestamps() {
        let mut started = zero_timestamp();
        let mut flags = FlagSet::new("test");
        flags
            .register(
                "started".into(),
                String::new(),
                Box::new(Timestamp::rfc3339(&mut started)),
            )
            .unwrap();
        flags
            .apply_table(&table("started = 2024-01-01T00:00:00Z\n"))
            .unwrap();
        drop(flags);
        assert_eq!(started, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn separator_follows_the_flag_set() {
        let mut s = Structure::default();
        let mut flags = FlagSet::new("test").with_separator("/");
        Binder::new()
            .recursive(true)
            .separator("/")
            .bind(&mut flags, &mut s)
            .unwrap();
        flags.apply_table(&table("[nested]\nstring = \"x\"\n")).unwrap();
        drop(flags);
        assert_eq!(s.nested.string, "x");
    }

    #[test]
    fn apply_file_reads_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.toml");
        fs::write(&path, "uint16 = 3000\n").unwrap();

        let mut s = Structure::default();
        let mut flags = FlagSet::new("test");
        Binder::new().bind(&mut flags, &mut s).unwrap();
        flags.apply_file(&path).unwrap();
        drop(flags);
        assert_eq!(s.uint16, 3000);
    }

    #[test]
    fn apply_file_missing_is_io_error() {
        let dir = TempDir::new().unwrap();
        let mut flags = FlagSet::new("test");
        let err = flags.apply_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, FlagvarError::Io { .. }));
    }

    #[test]
    fn apply_file_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "this is not [valid toml").unwrap();
        let mut flags = FlagSet::new("test");
        let err = flags.apply_file(&path).unwrap_err();
        assert!(matches!(err, FlagvarError::Toml { path: ref p, .. } if p == &path));
    }
}
