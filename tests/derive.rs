#![cfg(feature = "derive")]

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use flagvar::{BindOptions, Bindable, FlagSet, FlagvarError, OneOf, Slot, bind};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mode {
    Fast,
    Safe,
}

fn mode(slot: &mut Mode) -> OneOf<'_, Mode> {
    OneOf::new(slot, [("fast", Mode::Fast), ("safe", Mode::Safe)])
}

#[derive(Debug, Default, Bindable)]
pub struct Database {
    /// Connection URL.
    pub url: String,
    /// Pool size.
    pub pool_size: u32,
}

#[derive(Debug, Bindable)]
pub struct Config {
    /// Port to listen on.
    ///
    /// Defaults to 8080.
    pub port: u16,

    #[flagvar(usage = "Request timeout")]
    pub timeout: Duration,

    pub started: DateTime<Utc>,

    #[flagvar(rename = "V")]
    pub verbose: bool,

    #[flagvar(with = mode)]
    pub mode: Mode,

    #[flagvar(nested)]
    pub database: Database,

    #[flagvar(skip)]
    pub skipped: u8,

    pub tags: Vec<String>,

    pub r#type: String,

    hidden: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            timeout: Duration::from_secs(5),
            started: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            verbose: false,
            mode: Mode::Safe,
            database: Database::default(),
            skipped: 0,
            tags: Vec::new(),
            r#type: String::new(),
            hidden: String::new(),
        }
    }
}

#[test]
fn derive_lists_fields_in_declaration_order() {
    let mut config = Config::default();
    let fields = config.fields();
    let idents: Vec<_> = fields.iter().map(|f| f.ident()).collect();
    assert_eq!(
        idents,
        [
            "port", "timeout", "started", "verbose", "mode", "database", "tags", "type", "hidden"
        ]
    );
    assert!(!fields.last().unwrap().is_settable());
    assert!(matches!(fields[5].slot(), Slot::Record(_)));
}

#[test]
fn derive_names_the_record_type() {
    let config = Config::default();
    assert_eq!(config.type_name(), "Config");
}

#[test]
fn derived_records_bind_recursively() {
    let mut config = Config::default();
    let mut flags = FlagSet::new("test");
    bind(&mut flags, &mut config, &BindOptions::default().recursive(true)).unwrap();

    let names: Vec<_> = flags.iter().map(|f| f.name().to_string()).collect();
    assert_eq!(
        names,
        [
            "port",
            "timeout",
            "started",
            "V",
            "mode",
            "database.url",
            "database.pool-size",
            "type",
        ]
    );
    assert_eq!(
        flags.lookup("port").unwrap().usage(),
        "Port to listen on. Defaults to 8080."
    );
    assert_eq!(flags.lookup("timeout").unwrap().usage(), "Request timeout");
    assert_eq!(flags.lookup("started").unwrap().usage(), "");
    assert_eq!(flags.lookup("timeout").unwrap().default_text(), "5s");
    assert_eq!(
        flags.lookup("started").unwrap().default_text(),
        "2024-01-01T00:00:00Z"
    );
    assert_eq!(flags.lookup("mode").unwrap().default_text(), "safe");
}

#[test]
fn derived_fields_write_through() {
    let mut config = Config::default();
    let mut flags = FlagSet::new("test");
    bind(&mut flags, &mut config, &BindOptions::default().recursive(true)).unwrap();
    flags.set("port", "9090").unwrap();
    flags.set("timeout", "1m30s").unwrap();
    flags.set("started", "2025-06-01T12:30:00+02:00").unwrap();
    flags.set("V", "true").unwrap();
    flags.set("mode", "fast").unwrap();
    flags.set("database.pool-size", "16").unwrap();
    flags.set("type", "primary").unwrap();
    drop(flags);

    assert_eq!(config.port, 9090);
    assert_eq!(config.timeout, Duration::from_secs(90));
    assert_eq!(
        config.started,
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 30, 0).unwrap()
    );
    assert!(config.verbose);
    assert_eq!(config.mode, Mode::Fast);
    assert_eq!(config.database.pool_size, 16);
    assert_eq!(config.r#type, "primary");
    assert!(config.hidden.is_empty());
}

#[test]
fn one_of_rejects_unknown_choice() {
    let mut config = Config::default();
    let mut flags = FlagSet::new("test");
    bind(&mut flags, &mut config, &BindOptions::default()).unwrap();
    let err = flags.set("mode", "reckless").unwrap_err();
    match err.root() {
        FlagvarError::InvalidChoice { value, choices } => {
            assert_eq!(value, "reckless");
            assert_eq!(choices, &["fast", "safe"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[derive(Default, Bindable)]
pub struct Colliding {
    pub max_size: u8,
    #[flagvar(rename = "max-size")]
    pub other: u8,
}

#[test]
fn rename_collisions_are_duplicates() {
    let mut c = Colliding::default();
    let mut flags = FlagSet::new("test");
    let err = bind(&mut flags, &mut c, &BindOptions::default()).unwrap_err();
    assert!(matches!(err.root(), FlagvarError::DuplicateName { name } if name == "max-size"));
    assert!(err.to_string().contains("Colliding"));
}

#[derive(Default, Bindable)]
pub struct Empty;

#[test]
fn unit_structs_have_no_fields() {
    let mut e = Empty;
    assert!(e.fields().is_empty());
}
