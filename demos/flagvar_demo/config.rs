//! Configuration structs for the flagvar demo application.
//!
//! The root [`DemoConfig`] nests two records, [`ServerConfig`] and
//! [`DisplayConfig`], to show recursive binding and dotted flag names.
//!
//! # Env var mapping
//!
//! With the prefix `FLAGVAR_DEMO`, environment variables map to flags via
//! double-underscore separators:
//!
//! | Env var                                  | Flag                     |
//! |------------------------------------------|--------------------------|
//! | `FLAGVAR_DEMO__NAME`                     | `name`                   |
//! | `FLAGVAR_DEMO__VERBOSE`                  | `verbose`                |
//! | `FLAGVAR_DEMO__SERVER__HOST`             | `server.host`            |
//! | `FLAGVAR_DEMO__SERVER__PORT`             | `server.port`            |
//! | `FLAGVAR_DEMO__SERVER__MAX_CONNECTIONS`  | `server.max-connections` |
//! | `FLAGVAR_DEMO__SERVER__TIMEOUT`          | `server.timeout`         |
//! | `FLAGVAR_DEMO__DISPLAY__COLOR`           | `display.color`          |
//! | `FLAGVAR_DEMO__DISPLAY__TAGS`            | `display.tags`           |

use std::time::Duration;

use chrono::{DateTime, Utc};
use flagvar::{Bindable, OneOf, StringList};

/// Root configuration for the demo application.
#[derive(Bindable, Debug)]
pub struct DemoConfig {
    /// Application name shown in the echo banner.
    pub name: String,

    /// Enable verbose output.
    pub verbose: bool,

    /// Start of the reporting window, shown above the listing (RFC 3339).
    pub since: DateTime<Utc>,

    #[flagvar(nested)]
    pub server: ServerConfig,

    #[flagvar(nested)]
    pub display: DisplayConfig,

    /// Never bound: private fields are unsettable.
    #[allow(dead_code)]
    launches: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            name: "flagvar-demo".into(),
            verbose: false,
            since: flagvar::zero_timestamp(),
            server: ServerConfig::default(),
            display: DisplayConfig::default(),
            launches: 0,
        }
    }
}

/// Server-related configuration, under `server.*`.
#[derive(Bindable, Debug)]
pub struct ServerConfig {
    /// Hostname to bind to.
    pub host: String,

    /// Port number.
    pub port: u16,

    /// Maximum number of allowed connections.
    pub max_connections: u32,

    /// Idle timeout, e.g. `30s` or `1m30s`.
    pub timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
            max_connections: 100,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Terminal colors the echo command supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    pub fn ansi(self) -> &'static str {
        match self {
            Color::Red => "\x1b[31m",
            Color::Green => "\x1b[32m",
            Color::Yellow => "\x1b[33m",
            Color::Blue => "\x1b[34m",
        }
    }
}

pub fn color(slot: &mut Color) -> OneOf<'_, Color> {
    OneOf::new(
        slot,
        [
            ("red", Color::Red),
            ("green", Color::Green),
            ("yellow", Color::Yellow),
            ("blue", Color::Blue),
        ],
    )
}

pub fn tags(slot: &mut Vec<String>) -> StringList<'_> {
    StringList::comma_separated(slot)
}

/// Display settings, under `display.*`.
#[derive(Bindable, Debug)]
pub struct DisplayConfig {
    /// Terminal color for the echo output.
    #[flagvar(with = color)]
    pub color: Color,

    /// Labels printed after the banner; repeat or comma-separate.
    #[flagvar(with = tags)]
    pub tags: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: Color::Yellow,
            tags: Vec::new(),
        }
    }
}
