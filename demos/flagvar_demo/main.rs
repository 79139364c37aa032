//! # flagvar demo application
//!
//! A sample CLI tool that binds a nested config struct to flags and fills it
//! from a TOML file, environment variables and arguments, in that order.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example flagvar_demo -- --help
//! cargo run --example flagvar_demo -- --server.port=8080 --display.color red
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature               | How to exercise it                                                        |
//! |-----------------------|---------------------------------------------------------------------------|
//! | Defaults              | `cargo run --example flagvar_demo`                                        |
//! | Config file           | Create `flagvar-demo.toml` in cwd with `[server]` / `port = 9000`         |
//! | Env var override      | `FLAGVAR_DEMO__SERVER__PORT=9999 cargo run --example flagvar_demo`        |
//! | Nested flag           | `cargo run --example flagvar_demo -- --server.max-connections 5`          |
//! | Bare boolean flag     | `cargo run --example flagvar_demo -- --verbose`                           |
//! | Duration              | `cargo run --example flagvar_demo -- --server.timeout 1m30s`              |
//! | Timestamp             | `cargo run --example flagvar_demo -- --since 2024-01-01T00:00:00Z`        |
//! | One-of choice         | `cargo run --example flagvar_demo -- --display.color purple` (rejected)   |
//! | String list           | `cargo run --example flagvar_demo -- --display.tags a,b --display.tags c` |

mod config;

use std::path::Path;
use std::process::exit;

use flagvar::{Binder, FlagSet, FlagvarError};

use config::DemoConfig;

const CONFIG_FILE: &str = "flagvar-demo.toml";
const ENV_PREFIX: &str = "FLAGVAR_DEMO";
const RESET: &str = "\x1b[0m";

fn load(flags: &mut FlagSet<'_>) -> Result<(), FlagvarError> {
    if Path::new(CONFIG_FILE).exists() {
        flags.apply_file(CONFIG_FILE)?;
    }
    flags.apply_env(ENV_PREFIX, std::env::vars())?;
    flags.parse(std::env::args_os())
}

fn main() {
    let mut config = DemoConfig::default();
    let mut flags = FlagSet::new("flagvar-demo");

    if let Err(e) = Binder::new().recursive(true).bind(&mut flags, &mut config) {
        eprintln!("Failed to bind flags:\n{e}");
        exit(1);
    }
    match load(&mut flags) {
        Ok(()) => {}
        Err(FlagvarError::Cli(e)) => e.exit(),
        Err(e) => {
            eprintln!("Failed to load config:\n{e}");
            exit(1);
        }
    }

    let changed: Vec<String> = flags
        .iter()
        .filter(|flag| flag.is_set())
        .map(|flag| flag.name().to_string())
        .collect();
    let listing = flags.listing();
    drop(flags);

    let color = config.display.color.ansi();
    if config.verbose {
        println!("{color}[verbose] Resolved configuration for {:?}{RESET}", config.name);
        println!("{color}[verbose] Changed: {}{RESET}", changed.join(", "));
        println!();
    }

    if config.since != flagvar::zero_timestamp() {
        println!("{color}Reporting since {}{RESET}", config.since.to_rfc3339());
        println!();
    }

    let width = listing.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    for (key, value) in &listing {
        println!("{color}{key:<width$}{RESET}  {value}");
    }
    if !config.display.tags.is_empty() {
        println!();
        println!("tags: {}", config.display.tags.join(" "));
    }
}
