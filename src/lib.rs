//! Bind the fields of a struct to named flags. Define a struct, bind it, and
//! every field becomes a flag that writes straight back into the struct.
//!
//! ```
//! use flagvar::{Binder, Bindable, FlagSet};
//!
//! #[derive(Default, Bindable)]
//! pub struct Server {
//!     /// Address to listen on.
//!     pub listen_addr: String,
//!     /// Connection limit.
//!     pub max_connections: u32,
//! }
//!
//! let mut server = Server::default();
//! let mut flags = FlagSet::new("server");
//! Binder::new().bind(&mut flags, &mut server)?;
//! flags.parse(["server", "--listen-addr", "0.0.0.0:80", "--max-connections=64"])?;
//! drop(flags);
//!
//! assert_eq!(server.listen_addr, "0.0.0.0:80");
//! assert_eq!(server.max_connections, 64);
//! # Ok::<(), flagvar::FlagvarError>(())
//! ```
//!
//! # Design: the struct is the flag definition
//!
//! The struct declares which flags exist, what their defaults are (whatever
//! the fields hold at bind time) and what their help text says (the `///`
//! doc comments). There is no separate flag table to keep in sync:
//!
//! - **Names** come from field identifiers through [`lisp_case`]:
//!   `max_connections` becomes `max-connections`, `HTTPServer` becomes
//!   `http-server`. Turn this off with [`BindOptions::lisp_case`], or name a
//!   single field with `#[flagvar(rename = "...")]`.
//! - **Nested structs** marked `#[flagvar(nested)]` are descended into when
//!   [`BindOptions::recursive`] is on, and their flags are prefixed with the
//!   parent's name and a separator (`server.max-connections`). With recursion
//!   off they are skipped.
//! - **Private fields** and fields marked `#[flagvar(skip)]` are never bound.
//!   Field types with no adapter, such as collections, are skipped too.
//!
//! # No reflection
//!
//! A record describes itself through [`Bindable::fields`], which hands out one
//! exclusive reference per field tagged with its kind ([`Slot`]). The derive
//! macro writes that method; it can also be written by hand.
//!
//! # Adapters
//!
//! Each flag owns a [`Value`] adapter that parses text into the field and
//! renders the field back to text:
//!
//! | Field type | Adapter | Text |
//! |---|---|---|
//! | `bool`, integers, floats, `String` | [`Scalar`] | Rust's `FromStr` grammar |
//! | `std::time::Duration` | [`DurationValue`] | `1h30m`, `250ms`, `1.5s` |
//! | `chrono::TimeDelta` | [`TimeDeltaValue`] | as above, may be negative |
//! | `chrono::DateTime<Utc>` | [`Timestamp`] | RFC 3339, or any strftime layout |
//! | any `T` with named choices | [`OneOf`] | one of the mapping's keys |
//! | `Vec<String>` | [`StringList`] | appends per set, optionally split |
//!
//! The binder picks an adapter by exact type first ([`Binder::with_type`]),
//! then by kind. Fields can bring their own adapter with
//! `#[flagvar(with = path)]`.
//!
//! # Value sources
//!
//! [`FlagSet`] is the registry the binder fills. Values reach it from:
//!
//! ```text
//! TOML file       apply_file / apply_table     [server] max-connections = 64
//!        ↑ overridden by
//! Environment     apply_env                    APP__SERVER__MAX_CONNECTIONS=64
//!        ↑ overridden by
//! Arguments       parse                        --server.max-connections=64
//! ```
//!
//! Sources apply in the order they are called, so the layering above is just
//! the order an application calls them in. Any other registry can be used by
//! implementing [`Registry`].
//!
//! # Core library without clap
//!
//! The binder, the adapters and [`FlagSet`] have no dependency on a CLI
//! framework. The clap-backed argument parser (`parse`, `command`, `augment`,
//! `apply_matches`) sits behind the `clap` Cargo feature, and the derive macro
//! behind `derive`; both are on by default.
//!
//! ```toml
//! flagvar = { version = "...", default-features = false }
//! ```
//!
//! # Error handling
//!
//! All fallible operations return [`FlagvarError`]. Binding errors name the
//! record and field they came from, and value errors name the flag.
//! [`FlagvarError::root`] strips that context.
//!
//! # Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events: `debug` for
//! every registered or skipped field, `trace` for every value applied. It
//! never installs a subscriber.

pub mod duration;
pub mod error;

mod binder;
mod case;
#[cfg(feature = "clap")]
mod cli;
mod env;
mod field;
mod file;
mod list;
mod one_of;
mod options;
mod registry;
mod timestamp;
mod value;

#[cfg(test)]
mod fixtures;

pub use binder::{Binder, bind};
pub use case::lisp_case;
pub use env::env_key;
pub use error::FlagvarError;
pub use field::{BindField, Bindable, Field, Slot};
pub use file::flatten_table;
pub use list::StringList;
pub use one_of::{Mapping, OneOf};
pub use options::BindOptions;
pub use registry::{Flag, FlagSet, Registry};
pub use timestamp::{RFC3339, Timestamp, zero_timestamp};
pub use value::{DurationValue, Scalar, ScalarType, TimeDeltaValue, Value, ZERO};

#[cfg(feature = "derive")]
pub use flagvar_derive::Bindable;
