//! Clap adapter for flag sets.
//!
//! This module is the **optional integration layer** between the registry and
//! the [clap](https://docs.rs/clap) CLI parser. It is compiled only when the
//! `clap` Cargo feature is enabled (on by default).
//!
//! Every flag becomes a long option named after it. Boolean flags accept a bare
//! `--name` meaning `true`, and otherwise need `--name=value`; all other flags
//! take `--name value` or `--name=value`, and values may start with `-`.
//! Repeating an option sets the flag once per occurrence.
//!
//! [`FlagSet::parse`] handles a whole argument list. To embed the flags into an
//! application's own command, pass that command through [`FlagSet::augment`]
//! and hand the resulting matches to [`FlagSet::apply_matches`].

use std::ffi::OsString;

use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::error::FlagvarError;
use crate::registry::{Flag, FlagSet};
use crate::value::ZERO;

fn arg_for(flag: &Flag<'_>) -> Arg {
    let mut help = flag.usage().to_string();
    let default = flag.default_text();
    if !default.is_empty() && default != ZERO {
        if !help.is_empty() {
            help.push(' ');
        }
        help.push_str(&format!("[default: {default}]"));
    }

    let arg = Arg::new(flag.name().to_string())
        .long(flag.name().to_string())
        .help(help)
        .action(ArgAction::Append);
    if flag.value().is_bool_flag() {
        arg.num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
    } else {
        arg.allow_hyphen_values(true)
    }
}

impl FlagSet<'_> {
    /// A clap command named after the set, with one option per flag.
    pub fn command(&self) -> Command {
        self.augment(Command::new(self.name().to_string()))
    }

    /// Add one option per flag to `cmd`.
    ///
    /// A flag named `help` replaces clap's generated help flag.
    pub fn augment(&self, mut cmd: Command) -> Command {
        if self.lookup("help").is_some() {
            cmd = cmd.disable_help_flag(true);
        }
        for flag in self.iter() {
            cmd = cmd.arg(arg_for(flag));
        }
        cmd
    }

    /// Parse `args` and set every flag they name.
    ///
    /// The first element is the program name, as with
    /// [`Command::try_get_matches_from`]. Parse failures, `--help` included,
    /// are returned as [`FlagvarError::Cli`].
    pub fn parse<I, T>(&mut self, args: I) -> Result<(), FlagvarError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self.command().try_get_matches_from(args)?;
        self.apply_matches(&matches)
    }

    /// Set flags from matches produced by a command built with
    /// [`augment`](Self::augment). Flags absent from `matches` are left alone.
    pub fn apply_matches(&mut self, matches: &ArgMatches) -> Result<(), FlagvarError> {
        let occurrences: Vec<(String, Vec<String>)> = self
            .iter()
            .filter_map(|flag| {
                let raw = matches.try_get_raw(flag.name()).ok().flatten()?;
                let texts = raw.map(|s| s.to_string_lossy().into_owned()).collect();
                Some((flag.name().to_string(), texts))
            })
            .collect();
        for (name, texts) in occurrences {
            for text in texts {
                self.apply(&name, &text, "cli")?;
            }
        }
        Ok(())
    }
}
