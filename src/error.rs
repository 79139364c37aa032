use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlagvarError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Can't define flag '{name}': already exists")]
    DuplicateName { name: String },

    #[error("Invalid {type_name} value \"{text}\": {reason}")]
    Parse {
        text: String,
        type_name: &'static str,
        reason: String,
    },

    #[error("value \"{value}\" is not one of {choices:?}")]
    InvalidChoice { value: String, choices: Vec<String> },

    #[error("No {type_name} variable is bound to this value")]
    Unbound { type_name: &'static str },

    #[error("Set up {record}'s field {field}: {source}")]
    Field {
        record: &'static str,
        field: &'static str,
        source: Box<FlagvarError>,
    },

    #[error("Unknown flag '{0}'")]
    UnknownFlag(String),

    #[error("Invalid value for flag '{name}': {source}")]
    InvalidValue {
        name: String,
        source: Box<FlagvarError>,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[cfg(feature = "clap")]
    #[error(transparent)]
    Cli(#[from] clap::Error),
}

impl FlagvarError {
    pub(crate) fn parse(text: &str, type_name: &'static str, reason: impl ToString) -> Self {
        FlagvarError::Parse {
            text: text.to_string(),
            type_name,
            reason: reason.to_string(),
        }
    }

    /// Strip the `Field` and `InvalidValue` wrappers and return the error that
    /// caused them.
    pub fn root(&self) -> &FlagvarError {
        match self {
            FlagvarError::Field { source, .. } | FlagvarError::InvalidValue { source, .. } => {
                source.root()
            }
            other => other,
        }
    }
}
