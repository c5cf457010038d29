//! Error types for configuration validation and loading.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config not found")]
    NotFound,

    #[error("invalid config value for `{field}`{}", format_hint(.hint))]
    InvalidValue { field: String, hint: Option<String> },

    #[error("schema validation failed: {message}{}", format_hint(.hint))]
    SchemaValidation {
        message: String,
        hint: Option<String>,
    },

    /// Two output roles resolve to the same file.
    #[error("output path `{path}` is declared by both {first} and {second}")]
    ConflictingOutputPath {
        path: String,
        first: String,
        second: String,
    },

    #[error(transparent)]
    Extract(Box<figment::Error>),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Extract(Box::new(err))
    }
}

fn format_hint(hint: &Option<String>) -> String {
    match hint {
        Some(hint) => format!(" ({})", hint),
        None => String::new(),
    }
}
