use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("missing configuration value `{0}`")]
    Missing(&'static str),

    #[error("invalid configuration value `{field}`: {message}")]
    Invalid { field: &'static str, message: String },
}
