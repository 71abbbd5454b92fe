//! Error types for mail-gate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Allowlist or routing target is missing or invalid. Fatal at
    /// startup: no event may be processed with a broken configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Event parsing error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
