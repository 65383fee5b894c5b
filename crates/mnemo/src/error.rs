//! Error types for Mnemo
//!
//! Memory and reasoning operations never fail by contract; errors only
//! surface at the edges (config files, snapshot parsing, I/O).

use thiserror::Error;

/// Main error type for Mnemo operations
#[derive(Error, Debug)]
pub enum MnemoError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Snapshot contents could not be restored
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Rule template errors
    #[error("Template error: {0}")]
    Template(#[from] crate::rules::TemplateError),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl From<serde_json::Error> for MnemoError {
    fn from(e: serde_json::Error) -> Self {
        MnemoError::Serialization(e.to_string())
    }
}

/// Result type alias for Mnemo operations
pub type Result<T> = std::result::Result<T, MnemoError>;
