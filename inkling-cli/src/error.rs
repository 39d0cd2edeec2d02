//! CLI error types.

use thiserror::Error;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration problem.
    #[error("config error: {0}")]
    Config(String),

    /// Narration could not be produced.
    #[error("narration error: {0}")]
    Narration(String),

    /// Error from the inkling library.
    #[error(transparent)]
    Inkling(#[from] inkling::Error),

    /// Audio decode or encode error.
    #[error(transparent)]
    Audio(#[from] inkling::AudioError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a narration error.
    pub fn narration(message: impl Into<String>) -> Self {
        Self::Narration(message.into())
    }
}
