//! Error type for the command-line front end.

use crate::config::ConfigError;

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// Everything a CLI command can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Failure inside the template engine.
    #[error(transparent)]
    Engine(#[from] autotemplation::Error),

    /// Configuration could not be loaded or saved.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Configuration loaded but is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON output error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Create an invalid-configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Returns `true` if the user quit an interactive prompt.
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        matches!(self, Self::Engine(e) if e.is_aborted())
    }
}
