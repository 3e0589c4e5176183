//! Common error types for Hydra components.

use thiserror::Error;

/// Common errors across Hydra components
#[derive(Debug, Error)]
pub enum HydraError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Listener could not be created or bound
    #[error("Bind error: {0}")]
    Bind(String),

    /// Worker process could not be spawned
    #[error("Spawn error: {0}")]
    Spawn(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HydraError {
    /// Returns true if the process cannot usefully continue past this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Bind(_))
    }
}
