//! Error types for the financial assistant

use thiserror::Error;

/// Result type alias for assistant operations
pub type Result<T> = std::result::Result<T, AssistantError>;

#[derive(Error, Debug)]
pub enum AssistantError {

    // =============================
    // Core Errors
    // =============================

    /// Catalog source missing or malformed. Fatal at startup.
    #[error("Data load error: {0}")]
    DataLoadError(String),

    /// The generation service call failed (network, auth, quota, bad payload).
    #[error("Generation error: {0}")]
    GenerationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AssistantError {
    pub fn is_generation(&self) -> bool {
        matches!(self, AssistantError::GenerationError(_))
    }
}
