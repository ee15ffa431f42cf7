//! Error types for buildwatch-core.

use crate::Date;

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading or validating site configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Start date is not strictly before the reference date
    #[error("start date {start} must be before reference date {reference}")]
    DateOrder {
        /// Construction start date
        start: Date,
        /// Reference ("current") date
        reference: Date,
    },

    /// Invalid configuration value
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
