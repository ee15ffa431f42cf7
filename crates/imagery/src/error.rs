//! Error types for imagery providers.

/// Result type alias for imagery operations.
pub type Result<T> = std::result::Result<T, ImageryError>;

/// Errors a provider can report.
#[derive(Debug, thiserror::Error)]
pub enum ImageryError {
    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The mosaic service answered with an error status
    #[error("mosaic service error (status {status}): {body}")]
    Service {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// The request could not be built (e.g. date window out of range)
    #[error("invalid mosaic request: {0}")]
    InvalidRequest(String),
}
