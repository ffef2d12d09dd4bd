//! Error types for mail operations.

use thiserror::Error;

pub use azure_client_oauth::ProviderError;

/// Errors that can occur when calling the mail API.
#[derive(Debug, Error)]
pub enum Error {
    /// The Graph API answered with a non-success status.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (reading an attachment).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A successful response lacked an expected field.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
