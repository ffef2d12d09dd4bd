//! Error types for the authentication flow.

use std::fmt;
use std::io;
use std::time::Duration;

use tracing::debug;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Authentication error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed caller input, rejected before any network activity.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The identity provider answered with a non-success status.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A token response lacks a field the grant requires.
    #[error("Token response is missing required field `{0}`")]
    MissingField(&'static str),

    /// The browser never reached the redirect URI.
    #[error("Authorization redirect not observed within {} seconds", .0.as_secs())]
    InteractiveTimeout(Duration),

    /// The provider redirected back with an error instead of a code.
    #[error("Authorization denied: {error} - {description}")]
    Authorization {
        /// Error code (e.g., `access_denied`).
        error: String,
        /// Human-readable description.
        description: String,
    },

    /// The redirect URL carried no authorization code.
    #[error("No authorization code in redirect URL: {0}")]
    MissingCode(String),

    /// Browser session failure.
    #[error("Browser session error: {0}")]
    Browser(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Creates a browser session error from any displayable failure.
    #[must_use]
    pub fn browser(err: impl fmt::Display) -> Self {
        Self::Browser(err.to_string())
    }
}

/// Error body returned by the identity provider or the Graph API.
///
/// The token endpoint answers `{"error": "...", "error_description": "..."}`
/// while Graph answers `{"error": {"code": "...", "message": "..."}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    /// OAuth2 form: `error` is a string.
    Standard {
        /// Error code.
        error: String,
        /// Error description.
        error_description: String,
    },
    /// Graph form: `error` is an object.
    Nested {
        /// `error.code`.
        code: String,
        /// `error.message`.
        message: String,
    },
    /// Anything that is not a recognised JSON error document.
    Unparseable(String),
}

impl ErrorBody {
    /// Resolves the shape of a raw response body.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(raw) else {
            return Self::Unparseable(raw.to_string());
        };

        let text = |v: Option<&serde_json::Value>| {
            v.and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        match value.get("error") {
            Some(serde_json::Value::String(error)) => Self::Standard {
                error: error.clone(),
                error_description: text(value.get("error_description")),
            },
            Some(nested @ serde_json::Value::Object(_)) => Self::Nested {
                code: text(nested.get("code")),
                message: text(nested.get("message")),
            },
            _ => Self::Unparseable(raw.to_string()),
        }
    }

    /// Returns the error code, empty when the body could not be parsed.
    #[must_use]
    pub fn error(&self) -> &str {
        match self {
            Self::Standard { error, .. } => error,
            Self::Nested { code, .. } => code,
            Self::Unparseable(_) => "",
        }
    }

    /// Returns the description, or the raw body when it could not be parsed.
    #[must_use]
    pub fn error_description(&self) -> &str {
        match self {
            Self::Standard {
                error_description, ..
            } => error_description,
            Self::Nested { message, .. } => message,
            Self::Unparseable(raw) => raw,
        }
    }
}

/// Non-success HTTP response from a Microsoft endpoint.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Azure error {status}: {} - {}", .body.error(), .body.error_description())]
pub struct ProviderError {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase for the status.
    pub reason: String,
    /// Parsed error body.
    pub body: ErrorBody,
}

impl ProviderError {
    /// Builds the error from a status, reason phrase and raw body.
    #[must_use]
    pub fn new(status: u16, reason: impl Into<String>, raw_body: &str) -> Self {
        debug!(status, "Azure web error\n\n{raw_body}");
        Self {
            status,
            reason: reason.into(),
            body: ErrorBody::parse(raw_body),
        }
    }

    /// Consumes a non-success response and builds the error from it.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default();
        let raw = response.text().await.unwrap_or_default();
        Self::new(status.as_u16(), reason, &raw)
    }

    /// Returns the error code.
    #[must_use]
    pub fn error(&self) -> &str {
        self.body.error()
    }

    /// Returns the error description.
    #[must_use]
    pub fn error_description(&self) -> &str {
        self.body.error_description()
    }
}
