//! Error types for the Freispace client.

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Error types that can occur when calling the Freispace API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request itself failed (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-2xx status.
    #[error("HTTP error! status: {status}, message: {body}")]
    Api { status: u16, body: String },

    /// A success response carried a body that was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
