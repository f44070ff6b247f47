use thiserror::Error;

/// Type alias for Result with GmailError
pub type Result<T> = std::result::Result<T, GmailError>;

/// Error types for the Gmail console
#[derive(Error, Debug)]
pub enum GmailError {
    /// Gmail API returned an error
    #[error("Gmail API error: {0}")]
    ApiError(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Rate limit exceeded - retry after specified seconds
    #[error("Rate limit exceeded, retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    /// Network-related error (connection issues, timeouts, etc.)
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Server returned 5xx error
    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    /// Resource not found (404)
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden (403)
    #[error("Access forbidden: {0}")]
    Forbidden(String),

    /// Invalid message format or parsing error
    #[error("Invalid message format: {0}")]
    InvalidMessageFormat(String),

    /// Label-related errors
    #[error("Label error: {0}")]
    LabelError(String),

    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic catch-all error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl GmailError {
    /// Check if the error is transient (a later identical request may succeed)
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GmailError::RateLimitExceeded { .. }
                | GmailError::ServerError { .. }
                | GmailError::NetworkError(_)
        )
    }

    /// Check if the error is permanent
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }
}

/// Classify a non-success HTTP status into a GmailError
///
/// The `message` is whatever error body the server returned; it is carried
/// through verbatim for logging, never interpreted.
pub fn classify_status(status: reqwest::StatusCode, message: String) -> GmailError {
    const DEFAULT_RETRY_AFTER: u64 = 5;

    match status.as_u16() {
        429 => GmailError::RateLimitExceeded {
            retry_after: DEFAULT_RETRY_AFTER,
        },
        404 => GmailError::MessageNotFound(message),
        400 => GmailError::BadRequest(message),
        401 => GmailError::AuthError(message),
        403 => GmailError::Forbidden(message),
        500..=599 => GmailError::ServerError {
            status: status.as_u16(),
            message,
        },
        _ => GmailError::ApiError(format!("HTTP {}: {}", status.as_u16(), message)),
    }
}

impl From<reqwest::Error> for GmailError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            GmailError::NetworkError(format!("Request timed out: {}", error))
        } else if error.is_connect() {
            GmailError::NetworkError(format!("Connection error: {}", error))
        } else if error.is_decode() {
            GmailError::InvalidMessageFormat(error.to_string())
        } else {
            GmailError::ApiError(error.to_string())
        }
    }
}
