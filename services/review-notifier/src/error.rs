//! Error types for the review notifier

/// Errors that can occur in the review notifier
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("Missing required environment variable: {0}")]
    MissingVariable(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Endpoint {endpoint} is unreachable (from_date={from_date}): {reason}")]
    Connectivity {
        endpoint: String,
        from_date: i64,
        reason: String,
    },

    #[error("Endpoint {endpoint} returned status {status}")]
    ApiStatus { endpoint: String, status: u16 },

    #[error("Unexpected response shape: {0}")]
    Shape(String),

    #[error("Submission record has no `{0}` field")]
    MissingField(&'static str),

    #[error("Unknown review status: {0}")]
    UnknownStatus(String),

    #[error("Telegram API error: {0}")]
    Telegram(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for review notifier operations
pub type Result<T> = std::result::Result<T, NotifierError>;
