use serde_json::Value as Json;
use thiserror::Error;

/// Client-side validation failure, raised before any request leaves the process.
///
/// Holds every message collected while validating a request. Displayed as
/// `invalid usage: <msg>, <msg>, ...`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid usage: {}", .messages.join(", "))]
pub struct UsageError {
    messages: Vec<String>,
}

impl UsageError {
    /// A usage error carrying a single message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    /// A usage error carrying several messages, in the order they were found.
    ///
    /// Callers must pass at least one message; an empty list still renders as
    /// `invalid usage: `.
    pub fn from_messages(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// Non-2xx response, or a query response carrying an `errors` array.
    #[error("usage error ({status}): {body}")]
    Server { status: u16, body: Json },

    #[error("Network error: {0}")]
    Network(String),

    /// A 2xx response whose body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl Error {
    /// Returns a stable error code for this error variant.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Usage(_) => "INVALID_USAGE",
            Error::Server { .. } => "SERVER_ERROR",
            Error::Network(_) => "NETWORK_ERROR",
            Error::Decode(_) => "DECODE_ERROR",
        }
    }

    /// Returns true if sending the same request again may succeed.
    ///
    /// Usage and decode errors are deterministic. Server errors are only
    /// retryable when the server reported a 5xx status.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Server { status, .. } => *status >= 500,
            Error::Usage(_) => false,
            Error::Decode(_) => false,
        }
    }

    /// HTTP status carried by a server error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
