//! Error types for the booking API client

use thiserror::Error;

/// Errors returned by booking API calls
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The server responded with a non-success status.
    ///
    /// `message` carries the `error` field of the response body when the
    /// server supplied one; callers prefer it over generic fallbacks.
    #[error("API error ({status}): {}", message.as_deref().unwrap_or("no error body"))]
    Status {
        /// HTTP status code
        status: u16,
        /// Server-supplied error message, if the body carried one
        message: Option<String>,
    },

    /// The request never produced a response (connection, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server responded successfully but the body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Client construction failed (bad base URL or HTTP client setup)
    #[error("Client configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// The server-supplied error message, when the server sent one
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether the failure happened without any server response
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
