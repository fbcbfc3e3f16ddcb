//! Error types for the order backend client

use thiserror::Error;

/// Errors that can occur when talking to the order backend
///
/// `Clone + PartialEq` so failures can travel inside actions and be
/// asserted on in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// HTTP request failed (connection, timeout, TLS)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response body could not be decoded
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The requested order does not exist (or the backend refused to return it)
    #[error("Order {0} not found")]
    NotFound(String),

    /// The customer already holds an active order
    #[error("{message}")]
    Conflict {
        /// Order the backend says is already active
        existing_order_id: String,
        /// Message from the backend
        message: String,
    },

    /// Backend returned a non-success status
    #[error("{}", message.as_deref().unwrap_or("Backend error"))]
    Api {
        /// HTTP status code
        status: u16,
        /// `error` field of the response body, if any
        message: Option<String>,
    },
}

impl BackendError {
    /// The server-provided message, when the backend sent one
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Conflict { message, .. } => Some(message),
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
