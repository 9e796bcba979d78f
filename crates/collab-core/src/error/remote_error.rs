//! Errors reported by the external collaborators.
//!
//! Both the remote service and the push transport live outside this core;
//! these types are the shape their failures take when they cross into it.

use thiserror::Error;

/// Failure of a request/response call against the remote service
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("server rejected request ({code}): {message}")]
    Server { code: u16, message: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Create a network error from any displayable source
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }

    /// Create a server rejection
    pub fn server(code: u16, message: impl Into<String>) -> Self {
        Self::Server {
            code,
            message: message.into(),
        }
    }
}

/// Failure reported by the push transport itself
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("transport is not connected")]
    NotConnected,

    #[error("subscription failed: {0}")]
    Subscribe(String),

    #[error("transport closed")]
    Closed,
}
