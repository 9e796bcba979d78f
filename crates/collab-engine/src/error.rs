//! Engine-level error types.
//!
//! Every public engine operation resolves to either a success value or a
//! [`SyncError`]; nothing throws across the facade boundary. Failures are
//! additionally recorded in the engine's shared error slot as a
//! human-readable string, which the UI reads and clears explicitly.

use collab_core::{ApiError, TransportError};
use thiserror::Error;

/// Failure of a sync-engine operation
#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// Rejected before any network call was attempted
    #[error("Validation error: {0}")]
    Validation(String),

    /// The remote service call failed
    #[error("{0}")]
    Remote(#[from] ApiError),

    /// The push transport reported a failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl SyncError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Check if this failure was caught before any round-trip
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type for sync-engine operations
pub type SyncResult<T> = Result<T, SyncError>;
