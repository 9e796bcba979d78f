//! Error types for the external interface boundary

mod remote_error;

pub use remote_error::{ApiError, TransportError};
