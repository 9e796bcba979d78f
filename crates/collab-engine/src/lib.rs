//! # collab-engine
//!
//! Orchestration layer for the collaboration sync core.
//!
//! The [`SyncEngine`] is the single owner of the in-memory stores and the
//! only component that talks to the push transport and the remote service.
//! Inbound push events fan into the stores through one dispatch loop;
//! imperative operations (queries, reactions, typing, status) round-trip to
//! the remote service and surface failures as structured values, never as
//! panics or stray rejections.

pub mod config;
pub mod engine;
pub mod error;
pub mod requests;
pub mod telemetry;

// Re-export the public surface at crate root
pub use config::{ConfigError, SyncConfig};
pub use engine::{EngineLifecycle, SyncEngine};
pub use error::{SyncError, SyncResult};
pub use requests::{AttachmentQuery, DateRangeQuery, SearchQuery};
pub use telemetry::{init_tracing, try_init_tracing, TracingConfig};
