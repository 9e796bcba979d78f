//! # collab-state
//!
//! In-memory state stores for the collaboration sync core.
//!
//! ## Stores
//!
//! - **Presence**: last-known status per remote user, last-write-wins
//! - **Typing**: short-lived typing facts with lazy TTL eviction
//! - **Reactions**: per-message reaction aggregation with set semantics
//! - **Query sessions**: independent paginated request state machines
//!
//! Every store is a pure data structure with update rules; none of them
//! performs network I/O. The sync engine is the only writer, while any
//! number of UI surfaces may read concurrently.

pub mod presence;
pub mod query;
pub mod reactions;
pub mod typing;

// Re-export presence types
pub use presence::{PresenceEntry, PresenceTracker};

// Re-export typing types
pub use typing::{TypingTracker, TYPING_TTL};

// Re-export reaction types
pub use reactions::ReactionAggregator;

// Re-export query-session types
pub use query::{QueryPhase, QuerySession, QuerySessions, QuerySnapshot};
