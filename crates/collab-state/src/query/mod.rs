//! Query session module.
//!
//! One independently-paginated request/loading/result/error state machine
//! per query category.

mod session;

pub use session::{QueryPhase, QuerySession, QuerySessions, QuerySnapshot};
