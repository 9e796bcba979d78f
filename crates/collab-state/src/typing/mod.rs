//! Typing indicator module.
//!
//! Tracks short-lived "is typing" facts with lazy TTL eviction.

mod tracker;

pub use tracker::{TypingTracker, TYPING_TTL};
