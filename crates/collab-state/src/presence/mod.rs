//! Presence storage module.
//!
//! Tracks last-known status per remote user.

mod tracker;

pub use tracker::{PresenceEntry, PresenceTracker};
