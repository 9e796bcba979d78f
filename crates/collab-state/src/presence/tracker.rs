//! In-memory user presence tracking.

use chrono::{DateTime, Utc};
use collab_core::{UserId, UserStatus};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Last-known presence of one remote user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEntry {
    pub user_id: UserId,
    pub status: UserStatus,
    /// When the status was observed
    pub observed_at: DateTime<Utc>,
}

/// Presence tracker.
///
/// One entry per known user, overwritten wholesale on each inbound status
/// event (last-write-wins). Entries are never expired client-side; the
/// remote service pushes corrections, and `clear` on teardown is the only
/// bulk removal.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    entries: DashMap<UserId, PresenceEntry>,
}

impl PresenceTracker {
    /// Create an empty tracker
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Record an observed status for a user, replacing any previous entry.
    pub fn observe(&self, user_id: UserId, status: UserStatus, observed_at: DateTime<Utc>) {
        tracing::trace!(user_id = %user_id, status = %status, "Presence observed");

        self.entries.insert(
            user_id.clone(),
            PresenceEntry {
                user_id,
                status,
                observed_at,
            },
        );
    }

    /// Check if a user's last-known status is `online`.
    ///
    /// Unknown users are reported as not online.
    pub fn is_online(&self, user_id: &UserId) -> bool {
        self.entries
            .get(user_id)
            .is_some_and(|entry| entry.status.is_online())
    }

    /// Get a user's last-known status, if any was observed
    pub fn status_of(&self, user_id: &UserId) -> Option<UserStatus> {
        self.entries.get(user_id).map(|entry| entry.status.clone())
    }

    /// Get a snapshot of every known presence entry
    pub fn snapshot(&self) -> Vec<PresenceEntry> {
        self.entries.iter().map(|entry| entry.clone()).collect()
    }

    /// Number of users with a known presence
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no presence has been observed yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry (teardown only)
    pub fn clear(&self) {
        self.entries.clear();
    }
}
