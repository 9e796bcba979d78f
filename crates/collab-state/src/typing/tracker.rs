//! In-memory typing indicator tracking.

use collab_core::UserId;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

/// How long a typing observation stays live. Matches the interval the
/// sending side uses to auto-clear its own outbound typing signal after a
/// pause in keystrokes.
pub const TYPING_TTL: Duration = Duration::from_millis(3000);

/// A live typing observation. Entries exist only while the last observed
/// state was "typing"; a typing-false event deletes the entry instead.
#[derive(Debug, Clone, Copy)]
struct TypingEntry {
    observed_at: Instant,
}

/// Typing indicator tracker.
///
/// Staleness is detected lazily: an entry past its TTL is deleted as a side
/// effect of the read that discovers it. There is no background sweep, so a
/// sender that goes stale and is never queried again leaves its entry in the
/// map until `clear`.
#[derive(Debug)]
pub struct TypingTracker {
    entries: DashMap<UserId, TypingEntry>,
    ttl: Duration,
}

impl Default for TypingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypingTracker {
    /// Create a tracker with the standard TTL
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(TYPING_TTL)
    }

    /// Create a tracker with a custom TTL
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Record an observed typing state for a sender.
    ///
    /// A `true` observation inserts or refreshes the entry; a `false`
    /// observation deletes it (no-op when absent).
    pub fn observe(&self, sender_id: UserId, is_typing: bool) {
        if is_typing {
            tracing::trace!(sender_id = %sender_id, "Typing observed");
            self.entries.insert(
                sender_id,
                TypingEntry {
                    observed_at: Instant::now(),
                },
            );
        } else {
            tracing::trace!(sender_id = %sender_id, "Typing cleared");
            self.entries.remove(&sender_id);
        }
    }

    /// Check whether a sender is currently typing.
    ///
    /// A stale entry (observed at least one TTL ago) is deleted as a side
    /// effect of this read and reported as not typing.
    pub fn is_typing(&self, sender_id: &UserId) -> bool {
        let stale = match self.entries.get(sender_id) {
            None => return false,
            // The guard must be dropped before removal below.
            Some(entry) => entry.observed_at.elapsed() >= self.ttl,
        };

        if stale {
            // Re-check under the removal lock so a concurrent fresh
            // observation is not evicted.
            self.entries
                .remove_if(sender_id, |_, entry| entry.observed_at.elapsed() >= self.ttl);
            tracing::trace!(sender_id = %sender_id, "Stale typing entry evicted");
            return false;
        }

        true
    }

    /// Number of entries currently held, including not-yet-queried stale ones
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the tracker holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry (teardown only)
    pub fn clear(&self) {
        self.entries.clear();
    }
}
