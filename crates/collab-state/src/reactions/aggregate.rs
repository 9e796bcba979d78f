//! In-memory reaction aggregation.

use collab_core::{MessageId, ReactionKind, UserId};
use dashmap::DashMap;
use std::collections::{HashMap, HashSet};

/// Reaction aggregator.
///
/// Keyed by message; per message a map from reaction kind to the set of
/// users who reacted with that kind. Invariants:
///
/// - a user appears at most once per kind per message (add is idempotent)
/// - a kind key with an emptied user set is deleted, never retained
/// - a message with no reactions has no entry; lookups return an empty map
///
/// No ordering is imposed on kinds or on users within a kind.
#[derive(Debug, Default)]
pub struct ReactionAggregator {
    entries: DashMap<MessageId, HashMap<ReactionKind, HashSet<UserId>>>,
}

impl ReactionAggregator {
    /// Create an empty aggregator
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Apply an inbound reaction-added event.
    ///
    /// Reapplying an already-applied add (duplicate delivery) is a no-op.
    pub fn apply_add(&self, message_id: MessageId, kind: ReactionKind, user_id: UserId) {
        let mut message = self.entries.entry(message_id.clone()).or_default();
        let inserted = message.entry(kind).or_default().insert(user_id.clone());

        if inserted {
            tracing::trace!(
                message_id = %message_id,
                kind = %kind,
                user_id = %user_id,
                "Reaction added"
            );
        } else {
            tracing::trace!(
                message_id = %message_id,
                kind = %kind,
                user_id = %user_id,
                "Duplicate reaction add ignored"
            );
        }
    }

    /// Apply an inbound reaction-removed event.
    ///
    /// Removing a reaction that was never added is a no-op. A kind whose
    /// user set empties is deleted outright, and a message left without any
    /// kind loses its entry.
    pub fn apply_remove(&self, message_id: &MessageId, kind: ReactionKind, user_id: &UserId) {
        let emptied = {
            let Some(mut message) = self.entries.get_mut(message_id) else {
                return;
            };

            if let Some(users) = message.get_mut(&kind) {
                if users.remove(user_id) {
                    tracing::trace!(
                        message_id = %message_id,
                        kind = %kind,
                        user_id = %user_id,
                        "Reaction removed"
                    );
                }
                if users.is_empty() {
                    message.remove(&kind);
                }
            }

            message.is_empty()
            // Guard dropped here; the map-level removal below must not
            // run while the entry is still locked.
        };

        if emptied {
            self.entries.remove_if(message_id, |_, message| message.is_empty());
        }
    }

    /// Get the current reaction snapshot for a message.
    ///
    /// Messages with no reactions yield an empty map, not an absence.
    pub fn reactions_for(&self, message_id: &MessageId) -> HashMap<ReactionKind, HashSet<UserId>> {
        self.entries
            .get(message_id)
            .map(|message| message.clone())
            .unwrap_or_default()
    }

    /// Get per-kind reaction counts for a message (the shape list UIs render)
    pub fn reaction_counts_for(&self, message_id: &MessageId) -> HashMap<ReactionKind, usize> {
        self.entries
            .get(message_id)
            .map(|message| {
                message
                    .iter()
                    .map(|(kind, users)| (*kind, users.len()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check whether a specific user reacted to a message with a kind
    pub fn has_reacted(&self, message_id: &MessageId, kind: ReactionKind, user_id: &UserId) -> bool {
        self.entries
            .get(message_id)
            .is_some_and(|message| message.get(&kind).is_some_and(|users| users.contains(user_id)))
    }

    /// Number of messages with at least one reaction
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no message has any reaction
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry (teardown only)
    pub fn clear(&self) {
        self.entries.clear();
    }
}
