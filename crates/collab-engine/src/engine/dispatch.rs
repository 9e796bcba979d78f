//! Inbound event dispatch.
//!
//! One [`Dispatcher`] per initialized engine consumes the transport's event
//! feed and fans each event into the store it belongs to. Store mutations
//! are synchronous; nothing suspends between receiving an event and
//! applying it.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use collab_core::{ConnectionStatus, Message, ReactionAction, SyncEvent};
use collab_state::{PresenceTracker, ReactionAggregator, TypingTracker};
use parking_lot::RwLock;
use tokio::sync::broadcast;

use super::SyncEngine;

/// Routes inbound push events into the engine's stores.
///
/// Holds its own handles to the shared stores so the loop can run as a
/// detached task while the engine keeps answering reads and operations.
pub(crate) struct Dispatcher {
    presence: Arc<PresenceTracker>,
    typing: Arc<TypingTracker>,
    reactions: Arc<ReactionAggregator>,
    recent: Arc<RwLock<VecDeque<Message>>>,
    connection: Arc<RwLock<ConnectionStatus>>,
    last_error: Arc<RwLock<Option<String>>>,
    running: Arc<AtomicBool>,
    recent_capacity: usize,
}

impl Dispatcher {
    /// Take store handles from the engine
    pub(crate) fn new(engine: &SyncEngine) -> Self {
        Self {
            presence: Arc::clone(&engine.presence),
            typing: Arc::clone(&engine.typing),
            reactions: Arc::clone(&engine.reactions),
            recent: Arc::clone(&engine.recent),
            connection: Arc::clone(&engine.connection),
            last_error: Arc::clone(&engine.last_error),
            running: Arc::clone(&engine.running),
            recent_capacity: engine.config.recent_capacity,
        }
    }

    /// Run the dispatch loop until teardown stops it or the feed closes.
    pub(crate) async fn run(self, mut receiver: broadcast::Receiver<SyncEvent>) {
        while self.running.load(Ordering::SeqCst) {
            match receiver.recv().await {
                Ok(event) => self.apply(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "Dispatch loop lagged behind the push feed");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::warn!("Push feed closed");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        tracing::debug!("Dispatch loop ended");
    }

    /// Apply one inbound event to the store it belongs to.
    ///
    /// Transport-delivered events are applied in arrival order; no
    /// re-sequencing by application timestamp is attempted.
    pub(crate) fn apply(&self, event: SyncEvent) {
        tracing::trace!(event = event.kind(), "Applying inbound event");

        match event {
            SyncEvent::NewMessage(message) => {
                let mut recent = self.recent.write();
                recent.push_front(message);
                recent.truncate(self.recent_capacity);
            }
            SyncEvent::Typing(ev) => {
                self.typing.observe(ev.sender_id, ev.is_typing);
            }
            SyncEvent::StatusUpdate(ev) => {
                let observed_at = ev.observed_at.unwrap_or_else(Utc::now);
                self.presence.observe(ev.user_id, ev.status, observed_at);
            }
            SyncEvent::Reaction(ev) => match ev.action {
                ReactionAction::Added => {
                    self.reactions
                        .apply_add(ev.message_id, ev.reaction_kind, ev.user_id);
                }
                ReactionAction::Removed => {
                    self.reactions
                        .apply_remove(&ev.message_id, ev.reaction_kind, &ev.user_id);
                }
            },
            SyncEvent::ConnectionChange(ev) => {
                tracing::info!(status = %ev.status, "Connection status changed");
                *self.connection.write() = ev.status;
            }
            SyncEvent::Error(ev) => {
                // Surfaced to the UI but never tears stores down.
                tracing::warn!(error = %ev.message, "Transport reported an error");
                *self.last_error.write() = Some(ev.message);
            }
        }
    }
}
