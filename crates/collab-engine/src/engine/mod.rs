//! Sync engine facade.
//!
//! One [`SyncEngine`] per authenticated session. It exclusively owns the
//! in-memory stores, runs the inbound dispatch loop, and exposes the
//! imperative operations the UI calls.

mod dispatch;
mod operations;

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use collab_core::{
    ConnectionStatus, Message, MessageId, PushTransport, ReactionKind, RemoteApi, UserId,
    UserStatus,
};
use collab_state::{
    PresenceEntry, PresenceTracker, QuerySessions, QuerySnapshot, ReactionAggregator, TypingTracker,
};
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};

pub(crate) use dispatch::Dispatcher;

/// Initialization lifecycle of the engine.
///
/// An explicit state machine rather than a bare "callbacks registered"
/// flag, so initialize/teardown races are well-defined: `initialize` is a
/// no-op unless the engine is `Uninitialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineLifecycle {
    #[default]
    Uninitialized,
    Initializing,
    Ready,
}

impl EngineLifecycle {
    /// Check if the engine is fully initialized
    #[must_use]
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// The collaboration sync engine.
///
/// Inbound push events fan into the presence, typing, and reaction stores
/// through a single dispatch task; request/response operations round-trip
/// to the remote service and update the query sessions. Failures surface as
/// structured results plus a shared human-readable error slot; nothing
/// panics or escapes across this boundary.
pub struct SyncEngine {
    /// Identifies this engine instance in logs
    session_id: Uuid,
    pub(crate) config: SyncConfig,

    pub(crate) transport: Arc<dyn PushTransport>,
    pub(crate) api: Arc<dyn RemoteApi>,

    // Stores are shared with the dispatch task, which holds its own handles.
    pub(crate) presence: Arc<PresenceTracker>,
    pub(crate) typing: Arc<TypingTracker>,
    pub(crate) reactions: Arc<ReactionAggregator>,
    pub(crate) queries: QuerySessions,
    /// Bounded feed of inbound messages, newest first
    pub(crate) recent: Arc<RwLock<VecDeque<Message>>>,

    pub(crate) connection: Arc<RwLock<ConnectionStatus>>,
    pub(crate) last_error: Arc<RwLock<Option<String>>>,

    lifecycle: Mutex<EngineLifecycle>,
    dispatch_task: Mutex<Option<JoinHandle<()>>>,
    pub(crate) running: Arc<AtomicBool>,
}

impl SyncEngine {
    /// Create an engine with the default configuration
    pub fn new(transport: Arc<dyn PushTransport>, api: Arc<dyn RemoteApi>) -> Arc<Self> {
        Self::with_config(transport, api, SyncConfig::default())
    }

    /// Create an engine with a custom configuration
    pub fn with_config(
        transport: Arc<dyn PushTransport>,
        api: Arc<dyn RemoteApi>,
        config: SyncConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            session_id: Uuid::new_v4(),
            typing: Arc::new(TypingTracker::with_ttl(config.typing_ttl())),
            config,
            transport,
            api,
            presence: Arc::new(PresenceTracker::new()),
            reactions: Arc::new(ReactionAggregator::new()),
            queries: QuerySessions::new(),
            recent: Arc::new(RwLock::new(VecDeque::new())),
            connection: Arc::new(RwLock::new(ConnectionStatus::Disconnected)),
            last_error: Arc::new(RwLock::new(None)),
            lifecycle: Mutex::new(EngineLifecycle::Uninitialized),
            dispatch_task: Mutex::new(None),
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Subscribe to the push transport and start the dispatch loop.
    ///
    /// Idempotent: a second call (e.g. from a remounting UI) returns
    /// immediately without re-subscribing, so a single inbound event is
    /// never applied twice.
    pub async fn initialize(&self) -> SyncResult<()> {
        {
            let mut lifecycle = self.lifecycle.lock();
            match *lifecycle {
                EngineLifecycle::Ready | EngineLifecycle::Initializing => {
                    tracing::debug!(
                        session_id = %self.session_id,
                        "Initialize skipped, engine already active"
                    );
                    return Ok(());
                }
                EngineLifecycle::Uninitialized => *lifecycle = EngineLifecycle::Initializing,
            }
        }

        let receiver = match self.transport.subscribe().await {
            Ok(receiver) => receiver,
            Err(err) => {
                *self.lifecycle.lock() = EngineLifecycle::Uninitialized;
                return Err(self.record_failure(SyncError::from(err)));
            }
        };

        self.running.store(true, Ordering::SeqCst);
        let dispatcher = Dispatcher::new(self);
        let handle = tokio::spawn(dispatcher.run(receiver));
        *self.dispatch_task.lock() = Some(handle);
        *self.lifecycle.lock() = EngineLifecycle::Ready;

        tracing::info!(session_id = %self.session_id, "Sync engine initialized");
        Ok(())
    }

    /// Unsubscribe from the transport, clear every store to its empty
    /// initial value, and make a future `initialize` possible.
    pub async fn teardown(&self) {
        {
            let mut lifecycle = self.lifecycle.lock();
            if *lifecycle == EngineLifecycle::Uninitialized {
                tracing::debug!(
                    session_id = %self.session_id,
                    "Teardown skipped, engine not initialized"
                );
                return;
            }
            *lifecycle = EngineLifecycle::Uninitialized;
        }

        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.dispatch_task.lock().take() {
            handle.abort();
        }
        self.transport.unsubscribe().await.ok();

        self.presence.clear();
        self.typing.clear();
        self.reactions.clear();
        self.queries.clear_all();
        self.recent.write().clear();
        *self.connection.write() = ConnectionStatus::Disconnected;
        *self.last_error.write() = None;

        tracing::info!(session_id = %self.session_id, "Sync engine torn down");
    }

    // ========================================================================
    // Read accessors (any number of UI surfaces may call these concurrently)
    // ========================================================================

    /// Identifier of this engine instance
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Current lifecycle state
    pub fn lifecycle(&self) -> EngineLifecycle {
        *self.lifecycle.lock()
    }

    /// Current transport connection status
    pub fn connection_status(&self) -> ConnectionStatus {
        *self.connection.read()
    }

    /// Most recent surfaced error, if any. Does not auto-clear.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Clear the shared error slot
    pub fn clear_error(&self) {
        *self.last_error.write() = None;
    }

    /// Check whether a sender is currently typing (lazy TTL eviction)
    pub fn is_user_typing(&self, sender_id: &UserId) -> bool {
        self.typing.is_typing(sender_id)
    }

    /// Check whether a user's last-known status is online
    pub fn is_user_online(&self, user_id: &UserId) -> bool {
        self.presence.is_online(user_id)
    }

    /// Last-known status of a user, if one was observed
    pub fn status_of(&self, user_id: &UserId) -> Option<UserStatus> {
        self.presence.status_of(user_id)
    }

    /// Snapshot of every known presence entry
    pub fn presence_snapshot(&self) -> Vec<PresenceEntry> {
        self.presence.snapshot()
    }

    /// Reaction snapshot for a message; empty map when it has none
    pub fn reactions_for(&self, message_id: &MessageId) -> HashMap<ReactionKind, HashSet<UserId>> {
        self.reactions.reactions_for(message_id)
    }

    /// Per-kind reaction counts for a message
    pub fn reaction_counts_for(&self, message_id: &MessageId) -> HashMap<ReactionKind, usize> {
        self.reactions.reaction_counts_for(message_id)
    }

    /// The inbound recent-message feed, newest first
    pub fn recent_feed(&self) -> Vec<Message> {
        self.recent.read().iter().cloned().collect()
    }

    /// State of the keyword-search session
    pub fn search_state(&self) -> QuerySnapshot {
        self.queries.search.snapshot()
    }

    /// State of the attachment-filter session
    pub fn attachment_state(&self) -> QuerySnapshot {
        self.queries.attachments.snapshot()
    }

    /// State of the date-range session
    pub fn date_range_state(&self) -> QuerySnapshot {
        self.queries.date_range.snapshot()
    }

    /// Reset the keyword-search session to idle
    pub fn clear_search(&self) {
        self.queries.search.clear();
    }

    /// Reset the attachment-filter session to idle
    pub fn clear_attachments(&self) {
        self.queries.attachments.clear();
    }

    /// Reset the date-range session to idle
    pub fn clear_date_range(&self) {
        self.queries.date_range.clear();
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Record a failure in the shared error slot and hand it back
    pub(crate) fn record_failure(&self, err: SyncError) -> SyncError {
        tracing::warn!(session_id = %self.session_id, error = %err, "Operation failed");
        *self.last_error.write() = Some(err.to_string());
        err
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine")
            .field("session_id", &self.session_id)
            .field("lifecycle", &*self.lifecycle.lock())
            .field("connection", &*self.connection.read())
            .field("known_presences", &self.presence.len())
            .field("reacted_messages", &self.reactions.len())
            .finish()
    }
}
