//! Paginated query session state machines.

use collab_core::{Message, MessagePage};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Phase of a query session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Read-only view of a session at one point in time
#[derive(Debug, Clone)]
pub struct QuerySnapshot {
    pub phase: QueryPhase,
    pub messages: Vec<Message>,
    pub last_error: Option<String>,
    /// Whether the most recent successful page was the final one
    pub last_page_final: bool,
}

#[derive(Debug, Default)]
struct SessionInner {
    phase: QueryPhase,
    messages: Vec<Message>,
    last_error: Option<String>,
    last_page_final: bool,
}

/// One paginated query session.
///
/// Requests are fenced with a monotonically increasing ticket: `begin`
/// stamps the request, and an outcome delivered with any ticket other than
/// the latest issued one is discarded, so a slow earlier response can never
/// clobber a newer one. Result items are replaced wholesale on success;
/// pagination is caller-driven, nothing is accumulated across pages.
#[derive(Debug)]
pub struct QuerySession {
    label: &'static str,
    /// Latest issued request ticket; also bumped by `clear` so an
    /// in-flight response cannot repopulate a cleared session.
    seq: AtomicU64,
    inner: RwLock<SessionInner>,
}

impl QuerySession {
    /// Create an idle session. The label only appears in logs.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            seq: AtomicU64::new(0),
            inner: RwLock::new(SessionInner::default()),
        }
    }

    /// Start a request: moves the session to `Loading` and returns the
    /// ticket the eventual outcome must present. Overlapping re-requests
    /// are accepted from any phase.
    pub fn begin(&self) -> u64 {
        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        let mut inner = self.inner.write();
        inner.phase = QueryPhase::Loading;
        inner.last_error = None;

        tracing::debug!(session = self.label, ticket = ticket, "Query started");
        ticket
    }

    /// Deliver a successful page for the given ticket.
    ///
    /// Returns `false` (and changes nothing) if a newer request was issued
    /// since this ticket.
    pub fn complete(&self, ticket: u64, page: MessagePage) -> bool {
        if ticket != self.seq.load(Ordering::SeqCst) {
            tracing::debug!(
                session = self.label,
                ticket = ticket,
                "Stale query response discarded"
            );
            return false;
        }

        let mut inner = self.inner.write();
        inner.phase = QueryPhase::Success;
        inner.messages = page.messages;
        inner.last_page_final = page.last;
        inner.last_error = None;

        tracing::debug!(
            session = self.label,
            ticket = ticket,
            results = inner.messages.len(),
            "Query completed"
        );
        true
    }

    /// Deliver a failure for the given ticket.
    ///
    /// Previous results are retained so the UI can keep rendering them
    /// alongside the error. Returns `false` if the ticket is stale.
    pub fn fail(&self, ticket: u64, message: impl Into<String>) -> bool {
        if ticket != self.seq.load(Ordering::SeqCst) {
            tracing::debug!(
                session = self.label,
                ticket = ticket,
                "Stale query failure discarded"
            );
            return false;
        }

        let mut inner = self.inner.write();
        inner.phase = QueryPhase::Error;
        inner.last_error = Some(message.into());

        tracing::debug!(session = self.label, ticket = ticket, "Query failed");
        true
    }

    /// Reset to `Idle` with an empty result list, invalidating any
    /// in-flight request.
    pub fn clear(&self) {
        self.seq.fetch_add(1, Ordering::SeqCst);

        let mut inner = self.inner.write();
        *inner = SessionInner::default();

        tracing::debug!(session = self.label, "Query session cleared");
    }

    /// Current phase
    pub fn phase(&self) -> QueryPhase {
        self.inner.read().phase
    }

    /// Whether a request is in flight
    pub fn is_loading(&self) -> bool {
        self.phase() == QueryPhase::Loading
    }

    /// Current result items
    pub fn messages(&self) -> Vec<Message> {
        self.inner.read().messages.clone()
    }

    /// Failure reason of the most recent outcome, if it was a failure
    pub fn last_error(&self) -> Option<String> {
        self.inner.read().last_error.clone()
    }

    /// Consistent point-in-time view of the whole session
    pub fn snapshot(&self) -> QuerySnapshot {
        let inner = self.inner.read();
        QuerySnapshot {
            phase: inner.phase,
            messages: inner.messages.clone(),
            last_error: inner.last_error.clone(),
            last_page_final: inner.last_page_final,
        }
    }
}

/// The three query sessions of one engine instance.
///
/// Deliberately separate instances so a date-range query's in-flight state
/// can never be mistaken for the keyword search's.
#[derive(Debug)]
pub struct QuerySessions {
    pub search: QuerySession,
    pub attachments: QuerySession,
    pub date_range: QuerySession,
}

impl Default for QuerySessions {
    fn default() -> Self {
        Self::new()
    }
}

impl QuerySessions {
    /// Create three idle sessions
    #[must_use]
    pub fn new() -> Self {
        Self {
            search: QuerySession::new("search"),
            attachments: QuerySession::new("attachments"),
            date_range: QuerySession::new("date_range"),
        }
    }

    /// Reset every session (teardown only)
    pub fn clear_all(&self) {
        self.search.clear();
        self.attachments.clear();
        self.date_range.clear();
    }
}
