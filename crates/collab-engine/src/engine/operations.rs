//! Imperative request/response operations.
//!
//! Every operation validates its arguments, delegates to the remote
//! service, and on failure records a human-readable message in the shared
//! error slot while returning a structured error to the caller. Reaction,
//! typing, and status mutations are not applied locally: the server echoes
//! the change back over the transport and the store updates through the
//! normal inbound path, so nothing is double-applied.

use chrono::{DateTime, Utc};
use collab_core::{Message, MessageId, MessagePage, MessageStatistics, ReactionKind, UserId, UserStatus};
use tracing::instrument;
use validator::Validate;

use crate::error::{SyncError, SyncResult};
use crate::requests::{validation_message, AttachmentQuery, DateRangeQuery, SearchQuery};

use super::SyncEngine;

impl SyncEngine {
    /// Keyword search within one conversation.
    ///
    /// Updates the search session; an overlapping re-request supersedes
    /// this one, in which case the session keeps the newer outcome while
    /// this call still returns its own result to its caller.
    #[instrument(skip(self))]
    pub async fn search_messages(&self, query: SearchQuery) -> SyncResult<MessagePage> {
        if let Err(errors) = query.validate() {
            return Err(self.record_failure(SyncError::validation(validation_message(&errors))));
        }
        let keyword = query.keyword.trim();
        if keyword.is_empty() {
            return Err(self.record_failure(SyncError::validation(
                "Search keyword must not be empty",
            )));
        }

        let size = self.effective_page_size(query.size);
        let ticket = self.queries.search.begin();

        match self
            .api
            .search_messages(keyword, &query.with_user, query.page, size)
            .await
        {
            Ok(page) => {
                self.queries.search.complete(ticket, page.clone());
                Ok(page)
            }
            Err(err) => {
                let err = SyncError::from(err);
                self.queries.search.fail(ticket, err.to_string());
                Err(self.record_failure(err))
            }
        }
    }

    /// Attachment-filtered fetch within one conversation
    #[instrument(skip(self))]
    pub async fn messages_with_attachments(
        &self,
        query: AttachmentQuery,
    ) -> SyncResult<MessagePage> {
        if let Err(errors) = query.validate() {
            return Err(self.record_failure(SyncError::validation(validation_message(&errors))));
        }

        let size = self.effective_page_size(query.size);
        let ticket = self.queries.attachments.begin();

        match self
            .api
            .messages_with_attachments(&query.with_user, query.attachment_type, query.page, size)
            .await
        {
            Ok(page) => {
                self.queries.attachments.complete(ticket, page.clone());
                Ok(page)
            }
            Err(err) => {
                let err = SyncError::from(err);
                self.queries.attachments.fail(ticket, err.to_string());
                Err(self.record_failure(err))
            }
        }
    }

    /// Date-range fetch within one conversation
    #[instrument(skip(self))]
    pub async fn messages_by_date_range(&self, query: DateRangeQuery) -> SyncResult<MessagePage> {
        if let Err(errors) = query.validate() {
            return Err(self.record_failure(SyncError::validation(validation_message(&errors))));
        }
        if query.start_date > query.end_date {
            return Err(self.record_failure(SyncError::validation(
                "Start date must not be after end date",
            )));
        }

        let size = self.effective_page_size(query.size);
        let ticket = self.queries.date_range.begin();

        match self
            .api
            .messages_by_date_range(
                &query.with_user,
                query.start_date,
                query.end_date,
                query.page,
                size,
            )
            .await
        {
            Ok(page) => {
                self.queries.date_range.complete(ticket, page.clone());
                Ok(page)
            }
            Err(err) => {
                let err = SyncError::from(err);
                self.queries.date_range.fail(ticket, err.to_string());
                Err(self.record_failure(err))
            }
        }
    }

    /// Add own reaction to a message.
    ///
    /// The aggregator is only updated once the server echoes the change
    /// back over the transport, so a failed add leaves it untouched.
    #[instrument(skip(self))]
    pub async fn add_reaction(&self, message_id: &MessageId, kind: ReactionKind) -> SyncResult<()> {
        if message_id.is_empty() {
            return Err(self.record_failure(SyncError::validation("Message id must not be empty")));
        }

        match self.api.add_reaction(message_id, kind).await {
            Ok(()) => {
                tracing::debug!(message_id = %message_id, kind = %kind, "Reaction add accepted");
                Ok(())
            }
            Err(err) => Err(self.record_failure(err.into())),
        }
    }

    /// Remove own reaction from a message
    #[instrument(skip(self))]
    pub async fn remove_reaction(
        &self,
        message_id: &MessageId,
        kind: ReactionKind,
    ) -> SyncResult<()> {
        if message_id.is_empty() {
            return Err(self.record_failure(SyncError::validation("Message id must not be empty")));
        }

        match self.api.remove_reaction(message_id, kind).await {
            Ok(()) => {
                tracing::debug!(message_id = %message_id, kind = %kind, "Reaction remove accepted");
                Ok(())
            }
            Err(err) => Err(self.record_failure(err.into())),
        }
    }

    /// Notify a peer of the local typing state.
    ///
    /// Fire-and-forget: a missed typing pulse is low-stakes, so failures
    /// are swallowed rather than surfaced. Callers own the debounce
    /// discipline: a `true` must eventually be followed by a `false`
    /// within one TTL window of the last keystroke, otherwise only the
    /// peer's lazy eviction clears the stale perception.
    #[instrument(skip(self))]
    pub async fn send_typing(&self, receiver_id: &UserId, is_typing: bool) {
        if receiver_id.is_empty() {
            tracing::debug!("Typing notification dropped, empty receiver id");
            return;
        }

        if let Err(err) = self.api.send_typing(receiver_id, is_typing).await {
            tracing::debug!(
                receiver_id = %receiver_id,
                error = %err,
                "Typing notification dropped"
            );
        }
    }

    /// Update own presence status.
    ///
    /// The presence tracker is not touched locally; the server pushes the
    /// new status to every session, this one included.
    #[instrument(skip(self))]
    pub async fn update_status(&self, status: UserStatus) -> SyncResult<()> {
        match self.api.update_status(status.clone()).await {
            Ok(()) => {
                tracing::debug!(status = %status, "Status update accepted");
                Ok(())
            }
            Err(err) => Err(self.record_failure(err.into())),
        }
    }

    /// Forward an existing message to another user
    #[instrument(skip(self))]
    pub async fn forward_message(
        &self,
        original_message_id: &MessageId,
        receiver_id: &UserId,
        additional_text: Option<&str>,
    ) -> SyncResult<Message> {
        if original_message_id.is_empty() {
            return Err(self.record_failure(SyncError::validation("Message id must not be empty")));
        }
        if receiver_id.is_empty() {
            return Err(self.record_failure(SyncError::validation(
                "Receiver id must not be empty",
            )));
        }

        match self
            .api
            .forward_message(original_message_id, receiver_id, additional_text)
            .await
        {
            Ok(message) => {
                tracing::debug!(
                    original = %original_message_id,
                    forwarded = %message.id,
                    "Message forwarded"
                );
                Ok(message)
            }
            Err(err) => Err(self.record_failure(err.into())),
        }
    }

    /// Restore a soft-deleted message
    #[instrument(skip(self))]
    pub async fn restore_message(&self, message_id: &MessageId) -> SyncResult<Message> {
        if message_id.is_empty() {
            return Err(self.record_failure(SyncError::validation("Message id must not be empty")));
        }

        match self.api.restore_message(message_id).await {
            Ok(message) => Ok(message),
            Err(err) => Err(self.record_failure(err.into())),
        }
    }

    /// Aggregate statistics for one conversation over a date range
    #[instrument(skip(self))]
    pub async fn message_statistics(
        &self,
        with_user: &UserId,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> SyncResult<MessageStatistics> {
        if start_date > end_date {
            return Err(self.record_failure(SyncError::validation(
                "Start date must not be after end date",
            )));
        }

        match self
            .api
            .message_statistics(with_user, start_date, end_date)
            .await
        {
            Ok(statistics) => Ok(statistics),
            Err(err) => Err(self.record_failure(err.into())),
        }
    }

    /// Fetch the most recent messages and replace the inbound feed with
    /// them wholesale
    #[instrument(skip(self))]
    pub async fn recent_messages(&self, limit: u32) -> SyncResult<Vec<Message>> {
        let limit = limit.clamp(1, self.config.max_page_size);

        match self.api.recent_messages(limit).await {
            Ok(messages) => {
                let mut recent = self.recent.write();
                recent.clear();
                recent.extend(messages.iter().take(self.config.recent_capacity).cloned());
                drop(recent);
                Ok(messages)
            }
            Err(err) => Err(self.record_failure(err.into())),
        }
    }

    /// Requested page size, with 0 meaning the configured default and
    /// everything capped at the configured maximum
    fn effective_page_size(&self, requested: u32) -> u32 {
        if requested == 0 {
            self.config.default_page_size
        } else {
            requested.min(self.config.max_page_size)
        }
    }
}
