//! End-to-end scenarios for the sync engine
//!
//! Every test runs fully in-process against a fake transport and a mock
//! remote service; tests that depend on the typing TTL or on response
//! ordering run on a paused clock.
//!
//! Run with: cargo test -p integration-tests --test sync_tests

use std::time::Duration;

use collab_core::{
    ApiError, AttachmentType, ConnectionStatus, MessageId, ReactionKind, UserId, UserStatus,
};
use collab_engine::{AttachmentQuery, DateRangeQuery, SearchQuery};
use collab_state::QueryPhase;
use integration_tests::{
    connection_event, error_event, message, message_with_attachment, new_message_event, page,
    reaction_added, reaction_removed, recent_range, status_event, typing_event, TestHarness,
};
use tokio::time::advance;

// ============================================================================
// Reaction Aggregation
// ============================================================================

#[tokio::test]
async fn test_duplicate_reaction_delivery_collapses() {
    let harness = TestHarness::initialized().await.unwrap();

    harness
        .emit(reaction_added("m1", ReactionKind::Like, "u1"))
        .await;
    harness
        .emit(reaction_added("m1", ReactionKind::Like, "u1"))
        .await;

    let reactions = harness.engine.reactions_for(&MessageId::new("m1"));
    assert_eq!(reactions.len(), 1);
    let likers = &reactions[&ReactionKind::Like];
    assert_eq!(likers.len(), 1);
    assert!(likers.contains(&UserId::new("u1")));
}

#[tokio::test]
async fn test_reaction_add_remove_round_trip() {
    let harness = TestHarness::initialized().await.unwrap();

    harness
        .emit(reaction_added("m1", ReactionKind::Love, "u1"))
        .await;
    harness
        .emit(reaction_added("m1", ReactionKind::Love, "u2"))
        .await;
    harness
        .emit(reaction_removed("m1", ReactionKind::Love, "u1"))
        .await;

    let counts = harness.engine.reaction_counts_for(&MessageId::new("m1"));
    assert_eq!(counts[&ReactionKind::Love], 1);

    harness
        .emit(reaction_removed("m1", ReactionKind::Love, "u2"))
        .await;

    // Emptied kind keys are deleted, never kept with an empty set.
    assert!(harness
        .engine
        .reactions_for(&MessageId::new("m1"))
        .is_empty());
}

#[tokio::test]
async fn test_remove_for_never_added_reaction_is_noop() {
    let harness = TestHarness::initialized().await.unwrap();

    harness
        .emit(reaction_removed("m1", ReactionKind::Wow, "u9"))
        .await;

    assert!(harness
        .engine
        .reactions_for(&MessageId::new("m1"))
        .is_empty());
}

#[tokio::test]
async fn test_failed_reaction_add_leaves_aggregate_untouched() {
    let harness = TestHarness::initialized().await.unwrap();
    harness
        .api
        .set_reaction_response(Err(ApiError::server(500, "boom")));

    let err = harness
        .engine
        .add_reaction(&MessageId::new("m1"), ReactionKind::Like)
        .await
        .unwrap_err();

    assert!(!err.is_validation());
    assert!(harness
        .engine
        .reactions_for(&MessageId::new("m1"))
        .is_empty());
    assert!(harness.engine.last_error().unwrap().contains("boom"));
}

#[tokio::test]
async fn test_reaction_add_applies_only_via_server_echo() {
    let harness = TestHarness::initialized().await.unwrap();

    harness
        .engine
        .add_reaction(&MessageId::new("m1"), ReactionKind::Like)
        .await
        .unwrap();

    // Accepted by the server but not yet echoed: nothing applied locally.
    assert!(harness
        .engine
        .reactions_for(&MessageId::new("m1"))
        .is_empty());

    harness
        .emit(reaction_added("m1", ReactionKind::Like, "me"))
        .await;
    assert_eq!(
        harness.engine.reaction_counts_for(&MessageId::new("m1"))[&ReactionKind::Like],
        1
    );
}

// ============================================================================
// Typing Indicators
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_typing_expires_after_ttl() {
    let harness = TestHarness::initialized().await.unwrap();

    harness.emit(typing_event("u2", true)).await;
    assert!(harness.engine.is_user_typing(&UserId::new("u2")));

    advance(Duration::from_millis(3500)).await;
    assert!(!harness.engine.is_user_typing(&UserId::new("u2")));
    // The stale read evicted the entry; a second read stays false.
    assert!(!harness.engine.is_user_typing(&UserId::new("u2")));
}

#[tokio::test(start_paused = true)]
async fn test_typing_ttl_boundary() {
    let harness = TestHarness::initialized().await.unwrap();

    harness.emit(typing_event("u2", true)).await;

    advance(Duration::from_millis(2999)).await;
    assert!(harness.engine.is_user_typing(&UserId::new("u2")));

    advance(Duration::from_millis(1)).await;
    assert!(!harness.engine.is_user_typing(&UserId::new("u2")));
}

#[tokio::test]
async fn test_typing_false_event_clears_immediately() {
    let harness = TestHarness::initialized().await.unwrap();

    harness.emit(typing_event("u2", true)).await;
    harness.emit(typing_event("u2", false)).await;

    assert!(!harness.engine.is_user_typing(&UserId::new("u2")));
}

#[tokio::test]
async fn test_send_typing_is_fire_and_forget() {
    let harness = TestHarness::initialized().await.unwrap();
    harness
        .api
        .set_typing_response(Err(ApiError::network("offline")));

    harness.engine.send_typing(&UserId::new("u2"), true).await;

    // The failure is swallowed, not surfaced.
    assert!(harness.engine.last_error().is_none());
    assert_eq!(harness.api.typing_calls().len(), 1);
    assert_eq!(harness.api.typing_calls()[0], (UserId::new("u2"), true));
}

// ============================================================================
// Presence
// ============================================================================

#[tokio::test]
async fn test_presence_last_write_wins() {
    let harness = TestHarness::initialized().await.unwrap();

    harness.emit(status_event("u3", UserStatus::Online)).await;
    assert!(harness.engine.is_user_online(&UserId::new("u3")));

    harness.emit(status_event("u3", UserStatus::Busy)).await;
    assert!(!harness.engine.is_user_online(&UserId::new("u3")));
    assert_eq!(
        harness.engine.status_of(&UserId::new("u3")),
        Some(UserStatus::Busy)
    );
}

#[tokio::test]
async fn test_unknown_status_string_is_accepted() {
    let harness = TestHarness::initialized().await.unwrap();

    harness
        .emit(status_event("u3", UserStatus::parse("streaming")))
        .await;

    assert!(!harness.engine.is_user_online(&UserId::new("u3")));
    assert_eq!(
        harness.engine.status_of(&UserId::new("u3")),
        Some(UserStatus::Other("streaming".to_string()))
    );
}

#[tokio::test]
async fn test_own_status_update_round_trips_through_echo() {
    let harness = TestHarness::initialized().await.unwrap();

    harness
        .engine
        .update_status(UserStatus::Away)
        .await
        .unwrap();
    assert_eq!(harness.api.status_calls(), vec![UserStatus::Away]);

    // Not applied locally until the server echoes it back.
    assert_eq!(harness.engine.status_of(&UserId::new("me")), None);

    harness.emit(status_event("me", UserStatus::Away)).await;
    assert_eq!(
        harness.engine.status_of(&UserId::new("me")),
        Some(UserStatus::Away)
    );
}

// ============================================================================
// Query Sessions
// ============================================================================

#[tokio::test]
async fn test_empty_keyword_rejected_without_touching_service() {
    let harness = TestHarness::initialized().await.unwrap();

    let err = harness
        .engine
        .search_messages(SearchQuery::new("", UserId::new("u2")))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(harness.api.search_calls().is_empty());
    assert_eq!(harness.engine.search_state().phase, QueryPhase::Idle);
}

#[tokio::test]
async fn test_search_success_populates_session() {
    let harness = TestHarness::initialized().await.unwrap();
    harness.api.enqueue_search(Ok(page(&["m1", "m2"], false)));

    let result = harness
        .engine
        .search_messages(SearchQuery::new("hello", UserId::new("u2")))
        .await
        .unwrap();

    assert_eq!(result.messages.len(), 2);
    assert!(!result.last);

    let state = harness.engine.search_state();
    assert_eq!(state.phase, QueryPhase::Success);
    assert_eq!(state.messages.len(), 2);
    assert!(!state.last_page_final);

    let calls = harness.api.search_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].keyword, "hello");
    assert_eq!(calls[0].with_user, UserId::new("u2"));
}

#[tokio::test(start_paused = true)]
async fn test_sessions_never_share_loading_state() {
    let harness = TestHarness::initialized().await.unwrap();

    // The keyword search stalls at the network round-trip.
    harness
        .api
        .enqueue_search_delayed(Duration::from_secs(60), Ok(page(&["m1"], true)));
    harness
        .api
        .set_date_range_response(Ok(page(&["m5"], true)));

    let engine = harness.engine.clone();
    let search = tokio::spawn(async move {
        engine
            .search_messages(SearchQuery::new("hello", UserId::new("u2")))
            .await
    });
    // Let the search reach its round-trip before running the other query.
    integration_tests::pump().await;
    assert_eq!(harness.engine.search_state().phase, QueryPhase::Loading);

    let (start, end) = recent_range(7);
    harness
        .engine
        .messages_by_date_range(DateRangeQuery::new(UserId::new("u2"), start, end))
        .await
        .unwrap();

    // The date-range completion left the keyword search loading.
    assert_eq!(harness.engine.date_range_state().phase, QueryPhase::Success);
    assert_eq!(harness.engine.search_state().phase, QueryPhase::Loading);

    search.await.unwrap().unwrap();
    assert_eq!(harness.engine.search_state().phase, QueryPhase::Success);
    assert_eq!(harness.engine.date_range_state().messages.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_latest_search_wins_over_slow_earlier_one() {
    let harness = TestHarness::initialized().await.unwrap();

    harness
        .api
        .enqueue_search_delayed(Duration::from_secs(30), Ok(page(&["old"], true)));
    harness.api.enqueue_search(Ok(page(&["new"], true)));

    let engine = harness.engine.clone();
    let slow = tokio::spawn(async move {
        engine
            .search_messages(SearchQuery::new("first", UserId::new("u2")))
            .await
    });
    integration_tests::pump().await;

    harness
        .engine
        .search_messages(SearchQuery::new("second", UserId::new("u2")))
        .await
        .unwrap();

    // The slow earlier response resolves afterwards but is discarded.
    slow.await.unwrap().unwrap();

    let state = harness.engine.search_state();
    assert_eq!(state.phase, QueryPhase::Success);
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].id, MessageId::new("new"));
}

#[tokio::test]
async fn test_search_failure_surfaces_and_keeps_sessions_separate() {
    let harness = TestHarness::initialized().await.unwrap();
    harness
        .api
        .enqueue_search(Err(ApiError::server(502, "bad gateway")));
    harness
        .api
        .set_attachments_response(Ok(page(&["m3"], true)));

    let err = harness
        .engine
        .search_messages(SearchQuery::new("hello", UserId::new("u2")))
        .await
        .unwrap_err();
    assert!(!err.is_validation());

    harness
        .engine
        .messages_with_attachments(AttachmentQuery::new(
            UserId::new("u2"),
            AttachmentType::Image,
        ))
        .await
        .unwrap();

    assert_eq!(harness.engine.search_state().phase, QueryPhase::Error);
    assert_eq!(harness.engine.attachment_state().phase, QueryPhase::Success);
    assert!(harness.engine.last_error().unwrap().contains("bad gateway"));
}

#[tokio::test]
async fn test_attachment_query_records_filter_arguments() {
    let harness = TestHarness::initialized().await.unwrap();
    harness.api.set_attachments_response(Ok(collab_core::MessagePage {
        messages: vec![message_with_attachment("m4", AttachmentType::Video)],
        last: true,
    }));

    let result = harness
        .engine
        .messages_with_attachments(AttachmentQuery::new(
            UserId::new("u2"),
            AttachmentType::Video,
        ))
        .await
        .unwrap();

    assert!(result.messages[0].has_attachment_of(AttachmentType::Video));

    let calls = harness.api.attachment_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, AttachmentType::Video);
}

#[tokio::test]
async fn test_inverted_date_range_rejected() {
    let harness = TestHarness::initialized().await.unwrap();

    let (start, end) = recent_range(7);
    let err = harness
        .engine
        .messages_by_date_range(DateRangeQuery::new(UserId::new("u2"), end, start))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(harness.api.date_range_calls().is_empty());
}

#[tokio::test]
async fn test_session_clear_resets_to_idle() {
    let harness = TestHarness::initialized().await.unwrap();
    harness.api.enqueue_search(Ok(page(&["m1"], true)));

    harness
        .engine
        .search_messages(SearchQuery::new("hello", UserId::new("u2")))
        .await
        .unwrap();
    assert_eq!(harness.engine.search_state().phase, QueryPhase::Success);

    harness.engine.clear_search();
    let state = harness.engine.search_state();
    assert_eq!(state.phase, QueryPhase::Idle);
    assert!(state.messages.is_empty());
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_double_initialize_subscribes_once_and_applies_once() {
    let harness = TestHarness::initialized().await.unwrap();
    harness.engine.initialize().await.unwrap();

    assert_eq!(harness.transport.subscribe_count(), 1);

    harness.emit(new_message_event("m1")).await;
    // A doubled subscription would apply the event twice.
    assert_eq!(harness.engine.recent_feed().len(), 1);
}

#[tokio::test]
async fn test_teardown_clears_every_store() {
    let harness = TestHarness::initialized().await.unwrap();

    harness.emit(status_event("u3", UserStatus::Online)).await;
    harness.emit(typing_event("u2", true)).await;
    harness
        .emit(reaction_added("m1", ReactionKind::Like, "u1"))
        .await;
    harness.emit(new_message_event("m2")).await;
    harness
        .emit(connection_event(ConnectionStatus::Connected))
        .await;
    harness.emit(error_event("blip")).await;

    harness.engine.teardown().await;

    assert!(!harness.engine.is_user_online(&UserId::new("u3")));
    assert!(!harness.engine.is_user_typing(&UserId::new("u2")));
    assert!(harness
        .engine
        .reactions_for(&MessageId::new("m1"))
        .is_empty());
    assert!(harness.engine.recent_feed().is_empty());
    assert_eq!(
        harness.engine.connection_status(),
        ConnectionStatus::Disconnected
    );
    assert!(harness.engine.last_error().is_none());
    assert_eq!(harness.transport.unsubscribe_count(), 1);
}

#[tokio::test]
async fn test_teardown_then_initialize_restores_functionality() {
    let harness = TestHarness::initialized().await.unwrap();

    harness.engine.teardown().await;
    harness.engine.initialize().await.unwrap();
    assert_eq!(harness.transport.subscribe_count(), 2);

    harness.emit(typing_event("u2", true)).await;
    assert!(harness.engine.is_user_typing(&UserId::new("u2")));
}

// ============================================================================
// Connection & Error Surface
// ============================================================================

#[tokio::test]
async fn test_connection_error_is_not_terminal() {
    let harness = TestHarness::initialized().await.unwrap();

    harness
        .emit(connection_event(ConnectionStatus::Connecting))
        .await;
    harness
        .emit(connection_event(ConnectionStatus::Connected))
        .await;
    harness
        .emit(connection_event(ConnectionStatus::Error))
        .await;
    assert_eq!(harness.engine.connection_status(), ConnectionStatus::Error);

    harness
        .emit(connection_event(ConnectionStatus::Connected))
        .await;
    assert_eq!(
        harness.engine.connection_status(),
        ConnectionStatus::Connected
    );
}

#[tokio::test]
async fn test_transport_error_keeps_stores_and_needs_explicit_clear() {
    let harness = TestHarness::initialized().await.unwrap();

    harness.emit(status_event("u3", UserStatus::Online)).await;
    harness.emit(error_event("heartbeat missed")).await;

    assert_eq!(
        harness.engine.last_error().as_deref(),
        Some("heartbeat missed")
    );
    assert!(harness.engine.is_user_online(&UserId::new("u3")));

    // The slot does not auto-clear.
    assert!(harness.engine.last_error().is_some());
    harness.engine.clear_error();
    assert!(harness.engine.last_error().is_none());
}

// ============================================================================
// Feed & Pass-Through Operations
// ============================================================================

#[tokio::test]
async fn test_recent_messages_replaces_feed_wholesale() {
    let harness = TestHarness::initialized().await.unwrap();

    harness.emit(new_message_event("old")).await;
    harness
        .api
        .set_recent_response(Ok(vec![message("m7"), message("m8")]));

    let messages = harness.engine.recent_messages(10).await.unwrap();
    assert_eq!(messages.len(), 2);

    let feed = harness.engine.recent_feed();
    assert_eq!(feed.len(), 2);
    assert!(feed.iter().all(|m| m.id != MessageId::new("old")));
}

#[tokio::test]
async fn test_forward_message_round_trip() {
    let harness = TestHarness::initialized().await.unwrap();

    let forwarded = harness
        .engine
        .forward_message(&MessageId::new("m1"), &UserId::new("u2"), Some("fyi"))
        .await
        .unwrap();

    assert_eq!(forwarded.forwarded_from, Some(MessageId::new("m1")));
    let calls = harness.api.forward_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].2.as_deref(), Some("fyi"));
}

#[tokio::test]
async fn test_statistics_pass_through() {
    let harness = TestHarness::initialized().await.unwrap();

    let (start, end) = recent_range(30);
    let statistics = harness
        .engine
        .message_statistics(&UserId::new("u2"), start, end)
        .await
        .unwrap();

    assert!(statistics.is_consistent());
    assert_eq!(statistics.total_messages, 12);
}

// ============================================================================
// Wire Format
// ============================================================================

#[tokio::test]
async fn test_wire_encoded_event_dispatches() {
    let harness = TestHarness::initialized().await.unwrap();

    let raw = r#"{
        "type": "REACTION",
        "message_id": "m1",
        "reaction_kind": "laugh",
        "user_id": "u5",
        "action": "added"
    }"#;
    let event: collab_core::SyncEvent = serde_json::from_str(raw).unwrap();
    harness.emit(event).await;

    assert_eq!(
        harness.engine.reaction_counts_for(&MessageId::new("m1"))[&ReactionKind::Laugh],
        1
    );
}

// ============================================================================
// Multi-Session Isolation
// ============================================================================

#[tokio::test]
async fn test_engines_do_not_share_state() {
    let first = TestHarness::initialized().await.unwrap();
    let second = TestHarness::initialized().await.unwrap();

    first.emit(typing_event("u2", true)).await;

    assert!(first.engine.is_user_typing(&UserId::new("u2")));
    assert!(!second.engine.is_user_typing(&UserId::new("u2")));
    assert_ne!(first.engine.session_id(), second.engine.session_id());
}
