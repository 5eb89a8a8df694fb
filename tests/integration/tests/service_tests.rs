//! Service Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variable: DATABASE_URL
//!
//! Run with: cargo test -p integration-tests --test service_tests

use chat_core::{is_chronological, MessageKind, RowId, ThreadKind};
use chat_service::{
    ConversationService, HealthService, MessageService, ServiceError, TimelineService,
};
use chrono::{Duration, TimeZone, Utc};
use integration_tests::{audio_message, test_env, text_message, unreachable_context};

// ============================================================================
// Timeline Tests
// ============================================================================

#[tokio::test]
async fn test_timeline_interleaves_groups_and_conversations() {
    let Some(env) = test_env().await else {
        return;
    };

    let me = env.create_user("Me").await;
    let friend = env.create_user("Friend").await;
    let conversation = env.create_conversation(me, friend).await;

    let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
    env.insert_message_at(conversation, friend, "hello", Some(t1)).await;
    let g1 = env
        .create_group("Climbers", &[me, friend], Some(("see you", t1 + Duration::days(1))))
        .await;
    let g2 = env.create_group("Quiet", &[me], None).await;

    let timeline = TimelineService::new(&env.ctx).list_timeline(me).await.unwrap();
    let order: Vec<(ThreadKind, RowId)> = timeline.iter().map(|e| (e.kind, e.id)).collect();
    assert_eq!(
        order,
        vec![
            (ThreadKind::Group, g1),
            (ThreadKind::Direct, conversation),
            (ThreadKind::Group, g2),
        ]
    );
    assert_eq!(timeline[1].display_name, "Friend");
    assert_eq!(timeline[1].last_preview.as_deref(), Some("hello"));
    assert_eq!(timeline[0].display_name, "Climbers");

    env.shutdown().await;
}

#[tokio::test]
async fn test_timeline_unknown_user_is_empty() {
    let Some(env) = test_env().await else {
        return;
    };

    let timeline = TimelineService::new(&env.ctx)
        .list_timeline(RowId::new(i64::MAX))
        .await
        .unwrap();
    assert!(timeline.is_empty());

    env.shutdown().await;
}

#[tokio::test]
async fn test_timeline_skips_deleted_counterpart() {
    let Some(env) = test_env().await else {
        return;
    };

    let me = env.create_user("Me").await;
    let stays = env.create_user("Stays").await;
    let leaves = env.create_user("Leaves").await;
    let kept = env.create_conversation(me, stays).await;
    env.create_conversation(me, leaves).await;
    env.delete_user(leaves).await;

    let timeline = TimelineService::new(&env.ctx).list_timeline(me).await.unwrap();
    let ids: Vec<RowId> = timeline.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![kept]);

    env.shutdown().await;
}

#[tokio::test]
async fn test_timeline_response_json() {
    let Some(env) = test_env().await else {
        return;
    };

    let me = env.create_user("Me").await;
    let friend = env.create_user("Friend").await;
    let conversation = env.create_conversation(me, friend).await;
    ConversationService::new(&env.ctx)
        .set_liked(me, conversation, true)
        .await
        .unwrap();

    let response = TimelineService::new(&env.ctx).timeline_response(me).await.unwrap();
    let json = serde_json::to_value(&response).unwrap();
    let entry = &json[0];
    assert_eq!(entry["conversation_id"], conversation.into_inner());
    assert_eq!(entry["other_user_id"], friend.into_inner());
    assert_eq!(entry["other_display_name"], "Friend");
    assert_eq!(entry["is_group"], false);
    assert_eq!(entry["is_liked"], true);
    assert!(entry["last_message_time"].is_null());

    env.shutdown().await;
}

// ============================================================================
// Message Tests
// ============================================================================

#[tokio::test]
async fn test_send_and_list_messages() {
    let Some(env) = test_env().await else {
        return;
    };

    let a = env.create_user("A").await;
    let b = env.create_user("B").await;
    let conversation = env.create_conversation(a, b).await;
    env.set_user_color(a, "#112233").await;

    let service = MessageService::new(&env.ctx);
    let first = service.send_message(a, text_message(conversation, "one")).await.unwrap();
    let voice = service
        .send_message(b, audio_message(conversation, "voice/b.webm", 4))
        .await
        .unwrap();

    assert_eq!(first.message_color, "#112233");
    assert!(first.timestamp.is_some());
    assert_eq!(first.timestamp, first.created_at);
    assert_eq!(voice.message_type, MessageKind::Audio);
    assert_eq!(voice.audio_duration, Some(4));

    let listed = service.list_for_participant(b, conversation).await.unwrap();
    let ids: Vec<RowId> = listed.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![first.id, voice.id]);
    assert_eq!(listed[1].audio_file_path.as_deref(), Some("voice/b.webm"));

    env.shutdown().await;
}

#[tokio::test]
async fn test_concurrent_sends_stay_ordered() {
    let Some(env) = test_env().await else {
        return;
    };

    let a = env.create_user("A").await;
    let b = env.create_user("B").await;
    let conversation = env.create_conversation(a, b).await;
    let service = MessageService::new(&env.ctx);

    let (x, y, z) = tokio::join!(
        service.send_message(a, text_message(conversation, "x")),
        service.send_message(b, text_message(conversation, "y")),
        service.send_message(a, text_message(conversation, "z")),
    );
    x.unwrap();
    y.unwrap();
    z.unwrap();

    let messages = service.list_messages(conversation).await.unwrap();
    assert_eq!(messages.len(), 3);
    assert!(is_chronological(&messages));

    env.shutdown().await;
}

#[tokio::test]
async fn test_outsider_cannot_send() {
    let Some(env) = test_env().await else {
        return;
    };

    let a = env.create_user("A").await;
    let b = env.create_user("B").await;
    let outsider = env.create_user("Outsider").await;
    let conversation = env.create_conversation(a, b).await;

    let err = MessageService::new(&env.ctx)
        .send_message(outsider, text_message(conversation, "hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::AccessDenied));
    assert!(MessageService::new(&env.ctx)
        .list_messages(conversation)
        .await
        .unwrap()
        .is_empty());

    env.shutdown().await;
}

// ============================================================================
// Conversation Tests
// ============================================================================

#[tokio::test]
async fn test_like_round_trip_is_idempotent() {
    let Some(env) = test_env().await else {
        return;
    };

    let a = env.create_user("A").await;
    let b = env.create_user("B").await;
    let conversation = env.create_conversation(a, b).await;
    let service = ConversationService::new(&env.ctx);

    for _ in 0..2 {
        let response = service.set_liked(a, conversation, true).await.unwrap();
        assert!(response.success && response.is_liked);
    }
    assert!(service.is_liked(a, conversation).await.unwrap());
    assert!(!service.is_liked(b, conversation).await.unwrap());

    for _ in 0..2 {
        let response = service.set_liked(a, conversation, false).await.unwrap();
        assert!(!response.is_liked);
    }
    assert!(!service.is_liked(a, conversation).await.unwrap());

    env.shutdown().await;
}

#[tokio::test]
async fn test_open_conversation_reuses_pair() {
    let Some(env) = test_env().await else {
        return;
    };

    let a = env.create_user("A").await;
    let b = env.create_user("B").await;
    let service = ConversationService::new(&env.ctx);

    let first = service.open_conversation(a, b).await.unwrap();
    let second = service.open_conversation(b, a).await.unwrap();
    assert_eq!(first.id, second.id);
    assert!(first.involves(a) && first.involves(b));

    env.shutdown().await;
}

// ============================================================================
// Storage Tests
// ============================================================================

#[tokio::test]
async fn test_storage_health_after_writes() {
    let Some(env) = test_env().await else {
        return;
    };

    let a = env.create_user("A").await;
    let b = env.create_user("B").await;
    let conversation = env.create_conversation(a, b).await;
    MessageService::new(&env.ctx)
        .send_message(a, audio_message(conversation, "voice/a.webm", 2))
        .await
        .unwrap();

    let health = HealthService::new(&env.ctx).storage().await.unwrap();
    assert!(health.pool.initialized);
    for column in [
        "messages.message_color",
        "messages.message_type",
        "messages.audio_file_path",
        "messages.audio_duration",
    ] {
        assert_eq!(health.optional_columns.get(column), Some(&true), "{column}");
    }
    assert!(health.optional_columns.contains_key("users.message_color"));

    env.shutdown().await;
}

#[tokio::test]
async fn test_unreachable_storage_is_unavailable() {
    let ctx = unreachable_context().expect("Failed to build context");

    let err = TimelineService::new(&ctx)
        .list_timeline(RowId::new(1))
        .await
        .unwrap_err();
    assert!(err.is_unavailable());
    assert_eq!(err.status_code(), 503);

    let err = HealthService::new(&ctx).storage().await.unwrap_err();
    assert_eq!(err.status_code(), 503);

    ctx.shutdown().await;
}
