//! Test fixtures and data generators
//!
//! Rows are written with plain SQL so fixtures never depend on the
//! repositories they are used to test.

use std::sync::atomic::{AtomicU64, Ordering};

use chat_core::{MessageKind, RowId};
use chat_service::SendMessageRequest;
use chrono::{DateTime, Utc};

use crate::helpers::TestEnv;

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> String {
    format!(
        "{}_{}_{}",
        std::process::id(),
        Utc::now().timestamp_subsec_nanos(),
        COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}

/// Plain text message request
pub fn text_message(conversation_id: RowId, content: &str) -> SendMessageRequest {
    SendMessageRequest {
        conversation_id,
        content: content.to_string(),
        message_color: None,
        message_type: None,
        audio_file_path: None,
        audio_duration: None,
    }
}

/// Voice message request referencing externally stored audio
pub fn audio_message(conversation_id: RowId, path: &str, seconds: i32) -> SendMessageRequest {
    SendMessageRequest {
        message_type: Some(MessageKind::Audio),
        audio_file_path: Some(path.to_string()),
        audio_duration: Some(seconds),
        ..text_message(conversation_id, "Voice message")
    }
}

impl TestEnv {
    pub async fn create_user(&self, display_name: &str) -> RowId {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, display_name) VALUES ($1, $2) RETURNING id",
        )
        .bind(format!("it_{}", unique_suffix()))
        .bind(display_name)
        .fetch_one(&self.pool)
        .await
        .expect("Failed to create user");
        RowId::new(id)
    }

    pub async fn delete_user(&self, user_id: RowId) {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.into_inner())
            .execute(&self.pool)
            .await
            .expect("Failed to delete user");
    }

    /// Set the colour preference, adding the column if this deployment lacks it
    pub async fn set_user_color(&self, user_id: RowId, color: &str) {
        sqlx::query("ALTER TABLE users ADD COLUMN IF NOT EXISTS message_color VARCHAR(7)")
            .execute(&self.pool)
            .await
            .expect("Failed to add users.message_color");
        sqlx::query("UPDATE users SET message_color = $2 WHERE id = $1")
            .bind(user_id.into_inner())
            .bind(color)
            .execute(&self.pool)
            .await
            .expect("Failed to set colour");
    }

    pub async fn create_conversation(&self, a: RowId, b: RowId) -> RowId {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO conversations (user1_id, user2_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(a.into_inner())
        .bind(b.into_inner())
        .fetch_one(&self.pool)
        .await
        .expect("Failed to create conversation");
        RowId::new(id)
    }

    pub async fn insert_message_at(
        &self,
        conversation_id: RowId,
        sender_id: RowId,
        content: &str,
        timestamp: Option<DateTime<Utc>>,
    ) -> RowId {
        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO messages (conversation_id, sender_id, content, timestamp)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            ",
        )
        .bind(conversation_id.into_inner())
        .bind(sender_id.into_inner())
        .bind(content)
        .bind(timestamp)
        .fetch_one(&self.pool)
        .await
        .expect("Failed to insert message");
        RowId::new(id)
    }

    /// Group with the given members; `last_message` is posted by the first member
    pub async fn create_group(
        &self,
        name: &str,
        members: &[RowId],
        last_message: Option<(&str, DateTime<Utc>)>,
    ) -> RowId {
        let group_id: i64 = sqlx::query_scalar("INSERT INTO groups (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .expect("Failed to create group");

        for member in members {
            sqlx::query("INSERT INTO group_members (group_id, user_id) VALUES ($1, $2)")
                .bind(group_id)
                .bind(member.into_inner())
                .execute(&self.pool)
                .await
                .expect("Failed to add group member");
        }

        if let (Some(sender), Some((content, timestamp))) = (members.first(), last_message) {
            sqlx::query(
                r"
                INSERT INTO group_messages (group_id, sender_id, content, timestamp)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(group_id)
            .bind(sender.into_inner())
            .bind(content)
            .bind(timestamp)
            .execute(&self.pool)
            .await
            .expect("Failed to add group message");
        }

        RowId::new(group_id)
    }
}
