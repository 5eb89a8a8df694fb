//! Shared fixtures for database tests
//!
//! Fixtures write through a plain `PgPool` so they never depend on the code
//! under test.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use chat_core::RowId;
use chat_db::{run_migrations, ConnectionManager, PoolConfig};

pub struct TestDb {
    pub manager: Arc<ConnectionManager>,
    pub pool: PgPool,
}

/// Connect and migrate, or `None` when DATABASE_URL is unset or unreachable
pub async fn test_db() -> Option<TestDb> {
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let manager = ConnectionManager::new(PoolConfig::with_url(database_url.clone())).ok()?;
    run_migrations(&manager).await.ok()?;
    let pool = PgPool::connect(&database_url).await.ok()?;
    Some(TestDb {
        manager: Arc::new(manager),
        pool,
    })
}

fn unique_suffix() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!(
        "{}_{}_{}",
        std::process::id(),
        nanos % 1_000_000_000,
        COUNTER.fetch_add(1, Ordering::SeqCst)
    )
}

impl TestDb {
    pub async fn create_user(&self, display_name: Option<&str>) -> RowId {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, display_name) VALUES ($1, $2) RETURNING id",
        )
        .bind(format!("u_{}", unique_suffix()))
        .bind(display_name)
        .fetch_one(&self.pool)
        .await
        .expect("Failed to create user");
        RowId::new(id)
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

    pub async fn delete_user(&self, user_id: RowId) {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id.into_inner())
            .execute(&self.pool)
            .await
            .expect("Failed to delete user");
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

    /// Insert a message with an explicit (possibly missing) timestamp
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

    /// Overwrite a message's stored colour, adding the column if this deployment lacks it
    pub async fn set_message_color(&self, message_id: RowId, color: &str) {
        sqlx::query("ALTER TABLE messages ADD COLUMN IF NOT EXISTS message_color VARCHAR(7) DEFAULT '#6b7280'")
            .execute(&self.pool)
            .await
            .expect("Failed to add messages.message_color");
        sqlx::query("UPDATE messages SET message_color = $2 WHERE id = $1")
            .bind(message_id.into_inner())
            .bind(color)
            .execute(&self.pool)
            .await
            .expect("Failed to set message colour");
    }

    pub async fn liked_rows(&self, user_id: RowId, conversation_id: RowId) -> i64 {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM liked_chats WHERE user_id = $1 AND conversation_id = $2",
        )
        .bind(user_id.into_inner())
        .bind(conversation_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .expect("Failed to count liked rows")
    }

    /// Create a group with the given members and one message
    pub async fn create_group(&self, name: &str, members: &[RowId], last_message: &str) -> RowId {
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

        if let Some(sender) = members.first() {
            sqlx::query(
                "INSERT INTO group_messages (group_id, sender_id, content) VALUES ($1, $2, $3)",
            )
            .bind(group_id)
            .bind(sender.into_inner())
            .bind(last_message)
            .execute(&self.pool)
            .await
            .expect("Failed to add group message");
        }

        RowId::new(group_id)
    }
}
