//! PostgreSQL implementation of ConversationRepository

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgConnection;
use tracing::{debug, instrument, warn};

use chat_core::{
    participant_pair, Conversation, ConversationRepository, DomainError, RepoResult, RowId,
    TimelineEntry,
};

use crate::models::{ConversationModel, DirectThreadModel};
use crate::pool::ConnectionManager;

use super::error::map_db_error;

/// PostgreSQL implementation of ConversationRepository
#[derive(Clone)]
pub struct PgConversationRepository {
    manager: Arc<ConnectionManager>,
}

impl PgConversationRepository {
    /// Create a new PgConversationRepository
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: RowId) -> RepoResult<Option<Conversation>> {
        self.manager
            .with_connection(move |conn| {
                Box::pin(async move {
                    let result = sqlx::query_as::<_, ConversationModel>(
                        "SELECT id, user1_id, user2_id FROM conversations WHERE id = $1",
                    )
                    .bind(id.into_inner())
                    .fetch_optional(&mut *conn)
                    .await
                    .map_err(map_db_error)?;

                    Ok(result.map(Conversation::from))
                })
            })
            .await
    }

    #[instrument(skip(self))]
    async fn is_participant(&self, conversation_id: RowId, user_id: RowId) -> RepoResult<bool> {
        self.manager
            .with_connection(move |conn| {
                Box::pin(async move {
                    sqlx::query_scalar::<_, bool>(
                        r"
                        SELECT EXISTS (
                            SELECT 1 FROM conversations
                            WHERE id = $1 AND (user1_id = $2 OR user2_id = $2)
                        )
                        ",
                    )
                    .bind(conversation_id.into_inner())
                    .bind(user_id.into_inner())
                    .fetch_one(&mut *conn)
                    .await
                    .map_err(map_db_error)
                })
            })
            .await
    }

    #[instrument(skip(self))]
    async fn find_or_create(&self, user_a: RowId, user_b: RowId) -> RepoResult<Conversation> {
        let (low, high) = participant_pair(user_a, user_b)?;
        self.manager
            .with_transaction(move |conn| Box::pin(find_or_insert_pair(conn, low, high)))
            .await
    }

    #[instrument(skip(self))]
    async fn direct_timeline(&self, user_id: RowId) -> RepoResult<Option<Vec<TimelineEntry>>> {
        self.manager
            .with_transaction(move |conn| Box::pin(select_direct_threads(conn, user_id)))
            .await
    }
}

async fn find_pair(
    conn: &mut PgConnection,
    low: RowId,
    high: RowId,
) -> RepoResult<Option<ConversationModel>> {
    sqlx::query_as::<_, ConversationModel>(
        r"
        SELECT id, user1_id, user2_id
        FROM conversations
        WHERE (user1_id = $1 AND user2_id = $2) OR (user1_id = $2 AND user2_id = $1)
        ORDER BY id
        LIMIT 1
        ",
    )
    .bind(low.into_inner())
    .bind(high.into_inner())
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_db_error)
}

async fn find_or_insert_pair(
    conn: &mut PgConnection,
    low: RowId,
    high: RowId,
) -> RepoResult<Conversation> {
    if let Some(existing) = find_pair(conn, low, high).await? {
        return Ok(existing.into());
    }

    let created = sqlx::query_as::<_, ConversationModel>(
        r"
        INSERT INTO conversations (user1_id, user2_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        RETURNING id, user1_id, user2_id
        ",
    )
    .bind(low.into_inner())
    .bind(high.into_inner())
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_db_error)?;

    if let Some(model) = created {
        debug!(conversation_id = model.id, "Conversation created");
        return Ok(model.into());
    }

    // Lost the race against a concurrent insert of the same pair
    find_pair(conn, low, high)
        .await?
        .map(Conversation::from)
        .ok_or_else(|| DomainError::InternalError("conversation missing after conflict".into()))
}

async fn select_direct_threads(
    conn: &mut PgConnection,
    user_id: RowId,
) -> RepoResult<Option<Vec<TimelineEntry>>> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
        .bind(user_id.into_inner())
        .fetch_one(&mut *conn)
        .await
        .map_err(map_db_error)?;
    if !exists {
        return Ok(None);
    }

    let orphans = sqlx::query_scalar::<_, i64>(
        r"
        SELECT c.id
        FROM conversations c
        WHERE (c.user1_id = $1 OR c.user2_id = $1)
          AND NOT EXISTS (
              SELECT 1 FROM users u
              WHERE u.id = CASE WHEN c.user1_id = $1 THEN c.user2_id ELSE c.user1_id END
          )
        ",
    )
    .bind(user_id.into_inner())
    .fetch_all(&mut *conn)
    .await
    .map_err(map_db_error)?;
    for conversation_id in orphans {
        warn!(
            conversation_id,
            %user_id,
            "Conversation references a missing user, leaving it out of the timeline"
        );
    }

    let results = sqlx::query_as::<_, DirectThreadModel>(
        r"
        SELECT c.id AS conversation_id,
               u.id AS other_user_id,
               u.username AS other_username,
               u.display_name AS other_display_name,
               u.avatar_key AS other_avatar,
               lm.timestamp AS last_message_time,
               lm.content AS last_message_content,
               EXISTS (
                   SELECT 1 FROM liked_chats lc
                   WHERE lc.conversation_id = c.id AND lc.user_id = $1
               ) AS is_liked
        FROM conversations c
        JOIN users u
          ON u.id = CASE WHEN c.user1_id = $1 THEN c.user2_id ELSE c.user1_id END
        LEFT JOIN LATERAL (
            SELECT m.timestamp, m.content
            FROM messages m
            WHERE m.conversation_id = c.id
            ORDER BY COALESCE(m.timestamp, 'epoch'::timestamptz) DESC, m.id DESC
            LIMIT 1
        ) lm ON TRUE
        WHERE (c.user1_id = $1 OR c.user2_id = $1)
          AND c.user1_id <> c.user2_id
        ORDER BY lm.timestamp DESC NULLS LAST, c.id DESC
        ",
    )
    .bind(user_id.into_inner())
    .fetch_all(&mut *conn)
    .await
    .map_err(map_db_error)?;

    debug!(%user_id, count = results.len(), "Fetched direct threads");
    Ok(Some(results.into_iter().map(TimelineEntry::from).collect()))
}
