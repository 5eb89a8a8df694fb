//! PostgreSQL implementation of LikedRepository

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use chat_core::{LikedRepository, RepoResult, RowId};

use crate::pool::ConnectionManager;

use super::error::{conversation_not_found, map_db_error, map_foreign_key_violation};

/// PostgreSQL implementation of LikedRepository
///
/// Both directions are idempotent: liking twice keeps one mark, unliking an
/// unmarked conversation deletes nothing.
#[derive(Clone)]
pub struct PgLikedRepository {
    manager: Arc<ConnectionManager>,
}

impl PgLikedRepository {
    /// Create a new PgLikedRepository
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl LikedRepository for PgLikedRepository {
    #[instrument(skip(self))]
    async fn set_liked(
        &self,
        user_id: RowId,
        conversation_id: RowId,
        liked: bool,
    ) -> RepoResult<()> {
        self.manager
            .with_transaction(move |conn| {
                Box::pin(async move {
                    let affected = if liked {
                        sqlx::query(
                            r"
                            INSERT INTO liked_chats (user_id, conversation_id)
                            SELECT $1, $2
                            WHERE NOT EXISTS (
                                SELECT 1 FROM liked_chats
                                WHERE user_id = $1 AND conversation_id = $2
                            )
                            ON CONFLICT DO NOTHING
                            ",
                        )
                        .bind(user_id.into_inner())
                        .bind(conversation_id.into_inner())
                        .execute(&mut *conn)
                        .await
                        .map_err(|e| {
                            map_foreign_key_violation(e, || conversation_not_found(conversation_id))
                        })?
                    } else {
                        sqlx::query(
                            "DELETE FROM liked_chats WHERE user_id = $1 AND conversation_id = $2",
                        )
                        .bind(user_id.into_inner())
                        .bind(conversation_id.into_inner())
                        .execute(&mut *conn)
                        .await
                        .map_err(map_db_error)?
                    };

                    debug!(rows = affected.rows_affected(), "Liked mark updated");
                    Ok(())
                })
            })
            .await
    }

    #[instrument(skip(self))]
    async fn is_liked(&self, user_id: RowId, conversation_id: RowId) -> RepoResult<bool> {
        self.manager
            .with_connection(move |conn| {
                Box::pin(async move {
                    sqlx::query_scalar::<_, bool>(
                        r"
                        SELECT EXISTS (
                            SELECT 1 FROM liked_chats
                            WHERE user_id = $1 AND conversation_id = $2
                        )
                        ",
                    )
                    .bind(user_id.into_inner())
                    .bind(conversation_id.into_inner())
                    .fetch_one(&mut *conn)
                    .await
                    .map_err(map_db_error)
                })
            })
            .await
    }
}
