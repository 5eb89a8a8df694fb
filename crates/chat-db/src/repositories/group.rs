//! PostgreSQL adapter for group membership
//!
//! Group chat is owned by a separate subsystem; this adapter only reads the
//! summary the timeline needs from its tables.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use chat_core::{DomainError, GroupMembership, GroupSummary, RepoResult, RowId};

use crate::models::GroupSummaryModel;
use crate::pool::ConnectionManager;

/// Reads joined groups from the `groups`, `group_members`, `group_messages`
/// and `liked_groups` tables
#[derive(Clone)]
pub struct PgGroupMembership {
    manager: Arc<ConnectionManager>,
}

impl PgGroupMembership {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl GroupMembership for PgGroupMembership {
    #[instrument(skip(self))]
    async fn joined_groups(&self, user_id: RowId) -> RepoResult<Vec<GroupSummary>> {
        self.manager
            .with_connection(move |conn| {
                Box::pin(async move {
                    let results = sqlx::query_as::<_, GroupSummaryModel>(
                        r"
                        SELECT g.id AS group_id,
                               g.name,
                               lm.timestamp AS last_message_time,
                               lm.content AS last_message_content,
                               EXISTS (
                                   SELECT 1 FROM liked_groups lg
                                   WHERE lg.group_id = g.id AND lg.user_id = $1
                               ) AS liked
                        FROM groups g
                        JOIN group_members gm ON gm.group_id = g.id AND gm.user_id = $1
                        LEFT JOIN LATERAL (
                            SELECT msg.timestamp, msg.content
                            FROM group_messages msg
                            WHERE msg.group_id = g.id
                            ORDER BY COALESCE(msg.timestamp, 'epoch'::timestamptz) DESC, msg.id DESC
                            LIMIT 1
                        ) lm ON TRUE
                        ORDER BY lm.timestamp DESC NULLS LAST, g.id DESC
                        ",
                    )
                    .bind(user_id.into_inner())
                    .fetch_all(&mut *conn)
                    .await
                    .map_err(|e| DomainError::GroupServiceError(e.to_string()))?;

                    Ok(results.into_iter().map(GroupSummary::from).collect())
                })
            })
            .await
    }
}
