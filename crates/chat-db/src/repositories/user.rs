//! PostgreSQL implementation of UserRepository

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use chat_core::{RepoResult, RowId, User, UserRepository};

use crate::models::UserModel;
use crate::pool::ConnectionManager;
use crate::schema::{OptionalColumn, SchemaProbe};

use super::error::map_db_error;

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    manager: Arc<ConnectionManager>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: RowId) -> RepoResult<Option<User>> {
        self.manager
            .with_connection(move |conn| {
                Box::pin(async move {
                    let mut probe = SchemaProbe::new();
                    let column = OptionalColumn::UserMessageColor;
                    let color = column.select_expr("u", probe.has_column(conn, column).await?);

                    let sql = format!(
                        r"
                        SELECT u.id, u.username, u.display_name, u.avatar_key, {color}
                        FROM users u
                        WHERE u.id = $1
                        "
                    );
                    let result = sqlx::query_as::<_, UserModel>(&sql)
                        .bind(id.into_inner())
                        .fetch_optional(&mut *conn)
                        .await
                        .map_err(map_db_error)?;

                    Ok(result.map(User::from))
                })
            })
            .await
    }

    #[instrument(skip(self))]
    async fn exists(&self, id: RowId) -> RepoResult<bool> {
        self.manager
            .with_connection(move |conn| {
                Box::pin(async move {
                    sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                        .bind(id.into_inner())
                        .fetch_one(&mut *conn)
                        .await
                        .map_err(map_db_error)
                })
            })
            .await
    }
}
