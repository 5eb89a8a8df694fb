use std::collections::HashMap;

use chat_core::RepoResult;
use sqlx::{Connection, PgConnection};
use tracing::{debug, info, warn};

use super::columns::OptionalColumn;
use crate::repositories::{is_duplicate_column, map_db_error};

/// Column-existence answers for the duration of one operation
///
/// Built fresh per operation so a column added by another process is seen on
/// the next call.
#[derive(Debug, Default)]
pub struct SchemaProbe {
    known: HashMap<OptionalColumn, bool>,
}

impl SchemaProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the column exists in the connection's current schema
    pub async fn has_column(
        &mut self,
        conn: &mut PgConnection,
        column: OptionalColumn,
    ) -> RepoResult<bool> {
        if let Some(&present) = self.known.get(&column) {
            return Ok(present);
        }

        let present = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.columns
                WHERE table_schema = current_schema()
                  AND table_name = $1
                  AND column_name = $2
            )
            ",
        )
        .bind(column.table())
        .bind(column.column())
        .fetch_one(&mut *conn)
        .await
        .map_err(map_db_error)?;

        self.known.insert(column, present);
        Ok(present)
    }

    /// Presence of every optional column
    pub async fn snapshot(
        &mut self,
        conn: &mut PgConnection,
    ) -> RepoResult<Vec<(OptionalColumn, bool)>> {
        let mut columns = Vec::with_capacity(OptionalColumn::ALL.len());
        for column in OptionalColumn::ALL {
            columns.push((column, self.has_column(conn, column).await?));
        }
        Ok(columns)
    }

    /// Add the column if missing and report whether it exists afterwards
    ///
    /// The `ALTER TABLE` runs under a savepoint so a failure leaves the
    /// caller's transaction usable. Losing a race with a concurrent writer
    /// that added the same column counts as success.
    pub async fn ensure_column(
        &mut self,
        conn: &mut PgConnection,
        column: OptionalColumn,
    ) -> RepoResult<bool> {
        if self.has_column(conn, column).await? {
            return Ok(true);
        }

        let sql = column.add_column_sql();
        let mut savepoint = conn.begin().await.map_err(map_db_error)?;
        match sqlx::query(&sql).execute(&mut *savepoint).await {
            Ok(_) => {
                savepoint.commit().await.map_err(map_db_error)?;
                info!(%column, "Added missing column");
            }
            Err(e) if is_duplicate_column(&e) => {
                savepoint.rollback().await.map_err(map_db_error)?;
                debug!(%column, "Column added concurrently");
            }
            Err(e) => {
                if let Err(rollback) = savepoint.rollback().await {
                    warn!(%column, error = %rollback, "Savepoint rollback failed");
                }
                return Err(map_db_error(e));
            }
        }

        self.known.remove(&column);
        self.has_column(conn, column).await
    }

    /// [`Self::ensure_column`] that degrades to `false` instead of failing the write
    pub async fn try_ensure(&mut self, conn: &mut PgConnection, column: OptionalColumn) -> bool {
        match self.ensure_column(conn, column).await {
            Ok(present) => present,
            Err(e) => {
                warn!(%column, error = %e, "Could not add column, writing without it");
                self.known.insert(column, false);
                false
            }
        }
    }
}
