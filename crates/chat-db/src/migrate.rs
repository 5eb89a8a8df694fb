//! Schema migrations
//!
//! Migrations are read from disk at runtime so the crate builds without a
//! database.

use std::path::Path;

use chat_core::{DomainError, RepoResult};
use sqlx::migrate::Migrator;
use tracing::info;

use crate::pool::ConnectionManager;

/// Migrations shipped with this crate
pub const MIGRATIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/migrations");

/// Apply the bundled migrations
pub async fn run_migrations(manager: &ConnectionManager) -> RepoResult<()> {
    run_migrations_from(manager, Path::new(MIGRATIONS_DIR)).await
}

/// Apply migrations from `dir`
pub async fn run_migrations_from(manager: &ConnectionManager, dir: &Path) -> RepoResult<()> {
    let migrator = Migrator::new(dir)
        .await
        .map_err(|e| DomainError::InternalError(format!("failed to load migrations: {e}")))?;
    let count = migrator.iter().count();

    manager
        .with_connection(move |conn| {
            Box::pin(async move {
                migrator
                    .run_direct(conn)
                    .await
                    .map_err(|e| DomainError::DatabaseError(format!("migration failed: {e}")))
            })
        })
        .await?;

    info!(migrations = count, "Database migrations applied");
    Ok(())
}
