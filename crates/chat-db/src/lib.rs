//! # chat-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for the repository traits
//! defined in `chat-core`. It handles:
//!
//! - Lazy connection pooling with retry and direct-connection fallback
//! - Transaction scoping that releases connections on every path
//! - Probing and adding optional columns on older deployments
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use chat_core::MessageRepository;
//! use chat_db::{ConnectionManager, PgMessageRepository, PoolConfig};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let manager = Arc::new(ConnectionManager::new(PoolConfig::with_url(
//!         "postgres://localhost/chat_db",
//!     ))?);
//!     let messages = PgMessageRepository::new(manager.clone());
//!
//!     let history = messages.list_by_conversation(1.into()).await?;
//!     manager.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod migrate;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use migrate::{run_migrations, run_migrations_from, MIGRATIONS_DIR};
pub use pool::{ConnectionManager, PoolConfig, PoolStatus, RetryPolicy};
pub use repositories::{
    PgConversationRepository, PgGroupMembership, PgLikedRepository, PgMessageRepository,
    PgUserRepository,
};
pub use schema::{OptionalColumn, SchemaProbe};
