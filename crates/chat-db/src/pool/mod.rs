//! Connection pool management

mod config;
mod manager;

pub use config::{PoolConfig, RetryPolicy};
pub use manager::{acquire_with_retry, ConnectionManager, Lease, Outcome, PgLease, PoolStatus};
