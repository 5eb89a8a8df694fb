//! Process-wide connection manager
//!
//! The pool is created lazily on first use and connects lazily, so its
//! creation never blocks. Pooled acquisition is retried with linear backoff;
//! when every pooled attempt fails a single direct connection is opened
//! instead. Connections are only handed
//! out through [`ConnectionManager::with_connection`] and
//! [`ConnectionManager::with_transaction`], which release them on every path.

use std::fmt::Display;
use std::future::Future;
use std::str::FromStr;

use chat_core::{DomainError, RepoResult};
use futures::future::BoxFuture;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgPool, PgPoolOptions};
use sqlx::{Connection, Postgres};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, instrument, warn};

use super::config::{PoolConfig, RetryPolicy};
use crate::repositories::map_db_error;

/// Where a leased connection came from
#[derive(Debug)]
pub enum Lease<P, D> {
    /// Checked out of the shared pool
    Pooled(P),
    /// Opened directly, outside the pool
    Direct(D),
}

impl<P, D> Lease<P, D> {
    pub fn is_pooled(&self) -> bool {
        matches!(self, Self::Pooled(_))
    }
}

/// A connection leased from the manager
pub type PgLease = Lease<PoolConnection<Postgres>, PgConnection>;

impl PgLease {
    fn connection(&mut self) -> &mut PgConnection {
        match self {
            Self::Pooled(conn) => &mut **conn,
            Self::Direct(conn) => conn,
        }
    }

    /// Return a pooled connection to the pool, close a direct one
    async fn release(self) {
        match self {
            Self::Pooled(conn) => drop(conn),
            Self::Direct(conn) => {
                if let Err(e) = conn.close().await {
                    warn!(error = %e, "Failed to close direct connection");
                }
            }
        }
    }
}

/// How a unit of work ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn of<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// Snapshot of the pool for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub initialized: bool,
    pub size: u32,
    pub idle: usize,
}

/// Acquire a connection: up to `policy.attempts` pooled tries, then one direct connection
pub async fn acquire_with_retry<P, D, E, PF, PFut, DF, DFut>(
    policy: &RetryPolicy,
    mut pooled: PF,
    direct: DF,
) -> RepoResult<Lease<P, D>>
where
    E: Display,
    PF: FnMut(u32) -> PFut,
    PFut: Future<Output = Result<P, E>>,
    DF: FnOnce() -> DFut,
    DFut: Future<Output = Result<D, E>>,
{
    for attempt in 1..=policy.attempts {
        match pooled(attempt).await {
            Ok(conn) => {
                if attempt > 1 {
                    debug!(attempt, "Pooled connection acquired after retry");
                }
                return Ok(Lease::Pooled(conn));
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts = policy.attempts,
                    error = %e,
                    "Failed to get connection from pool"
                );
                if attempt < policy.attempts {
                    tokio::time::sleep(policy.delay_after(attempt)).await;
                }
            }
        }
    }
    warn!("Pool exhausted, falling back to direct connection");

    match direct().await {
        Ok(conn) => Ok(Lease::Direct(conn)),
        Err(e) => {
            error!(error = %e, "Direct connection failed");
            Err(DomainError::ConnectionUnavailable(e.to_string()))
        }
    }
}

/// Lazily-initialised pool with retry and direct-connection fallback
#[derive(Debug)]
pub struct ConnectionManager {
    config: PoolConfig,
    options: PgConnectOptions,
    pool: RwLock<Option<PgPool>>,
    init: Mutex<()>,
}

impl ConnectionManager {
    /// Create a manager; no connection is opened until first use
    pub fn new(config: PoolConfig) -> Result<Self, sqlx::Error> {
        let options = PgConnectOptions::from_str(&config.url)?;
        Ok(Self {
            config,
            options,
            pool: RwLock::new(None),
            init: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// The shared pool, creating it on first call
    ///
    /// The pool connects lazily, so creating it never blocks: an unreachable
    /// server surfaces per caller as an acquire timeout, bounded by
    /// `acquire_timeout`, instead of queueing callers behind the init lock.
    async fn pool(&self) -> PgPool {
        if let Some(pool) = self.pool.read().await.as_ref() {
            return pool.clone();
        }

        let _guard = self.init.lock().await;
        if let Some(pool) = self.pool.read().await.as_ref() {
            return pool.clone();
        }

        let pool = PgPoolOptions::new()
            .max_connections(self.config.max_connections)
            .min_connections(self.config.min_connections)
            .acquire_timeout(self.config.acquire_timeout)
            .idle_timeout(Some(self.config.idle_timeout))
            .max_lifetime(Some(self.config.max_lifetime))
            .connect_lazy_with(self.options.clone());

        info!(
            url = %self.config.redacted_url(),
            max_connections = self.config.max_connections,
            min_connections = self.config.min_connections,
            "Database connection pool created"
        );
        *self.pool.write().await = Some(pool.clone());
        pool
    }

    async fn acquire(&self) -> RepoResult<PgLease> {
        let pool = self.pool().await;
        let pooled = move |_attempt: u32| {
            let pool = pool.clone();
            async move { checked(pool.acquire().await?).await }
        };

        let options = self.options.clone();
        let timeout = self.config.connect_timeout;
        let direct = move || async move {
            let conn = tokio::time::timeout(timeout, PgConnection::connect_with(&options))
                .await
                .map_err(|_| sqlx::Error::PoolTimedOut)??;
            checked(conn).await
        };

        acquire_with_retry(&self.config.retry, pooled, direct).await
    }

    /// Run `work` on a leased connection without a transaction
    pub async fn with_connection<T, F>(&self, work: F) -> RepoResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, RepoResult<T>> + Send,
    {
        let mut lease = self.acquire().await?;
        let result = work(lease.connection()).await;
        lease.release().await;
        result
    }

    /// Run `work` inside a transaction, committing on success and rolling back on failure
    pub async fn with_transaction<T, F>(&self, work: F) -> RepoResult<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, RepoResult<T>> + Send,
    {
        let mut lease = self.acquire().await?;
        let result = run_in_transaction(lease.connection(), work).await;
        lease.release().await;
        result
    }

    /// Acquire, validate and release one connection
    #[instrument(skip(self))]
    pub async fn ping(&self) -> RepoResult<()> {
        self.with_connection(|_conn| Box::pin(async { Ok(()) })).await
    }

    pub async fn status(&self) -> PoolStatus {
        match self.pool.read().await.as_ref() {
            Some(pool) => PoolStatus {
                initialized: true,
                size: pool.size(),
                idle: pool.num_idle(),
            },
            None => PoolStatus {
                initialized: false,
                size: 0,
                idle: 0,
            },
        }
    }

    /// Close every pooled connection; the next acquisition recreates the pool
    pub async fn shutdown(&self) {
        let _guard = self.init.lock().await;
        let pool = self.pool.write().await.take();
        if let Some(pool) = pool {
            pool.close().await;
            info!("Database connection pool closed");
        }
    }
}

async fn validate(conn: &mut PgConnection) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(conn).await.map(|_| ())
}

/// A freshly obtained connection that must pass a round trip before use
trait Checkout: Send + Sized {
    fn probe(&mut self) -> BoxFuture<'_, Result<(), sqlx::Error>>;

    /// Close without returning to the pool
    fn discard(self) -> BoxFuture<'static, ()>;
}

impl Checkout for PoolConnection<Postgres> {
    fn probe(&mut self) -> BoxFuture<'_, Result<(), sqlx::Error>> {
        Box::pin(validate(&mut **self))
    }

    fn discard(self) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            let _ = self.close().await;
        })
    }
}

impl Checkout for PgConnection {
    fn probe(&mut self) -> BoxFuture<'_, Result<(), sqlx::Error>> {
        Box::pin(validate(self))
    }

    fn discard(self) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            let _ = self.close().await;
        })
    }
}

/// `conn` if it answers `SELECT 1`; otherwise it is closed and the error returned
async fn checked<C: Checkout>(mut conn: C) -> Result<C, sqlx::Error> {
    match conn.probe().await {
        Ok(()) => Ok(conn),
        Err(e) => {
            conn.discard().await;
            Err(e)
        }
    }
}

async fn run_in_transaction<T, F>(conn: &mut PgConnection, work: F) -> RepoResult<T>
where
    F: for<'c> FnOnce(&'c mut PgConnection) -> BoxFuture<'c, RepoResult<T>>,
{
    let mut tx = conn.begin().await.map_err(map_db_error)?;
    let result = work(&mut *tx).await;

    match Outcome::of(&result) {
        Outcome::Success => tx.commit().await.map_err(map_db_error)?,
        Outcome::Failure => {
            if let Err(e) = tx.rollback().await {
                warn!(error = %e, "Rollback failed");
            }
        }
    }
    result
}
