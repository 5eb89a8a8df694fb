//! Storage diagnostics entry point
//!
//! Run with:
//! ```bash
//! cargo run -p chat-service --bin chat-doctor            # pool + schema report
//! cargo run -p chat-service --bin chat-doctor -- 42      # ...plus user 42's timeline
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use std::sync::Arc;

use chat_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use chat_core::RowId;
use chat_db::{run_migrations, ConnectionManager, PoolConfig};
use chat_service::{HealthService, ServiceContext, TimelineService};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Diagnostics failed");
        eprintln!("chat-doctor: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_app(&config)) {
        eprintln!("Warning: Failed to initialize tracing: {}", e);
    }

    let user_id = std::env::args().nth(1).map(|arg| RowId::parse(&arg)).transpose()?;

    let pool_config = PoolConfig::from(&config.database);
    info!(
        env = ?config.app.env,
        database = %pool_config.redacted_url(),
        "Configuration loaded"
    );

    let manager = Arc::new(ConnectionManager::new(pool_config)?);
    let ctx = ServiceContext::postgres(manager.clone());

    let result = report(&ctx, &manager, user_id).await;
    ctx.shutdown().await;
    result
}

async fn report(
    ctx: &ServiceContext,
    manager: &ConnectionManager,
    user_id: Option<RowId>,
) -> Result<(), Box<dyn std::error::Error>> {
    run_migrations(manager).await?;

    let health = HealthService::new(ctx).storage().await?;
    println!("{}", serde_json::to_string_pretty(&health)?);

    if let Some(user_id) = user_id {
        let timeline = TimelineService::new(ctx).timeline_response(user_id).await?;
        println!("{}", serde_json::to_string_pretty(&timeline)?);
    }

    Ok(())
}
