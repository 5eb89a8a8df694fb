//! Storage health service

use std::collections::BTreeMap;

use chat_db::SchemaProbe;
use tracing::{info, instrument, warn};

use crate::dto::{PoolHealth, StorageHealthResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Reports pool state and which optional columns the schema carries
pub struct HealthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> HealthService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn storage(&self) -> ServiceResult<StorageHealthResponse> {
        let manager = self
            .ctx
            .connections()
            .ok_or_else(|| ServiceError::internal("service context has no database connection"))?;

        if let Err(e) = manager.ping().await {
            warn!(error = %e, "Storage ping failed");
            return Err(e.into());
        }

        let columns = manager
            .with_connection(|conn| {
                Box::pin(async move {
                    let mut probe = SchemaProbe::new();
                    probe.snapshot(conn).await
                })
            })
            .await?;

        let optional_columns: BTreeMap<String, bool> = columns
            .into_iter()
            .map(|(column, present)| (column.to_string(), present))
            .collect();

        let status = manager.status().await;
        let response = StorageHealthResponse::new(
            PoolHealth {
                initialized: status.initialized,
                size: status.size,
                idle: status.idle,
            },
            optional_columns,
        );

        info!(status = %response.status, pool_size = status.size, "Storage health checked");
        Ok(response)
    }
}
