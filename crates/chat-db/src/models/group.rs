//! Group membership read model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct GroupSummaryModel {
    pub group_id: i64,
    pub name: String,
    pub last_message_time: Option<DateTime<Utc>>,
    pub last_message_content: Option<String>,
    pub liked: bool,
}
