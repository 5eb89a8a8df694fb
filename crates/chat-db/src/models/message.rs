//! Message database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for a message read joined with its sender
///
/// Optional columns are selected as typed `NULL`s when the deployment does
/// not have them, so the row shape never changes.
#[derive(Debug, Clone, FromRow)]
pub struct MessageModel {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub message_color: Option<String>,
    pub message_type: Option<String>,
    pub audio_file_path: Option<String>,
    pub audio_duration: Option<i32>,
    pub sender_avatar: Option<String>,
}

/// Values the store assigns on insert
#[derive(Debug, Clone, FromRow)]
pub struct InsertedMessageModel {
    pub id: i64,
    pub timestamp: Option<DateTime<Utc>>,
    pub sender_avatar: Option<String>,
}
