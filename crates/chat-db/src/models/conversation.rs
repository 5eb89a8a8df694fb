//! Conversation database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for conversations table
#[derive(Debug, Clone, FromRow)]
pub struct ConversationModel {
    pub id: i64,
    pub user1_id: i64,
    pub user2_id: i64,
}

/// One direct conversation as seen by the requesting user
#[derive(Debug, Clone, FromRow)]
pub struct DirectThreadModel {
    pub conversation_id: i64,
    pub other_user_id: i64,
    pub other_username: String,
    pub other_display_name: Option<String>,
    pub other_avatar: Option<String>,
    pub last_message_time: Option<DateTime<Utc>>,
    pub last_message_content: Option<String>,
    pub is_liked: bool,
}
