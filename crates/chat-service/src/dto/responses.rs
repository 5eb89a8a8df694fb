//! Response DTOs
//!
//! Field names follow the chat feed's JSON. Ids serialize as numbers,
//! timestamps as RFC 3339 strings or `null`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use chat_core::{MessageKind, RowId};

// ============================================================================
// Timeline Responses
// ============================================================================

/// One row of the merged conversation/group list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntryResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<RowId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<RowId>,
    pub is_group: bool,
    pub other_user_id: Option<RowId>,
    pub other_username: Option<String>,
    /// Counterpart's display name, or the group name
    pub other_display_name: String,
    pub other_avatar: Option<String>,
    pub last_message_time: Option<DateTime<Utc>>,
    pub last_message_content: Option<String>,
    pub is_liked: bool,
}

// ============================================================================
// Message Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageResponse {
    pub id: RowId,
    pub conversation_id: RowId,
    pub sender_id: RowId,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    /// Same instant as `timestamp`
    pub created_at: Option<DateTime<Utc>>,
    pub sender_avatar: Option<String>,
    pub message_color: String,
    pub message_type: MessageKind,
    pub audio_file_path: Option<String>,
    pub audio_duration: Option<i32>,
}

// ============================================================================
// Conversation Responses
// ============================================================================

/// Result of liking or unliking a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeResponse {
    pub success: bool,
    pub is_liked: bool,
}

impl LikeResponse {
    pub fn new(is_liked: bool) -> Self {
        Self {
            success: true,
            is_liked,
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Storage diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct StorageHealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub pool: PoolHealth,
    /// `table.column` → present
    pub optional_columns: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PoolHealth {
    pub initialized: bool,
    pub size: u32,
    pub idle: usize,
}

impl StorageHealthResponse {
    pub fn new(pool: PoolHealth, optional_columns: BTreeMap<String, bool>) -> Self {
        let complete = optional_columns.values().all(|present| *present);
        Self {
            status: if complete { "healthy" } else { "degraded" }.to_string(),
            timestamp: Utc::now(),
            pool,
            optional_columns,
        }
    }
}
