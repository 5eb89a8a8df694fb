//! Request DTOs
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

use chat_core::{AudioClip, MessageColor, MessageKind, NewMessage, RowId};

use crate::services::{ServiceError, ServiceResult};

/// Send message request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub conversation_id: RowId,

    #[validate(length(min = 1, max = 4000, message = "Message content must be 1-4000 characters"))]
    pub content: String,

    /// `#RRGGBB`; overrides the sender's preference
    #[serde(default)]
    pub message_color: Option<String>,

    #[serde(default)]
    pub message_type: Option<MessageKind>,

    /// Reference into external audio storage
    #[serde(default)]
    pub audio_file_path: Option<String>,

    /// Seconds
    #[serde(default)]
    #[validate(range(min = 0, message = "Audio duration cannot be negative"))]
    pub audio_duration: Option<i32>,
}

impl SendMessageRequest {
    /// Convert into the domain write request for `sender_id`
    pub fn into_new_message(self, sender_id: RowId) -> ServiceResult<NewMessage> {
        let color = self
            .message_color
            .as_deref()
            .map(str::trim)
            .filter(|hex| !hex.is_empty())
            .map(MessageColor::parse)
            .transpose()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let audio = self.audio_file_path.map(|file_path| AudioClip {
            file_path,
            duration_secs: self.audio_duration.unwrap_or(0),
        });

        Ok(NewMessage {
            conversation_id: self.conversation_id,
            sender_id,
            content: self.content,
            color,
            kind: self.message_type,
            audio,
        })
    }
}
