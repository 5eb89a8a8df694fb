//! Message entity - an immutable entry in a conversation

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::value_objects::{MessageColor, RowId};

/// Message kind tag (`message_type` column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Audio,
}

impl MessageKind {
    /// Column representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Audio => "audio",
        }
    }

    /// Parse a stored tag; absent or unknown tags are text
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(tag) if tag.eq_ignore_ascii_case("audio") => Self::Audio,
            _ => Self::Text,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio metadata. The bytes live in external storage; only the reference is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioClip {
    pub file_path: String,
    /// Length in whole seconds
    pub duration_secs: i32,
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: RowId,
    pub conversation_id: RowId,
    pub sender_id: RowId,
    pub content: String,
    /// Store-assigned creation time; legacy rows may have none
    pub timestamp: Option<DateTime<Utc>>,
    pub color: MessageColor,
    pub kind: MessageKind,
    /// Present only when `kind` is audio
    pub audio: Option<AudioClip>,
    pub sender_avatar: Option<String>,
}

impl Message {
    /// Timestamp used for ordering; a missing timestamp sorts as the Unix epoch
    #[inline]
    pub fn sort_timestamp(&self) -> DateTime<Utc> {
        self.timestamp.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Total ordering key: (timestamp, id)
    #[inline]
    pub fn ordering_key(&self) -> (DateTime<Utc>, RowId) {
        (self.sort_timestamp(), self.id)
    }

    #[inline]
    pub fn is_audio(&self) -> bool {
        self.kind == MessageKind::Audio
    }
}

/// Write request for `appendMessage`
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
#[validate(schema(function = "validate_kind_metadata"))]
pub struct NewMessage {
    pub conversation_id: RowId,
    pub sender_id: RowId,

    #[validate(
        length(min = 1, max = 4000, message = "Message content must be 1-4000 characters"),
        custom(function = "validate_not_blank")
    )]
    pub content: String,

    /// Explicit colour; `None` means "use the sender's preference"
    pub color: Option<MessageColor>,
    /// `None` is stored as text
    pub kind: Option<MessageKind>,
    pub audio: Option<AudioClip>,
}

impl NewMessage {
    /// Plain text message using the sender's preferred colour
    pub fn text(conversation_id: RowId, sender_id: RowId, content: impl Into<String>) -> Self {
        Self {
            conversation_id,
            sender_id,
            content: content.into(),
            color: None,
            kind: None,
            audio: None,
        }
    }

    /// Voice message referencing externally stored audio
    pub fn audio(
        conversation_id: RowId,
        sender_id: RowId,
        content: impl Into<String>,
        clip: AudioClip,
    ) -> Self {
        Self {
            conversation_id,
            sender_id,
            content: content.into(),
            color: None,
            kind: Some(MessageKind::Audio),
            audio: Some(clip),
        }
    }

    /// Override the sender's colour for this message
    #[must_use]
    pub fn with_color(mut self, color: MessageColor) -> Self {
        self.color = Some(color);
        self
    }

    #[inline]
    pub fn effective_kind(&self) -> MessageKind {
        self.kind.unwrap_or_default()
    }
}

fn validate_not_blank(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("Message content is blank".into()));
    }
    Ok(())
}

fn validate_kind_metadata(message: &NewMessage) -> Result<(), ValidationError> {
    match (message.effective_kind(), &message.audio) {
        (MessageKind::Audio, None) => Err(ValidationError::new("audio_missing")
            .with_message("Audio messages need a storage reference".into())),
        (MessageKind::Audio, Some(clip)) if clip.file_path.trim().is_empty() => {
            Err(ValidationError::new("audio_path")
                .with_message("Audio storage reference is empty".into()))
        }
        (MessageKind::Audio, Some(clip)) if clip.duration_secs < 0 => {
            Err(ValidationError::new("audio_duration")
                .with_message("Audio duration cannot be negative".into()))
        }
        (MessageKind::Text, Some(_)) => Err(ValidationError::new("audio_on_text")
            .with_message("Audio metadata is only allowed on audio messages".into())),
        _ => Ok(()),
    }
}
