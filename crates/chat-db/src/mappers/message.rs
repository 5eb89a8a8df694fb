//! Message entity <-> model mapper

use chat_core::{AudioClip, Message, MessageColor, MessageKind, NewMessage, RowId};

use crate::models::{InsertedMessageModel, MessageModel};

/// Convert MessageModel to Message entity
///
/// Missing colours resolve to the default and missing kinds to text. Audio
/// metadata is only attached to audio messages that carry a file path.
impl From<MessageModel> for Message {
    fn from(model: MessageModel) -> Self {
        let kind = MessageKind::from_stored(model.message_type.as_deref());
        let audio = match kind {
            MessageKind::Audio => model.audio_file_path.map(|file_path| AudioClip {
                file_path,
                duration_secs: model.audio_duration.unwrap_or(0),
            }),
            MessageKind::Text => None,
        };

        Message {
            id: RowId::new(model.id),
            conversation_id: RowId::new(model.conversation_id),
            sender_id: RowId::new(model.sender_id),
            content: model.content,
            timestamp: model.timestamp,
            color: MessageColor::stored_or_default(model.message_color.as_deref()),
            kind,
            audio,
            sender_avatar: model.sender_avatar,
        }
    }
}

/// Which optional columns an insert actually wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WrittenColumns {
    pub color: bool,
    pub kind: bool,
    pub audio: bool,
}

/// Values bound into the message insert
#[derive(Debug)]
pub struct MessageInsert<'a> {
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: &'a str,
    pub color: &'a MessageColor,
    pub kind: MessageKind,
    pub audio: Option<&'a AudioClip>,
}

impl<'a> MessageInsert<'a> {
    pub fn new(message: &'a NewMessage, color: &'a MessageColor) -> Self {
        let kind = message.effective_kind();
        Self {
            conversation_id: message.conversation_id.into_inner(),
            sender_id: message.sender_id.into_inner(),
            content: &message.content,
            color,
            kind,
            audio: message.audio.as_ref().filter(|_| kind == MessageKind::Audio),
        }
    }

    /// The message as a later read will return it, given what was written
    pub fn into_message(self, inserted: InsertedMessageModel, written: WrittenColumns) -> Message {
        let kind = if written.kind { self.kind } else { MessageKind::Text };
        Message {
            id: RowId::new(inserted.id),
            conversation_id: RowId::new(self.conversation_id),
            sender_id: RowId::new(self.sender_id),
            content: self.content.to_string(),
            timestamp: inserted.timestamp,
            color: if written.color {
                self.color.clone()
            } else {
                MessageColor::default()
            },
            kind,
            audio: self
                .audio
                .filter(|_| written.audio && kind == MessageKind::Audio)
                .cloned(),
            sender_avatar: inserted.sender_avatar,
        }
    }
}
