//! Domain entity -> response DTO conversions

use chat_core::{Message, ThreadKind, TimelineEntry};

use super::responses::{MessageResponse, TimelineEntryResponse};

impl From<TimelineEntry> for TimelineEntryResponse {
    fn from(entry: TimelineEntry) -> Self {
        let is_group = entry.kind == ThreadKind::Group;
        Self {
            conversation_id: (!is_group).then_some(entry.id),
            group_id: is_group.then_some(entry.id),
            is_group,
            other_user_id: entry.other_user_id,
            other_username: entry.other_username,
            other_display_name: entry.display_name,
            other_avatar: entry.avatar_key,
            last_message_time: entry.last_activity,
            last_message_content: entry.last_preview,
            is_liked: entry.liked,
        }
    }
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        let (audio_file_path, audio_duration) = match message.audio {
            Some(clip) => (Some(clip.file_path), Some(clip.duration_secs)),
            None => (None, None),
        };
        Self {
            id: message.id,
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            content: message.content,
            timestamp: message.timestamp,
            created_at: message.timestamp,
            sender_avatar: message.sender_avatar,
            message_color: message.color.as_str().to_string(),
            message_type: message.kind,
            audio_file_path,
            audio_duration,
        }
    }
}
