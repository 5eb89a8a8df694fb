//! Conversation entity <-> model mapper

use chat_core::{Conversation, RowId, ThreadKind, TimelineEntry};

use crate::models::{ConversationModel, DirectThreadModel};

impl From<ConversationModel> for Conversation {
    fn from(model: ConversationModel) -> Self {
        Conversation {
            id: RowId::new(model.id),
            user1_id: RowId::new(model.user1_id),
            user2_id: RowId::new(model.user2_id),
        }
    }
}

impl From<DirectThreadModel> for TimelineEntry {
    fn from(model: DirectThreadModel) -> Self {
        TimelineEntry {
            kind: ThreadKind::Direct,
            id: RowId::new(model.conversation_id),
            display_name: model
                .other_display_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| model.other_username.clone()),
            other_user_id: Some(RowId::new(model.other_user_id)),
            other_username: Some(model.other_username),
            avatar_key: model.other_avatar,
            last_activity: model.last_message_time,
            last_preview: model.last_message_content,
            liked: model.is_liked,
        }
    }
}
