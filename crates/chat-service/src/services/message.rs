//! Message service
//!
//! Lists a conversation's messages in (timestamp, id) order and appends new
//! ones on behalf of a participant.

use chat_core::{sort_messages, Message, RowId};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::dto::{MessageResponse, SendMessageRequest};

use super::context::ServiceContext;
use super::conversation::ConversationService;
use super::error::ServiceResult;

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// All messages of a conversation, oldest first
    ///
    /// The store already orders by (timestamp, id); the result is sorted again
    /// here so every caller sees the same order regardless of schema layout.
    /// An unknown conversation yields an empty list.
    #[instrument(skip(self))]
    pub async fn list_messages(&self, conversation_id: RowId) -> ServiceResult<Vec<Message>> {
        let mut messages = self
            .ctx
            .message_repo()
            .list_by_conversation(conversation_id)
            .await?;
        sort_messages(&mut messages);

        debug!(%conversation_id, count = messages.len(), "Messages listed");
        Ok(messages)
    }

    /// [`Self::list_messages`] for a participant, in wire form
    #[instrument(skip(self))]
    pub async fn list_for_participant(
        &self,
        user_id: RowId,
        conversation_id: RowId,
    ) -> ServiceResult<Vec<MessageResponse>> {
        ConversationService::new(self.ctx)
            .require_participant(conversation_id, user_id)
            .await?;

        let messages = self.list_messages(conversation_id).await?;
        Ok(messages.into_iter().map(MessageResponse::from).collect())
    }

    /// Append a message from `sender_id`
    #[instrument(skip(self, request), fields(conversation_id = %request.conversation_id))]
    pub async fn send_message(
        &self,
        sender_id: RowId,
        request: SendMessageRequest,
    ) -> ServiceResult<MessageResponse> {
        request.validate()?;

        ConversationService::new(self.ctx)
            .require_participant(request.conversation_id, sender_id)
            .await?;

        let new_message = request.into_new_message(sender_id)?;
        new_message.validate()?;

        let message = self.ctx.message_repo().append(&new_message).await?;
        info!(
            message_id = %message.id,
            conversation_id = %message.conversation_id,
            kind = %message.kind,
            "Message sent"
        );

        Ok(MessageResponse::from(message))
    }
}
