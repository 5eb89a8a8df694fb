//! Conversation service
//!
//! Participant checks, liked marks and direct-conversation creation.

use chat_core::{Conversation, RowId};
use tracing::{info, instrument};

use crate::dto::LikeResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Conversation service
pub struct ConversationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ConversationService<'a> {
    /// Create a new ConversationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// The conversation, if `user_id` takes part in it
    ///
    /// A missing conversation and a foreign one are indistinguishable to the
    /// caller: both are `AccessDenied`.
    #[instrument(skip(self))]
    pub async fn require_participant(
        &self,
        conversation_id: RowId,
        user_id: RowId,
    ) -> ServiceResult<Conversation> {
        match self.ctx.conversation_repo().find_by_id(conversation_id).await? {
            Some(conversation) if conversation.involves(user_id) => Ok(conversation),
            _ => Err(ServiceError::AccessDenied),
        }
    }

    /// Like or unlike a conversation; repeating either is a no-op
    #[instrument(skip(self))]
    pub async fn set_liked(
        &self,
        user_id: RowId,
        conversation_id: RowId,
        liked: bool,
    ) -> ServiceResult<LikeResponse> {
        self.require_participant(conversation_id, user_id).await?;
        self.ctx
            .liked_repo()
            .set_liked(user_id, conversation_id, liked)
            .await?;

        info!(%user_id, %conversation_id, liked, "Liked mark set");
        Ok(LikeResponse::new(liked))
    }

    #[instrument(skip(self))]
    pub async fn is_liked(&self, user_id: RowId, conversation_id: RowId) -> ServiceResult<bool> {
        Ok(self.ctx.liked_repo().is_liked(user_id, conversation_id).await?)
    }

    /// The direct conversation between two users, created on first use
    #[instrument(skip(self))]
    pub async fn open_conversation(
        &self,
        user_id: RowId,
        other_user_id: RowId,
    ) -> ServiceResult<Conversation> {
        if !self.ctx.user_repo().exists(other_user_id).await? {
            return Err(ServiceError::not_found("User", other_user_id.to_string()));
        }
        Ok(self
            .ctx
            .conversation_repo()
            .find_or_create(user_id, other_user_id)
            .await?)
    }
}
