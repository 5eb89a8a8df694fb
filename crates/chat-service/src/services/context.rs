//! Service context - dependency container for services
//!
//! Holds the repositories, the group membership collaborator and, when wired
//! to PostgreSQL, the shared connection manager.

use std::sync::Arc;

use chat_core::{
    ConversationRepository, GroupMembership, LikedRepository, MessageRepository, UserRepository,
};
use chat_db::{
    ConnectionManager, PgConversationRepository, PgGroupMembership, PgLikedRepository,
    PgMessageRepository, PgUserRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Connection manager (absent when running against in-memory ports)
    connections: Option<Arc<ConnectionManager>>,

    // Repositories
    user_repo: Arc<dyn UserRepository>,
    conversation_repo: Arc<dyn ConversationRepository>,
    message_repo: Arc<dyn MessageRepository>,
    liked_repo: Arc<dyn LikedRepository>,

    // Collaborators
    group_membership: Arc<dyn GroupMembership>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        connections: Option<Arc<ConnectionManager>>,
        user_repo: Arc<dyn UserRepository>,
        conversation_repo: Arc<dyn ConversationRepository>,
        message_repo: Arc<dyn MessageRepository>,
        liked_repo: Arc<dyn LikedRepository>,
        group_membership: Arc<dyn GroupMembership>,
    ) -> Self {
        Self {
            connections,
            user_repo,
            conversation_repo,
            message_repo,
            liked_repo,
            group_membership,
        }
    }

    /// Wire every port to PostgreSQL through one connection manager
    pub fn postgres(manager: Arc<ConnectionManager>) -> Self {
        Self::new(
            Some(manager.clone()),
            Arc::new(PgUserRepository::new(manager.clone())),
            Arc::new(PgConversationRepository::new(manager.clone())),
            Arc::new(PgMessageRepository::new(manager.clone())),
            Arc::new(PgLikedRepository::new(manager.clone())),
            Arc::new(PgGroupMembership::new(manager)),
        )
    }

    // === Connections ===

    /// Get the connection manager, if this context is backed by PostgreSQL
    pub fn connections(&self) -> Option<&ConnectionManager> {
        self.connections.as_deref()
    }

    /// Close the pool; a no-op for in-memory contexts
    pub async fn shutdown(&self) {
        if let Some(manager) = &self.connections {
            manager.shutdown().await;
        }
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the conversation repository
    pub fn conversation_repo(&self) -> &dyn ConversationRepository {
        self.conversation_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the liked-mark repository
    pub fn liked_repo(&self) -> &dyn LikedRepository {
        self.liked_repo.as_ref()
    }

    // === Collaborators ===

    /// Get the group membership collaborator
    pub fn group_membership(&self) -> &dyn GroupMembership {
        self.group_membership.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("connections", &self.connections.is_some())
            .field("repositories", &"...")
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    connections: Option<Arc<ConnectionManager>>,
    user_repo: Option<Arc<dyn UserRepository>>,
    conversation_repo: Option<Arc<dyn ConversationRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    liked_repo: Option<Arc<dyn LikedRepository>>,
    group_membership: Option<Arc<dyn GroupMembership>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the PostgreSQL implementation for every port not set explicitly
    pub fn postgres(mut self, manager: Arc<ConnectionManager>) -> Self {
        self.user_repo
            .get_or_insert_with(|| Arc::new(PgUserRepository::new(manager.clone())));
        self.conversation_repo
            .get_or_insert_with(|| Arc::new(PgConversationRepository::new(manager.clone())));
        self.message_repo
            .get_or_insert_with(|| Arc::new(PgMessageRepository::new(manager.clone())));
        self.liked_repo
            .get_or_insert_with(|| Arc::new(PgLikedRepository::new(manager.clone())));
        self.group_membership
            .get_or_insert_with(|| Arc::new(PgGroupMembership::new(manager.clone())));
        self.connections = Some(manager);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn conversation_repo(mut self, repo: Arc<dyn ConversationRepository>) -> Self {
        self.conversation_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn liked_repo(mut self, repo: Arc<dyn LikedRepository>) -> Self {
        self.liked_repo = Some(repo);
        self
    }

    pub fn group_membership(mut self, membership: Arc<dyn GroupMembership>) -> Self {
        self.group_membership = Some(membership);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.connections,
            self.user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            self.conversation_repo
                .ok_or_else(|| ServiceError::validation("conversation_repo is required"))?,
            self.message_repo
                .ok_or_else(|| ServiceError::validation("message_repo is required"))?,
            self.liked_repo
                .ok_or_else(|| ServiceError::validation("liked_repo is required"))?,
            self.group_membership
                .ok_or_else(|| ServiceError::validation("group_membership is required"))?,
        ))
    }
}
