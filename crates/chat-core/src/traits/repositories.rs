//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{Conversation, GroupSummary, Message, NewMessage, TimelineEntry, User};
use crate::error::DomainError;
use crate::value_objects::RowId;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Directory
// ============================================================================

/// Read-only access to the user directory
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: RowId) -> RepoResult<Option<User>>;

    /// Check whether the user still exists
    async fn exists(&self, id: RowId) -> RepoResult<bool>;
}

// ============================================================================
// Conversation Repository
// ============================================================================

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Find a direct conversation by ID
    async fn find_by_id(&self, id: RowId) -> RepoResult<Option<Conversation>>;

    /// Check whether the user is one of the conversation's two participants
    async fn is_participant(&self, conversation_id: RowId, user_id: RowId) -> RepoResult<bool>;

    /// Return the conversation for the unordered pair, creating it if needed
    async fn find_or_create(&self, user_a: RowId, user_b: RowId) -> RepoResult<Conversation>;

    /// Timeline entries for every valid direct conversation of the user,
    /// ordered most recent first.
    ///
    /// Returns `None` when the user does not exist. Conversations whose
    /// counterpart no longer exists are left out.
    async fn direct_timeline(&self, user_id: RowId) -> RepoResult<Option<Vec<TimelineEntry>>>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// All messages of a conversation, ordered by (timestamp, id) ascending
    async fn list_by_conversation(&self, conversation_id: RowId) -> RepoResult<Vec<Message>>;

    /// Insert one immutable message; the store assigns id and timestamp
    async fn append(&self, message: &NewMessage) -> RepoResult<Message>;
}

// ============================================================================
// Liked Repository
// ============================================================================

#[async_trait]
pub trait LikedRepository: Send + Sync {
    /// Create or remove the mark. Both directions are idempotent.
    async fn set_liked(&self, user_id: RowId, conversation_id: RowId, liked: bool)
        -> RepoResult<()>;

    /// Check whether the user liked the conversation
    async fn is_liked(&self, user_id: RowId, conversation_id: RowId) -> RepoResult<bool>;
}

// ============================================================================
// Group Membership (external collaborator)
// ============================================================================

/// Groups are owned by a separate service; this is the narrow slice the timeline needs
#[async_trait]
pub trait GroupMembership: Send + Sync {
    /// Groups the user has joined. A user in no groups gets an empty list.
    async fn joined_groups(&self, user_id: RowId) -> RepoResult<Vec<GroupSummary>>;
}
