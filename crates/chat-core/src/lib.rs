//! # chat-core
//!
//! Domain layer containing entities, value objects, repository traits and the
//! ordering rules for message lists and timelines.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod ordering;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    participant_pair, AudioClip, Conversation, GroupSummary, LikedMark, Message, MessageKind,
    NewMessage, ThreadKind, TimelineEntry, User,
};
pub use error::DomainError;
pub use ordering::{is_chronological, merge_timeline, sort_messages, sort_timeline, timeline_order};
pub use traits::{
    ConversationRepository, GroupMembership, LikedRepository, MessageRepository, RepoResult,
    UserRepository,
};
pub use value_objects::{InvalidColor, MessageColor, RowId, RowIdParseError};
