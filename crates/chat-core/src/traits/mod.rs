//! Ports implemented by the infrastructure layer

mod repositories;

pub use repositories::{
    ConversationRepository, GroupMembership, LikedRepository, MessageRepository, RepoResult,
    UserRepository,
};
