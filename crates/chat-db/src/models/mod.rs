//! Database models with SQLx `FromRow` derives

mod conversation;
mod group;
mod message;
mod user;

pub use conversation::{ConversationModel, DirectThreadModel};
pub use group::GroupSummaryModel;
pub use message::{InsertedMessageModel, MessageModel};
pub use user::UserModel;
