//! Domain entities - core business objects

mod conversation;
mod group;
mod liked;
mod message;
mod timeline;
mod user;

pub use conversation::{participant_pair, Conversation};
pub use group::GroupSummary;
pub use liked::LikedMark;
pub use message::{AudioClip, Message, MessageKind, NewMessage};
pub use timeline::{ThreadKind, TimelineEntry};
pub use user::User;
