//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in chat-core.
//! Every repository borrows connections from the shared [`ConnectionManager`].
//!
//! [`ConnectionManager`]: crate::pool::ConnectionManager

mod conversation;
mod error;
mod group;
mod liked;
mod message;
mod user;

pub use conversation::PgConversationRepository;
pub use error::{is_duplicate_column, map_db_error, map_foreign_key_violation};
pub use group::PgGroupMembership;
pub use liked::PgLikedRepository;
pub use message::PgMessageRepository;
pub use user::PgUserRepository;
