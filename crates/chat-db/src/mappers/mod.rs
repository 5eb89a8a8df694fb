//! Entity <-> Model mappers
//!
//! Conversion between domain entities (chat-core) and database models.

mod conversation;
mod group;
mod message;
mod user;

pub use message::{MessageInsert, WrittenColumns};
