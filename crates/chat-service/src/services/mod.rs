//! Service layer - business logic orchestration
//!
//! Services borrow a [`ServiceContext`] and coordinate repositories and
//! collaborators for each use case.

pub mod context;
pub mod conversation;
pub mod error;
pub mod health;
pub mod message;
pub mod timeline;

#[cfg(test)]
mod testing;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use conversation::ConversationService;
pub use error::{ServiceError, ServiceResult};
pub use health::HealthService;
pub use message::MessageService;
pub use timeline::TimelineService;
