//! Data transfer objects for requests and responses
//!
//! This module provides:
//! - Request DTOs with validation
//! - Response DTOs using the chat feed's field names
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::SendMessageRequest;
pub use responses::{
    LikeResponse, MessageResponse, PoolHealth, StorageHealthResponse, TimelineEntryResponse,
};
