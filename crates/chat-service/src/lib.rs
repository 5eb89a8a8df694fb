//! # chat-service
//!
//! Application layer: the conversation timeline, message listing and
//! sending, liked marks and storage diagnostics, plus their wire DTOs.

pub mod dto;
pub mod services;

pub use dto::{
    LikeResponse, MessageResponse, PoolHealth, SendMessageRequest, StorageHealthResponse,
    TimelineEntryResponse,
};
pub use services::{
    ConversationService, HealthService, MessageService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, TimelineService,
};
