//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::RowId;

/// Domain layer errors
///
/// Missing optional columns and conversations pointing at deleted users are
/// repaired or excluded inside the persistence layer and never show up here.
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(RowId),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(RowId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    Validation(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not a participant of conversation {0}")]
    AccessDenied(RowId),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database connection unavailable: {0}")]
    ConnectionUnavailable(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Group service error: {0}")]
    GroupServiceError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ConversationNotFound(_) => "UNKNOWN_CONVERSATION",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::AccessDenied(_) => "ACCESS_DENIED",
            Self::ConnectionUnavailable(_) | Self::DatabaseError(_) => "STORAGE_UNAVAILABLE",
            Self::GroupServiceError(_) => "GROUP_SERVICE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::ConversationNotFound(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::AccessDenied(_))
    }

    /// Infrastructure failures all surface as "storage temporarily unavailable"
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ConnectionUnavailable(_) | Self::DatabaseError(_))
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}
