//! User database model

use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_key: Option<String>,
    pub message_color: Option<String>,
}
