//! User entity - read-only view of the user directory

use crate::value_objects::{MessageColor, RowId};

/// User as seen by the persistence core (creation and deletion are owned elsewhere)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: RowId,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_key: Option<String>,
    /// Preferred message colour, `None` when unset or when the column does not exist yet
    pub message_color: Option<MessageColor>,
}

impl User {
    /// Create a new User with required fields
    pub fn new(id: RowId, username: String) -> Self {
        Self {
            id,
            username,
            display_name: None,
            avatar_key: None,
            message_color: None,
        }
    }

    /// Display name, falling back to the username when unset or blank
    pub fn visible_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.username)
    }

    /// Colour new messages from this user get unless overridden
    pub fn preferred_color(&self) -> MessageColor {
        self.message_color.clone().unwrap_or_default()
    }
}
