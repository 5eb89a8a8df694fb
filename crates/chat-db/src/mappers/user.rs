//! User entity <-> model mapper

use chat_core::{MessageColor, RowId, User};

use crate::models::UserModel;

/// Convert UserModel to User entity
///
/// An empty stored colour is treated as unset; anything else is kept as stored.
impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: RowId::new(model.id),
            username: model.username,
            display_name: model.display_name,
            avatar_key: model.avatar_key,
            message_color: model
                .message_color
                .as_deref()
                .and_then(MessageColor::from_stored),
        }
    }
}
