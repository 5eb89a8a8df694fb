//! Liked mark - a user pinning a direct conversation

use crate::value_objects::RowId;

/// At most one mark exists per (user, conversation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LikedMark {
    pub user_id: RowId,
    pub conversation_id: RowId,
}
