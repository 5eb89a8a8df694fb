//! Direct conversation entity - a thread between exactly two users

use crate::error::DomainError;
use crate::value_objects::RowId;

/// Two-party conversation. The participant pair is unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversation {
    pub id: RowId,
    pub user1_id: RowId,
    pub user2_id: RowId,
}

impl Conversation {
    /// Build a conversation, rejecting self-pairs
    pub fn new(id: RowId, user1_id: RowId, user2_id: RowId) -> Result<Self, DomainError> {
        let (user1_id, user2_id) = participant_pair(user1_id, user2_id)?;
        Ok(Self {
            id,
            user1_id,
            user2_id,
        })
    }

    /// Check whether the user is one of the two participants
    #[inline]
    pub fn involves(&self, user_id: RowId) -> bool {
        self.user1_id == user_id || self.user2_id == user_id
    }

    /// The participant that is not `user_id`, or `None` if `user_id` is not a participant
    pub fn counterpart(&self, user_id: RowId) -> Option<RowId> {
        if self.user1_id == user_id {
            Some(self.user2_id)
        } else if self.user2_id == user_id {
            Some(self.user1_id)
        } else {
            None
        }
    }
}

/// Normalise an unordered participant pair (lower id first) and reject self-pairs
pub fn participant_pair(a: RowId, b: RowId) -> Result<(RowId, RowId), DomainError> {
    if a == b {
        return Err(DomainError::Validation(
            "a conversation needs two distinct participants".to_string(),
        ));
    }
    Ok((a.min(b), a.max(b)))
}
