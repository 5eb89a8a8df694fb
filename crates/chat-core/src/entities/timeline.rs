//! Timeline entry - one row of a user's merged conversation list

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::RowId;

use super::group::GroupSummary;

/// Which kind of thread a timeline entry stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadKind {
    Direct,
    Group,
}

/// A direct conversation or group annotated with its latest activity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub kind: ThreadKind,
    /// Conversation id for direct entries, group id for groups
    pub id: RowId,
    pub display_name: String,
    /// Counterpart user for direct entries
    pub other_user_id: Option<RowId>,
    pub other_username: Option<String>,
    pub avatar_key: Option<String>,
    pub last_activity: Option<DateTime<Utc>>,
    pub last_preview: Option<String>,
    pub liked: bool,
}

impl TimelineEntry {
    #[inline]
    pub fn is_group(&self) -> bool {
        self.kind == ThreadKind::Group
    }
}

impl From<GroupSummary> for TimelineEntry {
    fn from(group: GroupSummary) -> Self {
        Self {
            kind: ThreadKind::Group,
            id: group.group_id,
            display_name: group.name,
            other_user_id: None,
            other_username: None,
            avatar_key: None,
            last_activity: group.last_message_time,
            last_preview: group.last_message_content,
            liked: group.liked,
        }
    }
}
