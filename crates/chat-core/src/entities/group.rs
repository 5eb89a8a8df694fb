//! Group summary - what the Group Membership service reports per joined group

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::RowId;

/// One group the user belongs to, with its latest activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group_id: RowId,
    pub name: String,
    pub last_message_time: Option<DateTime<Utc>>,
    pub last_message_content: Option<String>,
    pub liked: bool,
}
