use chat_core::{GroupSummary, RowId};

use crate::models::GroupSummaryModel;

impl From<GroupSummaryModel> for GroupSummary {
    fn from(model: GroupSummaryModel) -> Self {
        GroupSummary {
            group_id: RowId::new(model.group_id),
            name: model.name,
            last_message_time: model.last_message_time,
            last_message_content: model.last_message_content,
            liked: model.liked,
        }
    }
}
