//! Timeline service
//!
//! Merges a user's direct conversations and joined groups into one feed.

use chat_core::{merge_timeline, RowId, TimelineEntry};
use tracing::{debug, instrument, warn};

use crate::dto::TimelineEntryResponse;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Timeline service
pub struct TimelineService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TimelineService<'a> {
    /// Create a new TimelineService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Ordered, deduplicated direct conversations and groups for `user_id`
    ///
    /// An unknown user gets an empty list. A failing group collaborator
    /// degrades the result to direct conversations only.
    #[instrument(skip(self))]
    pub async fn list_timeline(&self, user_id: RowId) -> ServiceResult<Vec<TimelineEntry>> {
        let Some(direct) = self.ctx.conversation_repo().direct_timeline(user_id).await? else {
            debug!(%user_id, "Unknown user, returning empty timeline");
            return Ok(Vec::new());
        };

        let groups = match self.ctx.group_membership().joined_groups(user_id).await {
            Ok(groups) => groups,
            Err(e) => {
                warn!(%user_id, error = %e, "Group membership unavailable, returning direct conversations only");
                Vec::new()
            }
        };

        let timeline = merge_timeline(direct, groups);
        debug!(%user_id, entries = timeline.len(), "Timeline assembled");
        Ok(timeline)
    }

    /// [`Self::list_timeline`] in wire form
    pub async fn timeline_response(&self, user_id: RowId) -> ServiceResult<Vec<TimelineEntryResponse>> {
        let timeline = self.list_timeline(user_id).await?;
        Ok(timeline.into_iter().map(TimelineEntryResponse::from).collect())
    }
}
