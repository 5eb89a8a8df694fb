//! Deterministic ordering for message lists and timelines
//!
//! Both orders are total. Messages go by `(timestamp, id)` ascending, with a
//! missing timestamp treated as the Unix epoch. Timeline entries go by last
//! activity descending, entries without activity last, then id descending.
//!
//! Timestamps are compared as `DateTime<Utc>` values, never as formatted
//! strings. Lexicographic comparison of ISO-8601 text only agrees with
//! chronological order for fixed-width, zero-padded, same-offset strings.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::entities::{GroupSummary, Message, ThreadKind, TimelineEntry};
use crate::value_objects::RowId;

/// Sort messages oldest first, ties broken by id
pub fn sort_messages(messages: &mut [Message]) {
    messages.sort_by_key(Message::ordering_key);
}

/// Check that every adjacent pair satisfies `(a.timestamp, a.id) <= (b.timestamp, b.id)`
pub fn is_chronological(messages: &[Message]) -> bool {
    messages
        .windows(2)
        .all(|pair| pair[0].ordering_key() <= pair[1].ordering_key())
}

/// Timeline comparison: most recent activity first, idle threads last, higher id first on ties
pub fn timeline_order(a: &TimelineEntry, b: &TimelineEntry) -> Ordering {
    let by_activity = match (a.last_activity, b.last_activity) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_activity.then_with(|| b.id.cmp(&a.id))
}

/// Sort a timeline in place (stable)
pub fn sort_timeline(entries: &mut [TimelineEntry]) {
    entries.sort_by(timeline_order);
}

/// Merge direct entries and joined groups into one deduplicated, ordered timeline
///
/// The two sources are fetched independently, so the order has to be applied
/// again after merging.
pub fn merge_timeline(direct: Vec<TimelineEntry>, groups: Vec<GroupSummary>) -> Vec<TimelineEntry> {
    let mut seen: HashSet<(ThreadKind, RowId)> = HashSet::with_capacity(direct.len() + groups.len());
    let mut merged: Vec<TimelineEntry> = direct
        .into_iter()
        .chain(groups.into_iter().map(TimelineEntry::from))
        .filter(|entry| seen.insert((entry.kind, entry.id)))
        .collect();

    sort_timeline(&mut merged);
    merged
}
