//! Dashboard activity feed.
//!
//! Flattens the requests and reviews nested in a page of preprints into one
//! time-ordered list. Recent entries are preferred; when nothing happened in
//! the recent window the feed falls back to older activity so it is never
//! empty while any activity exists.

use chrono::Duration;
use serde::Serialize;

use crate::models::{FullReview, Preprint, RapidReview, Request};
use crate::types::Timestamp;

/// Entries newer than this many days count as recent.
pub const ACTIVITY_WINDOW_DAYS: i64 = 7;

/// Maximum number of entries in the feed.
pub const ACTIVITY_LIMIT: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityKind {
    Request,
    RapidReview,
    LongReview,
}

/// The record an activity entry was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ActivityRecord {
    Request(Request),
    RapidReview(RapidReview),
    FullReview(FullReview),
}

impl ActivityRecord {
    pub fn kind(&self) -> ActivityKind {
        match self {
            ActivityRecord::Request(_) => ActivityKind::Request,
            ActivityRecord::RapidReview(_) => ActivityKind::RapidReview,
            ActivityRecord::FullReview(_) => ActivityKind::LongReview,
        }
    }

    pub fn created_at(&self) -> Timestamp {
        match self {
            ActivityRecord::Request(r) => r.created_at,
            ActivityRecord::RapidReview(r) => r.created_at,
            ActivityRecord::FullReview(r) => r.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub created_at: Timestamp,
    pub preprint_title: String,
    pub preprint_handle: String,
    pub raw: ActivityRecord,
}

impl ActivityEntry {
    fn new(preprint: &Preprint, raw: ActivityRecord) -> Self {
        Self {
            kind: raw.kind(),
            created_at: raw.created_at(),
            preprint_title: preprint.title.clone(),
            preprint_handle: preprint.handle.clone(),
            raw,
        }
    }
}

/// Every request, rapid review and published full review, in collection
/// order (per preprint: requests, rapid reviews, full reviews).
pub fn collect_activity(preprints: &[Preprint]) -> Vec<ActivityEntry> {
    let mut entries = Vec::new();
    for preprint in preprints {
        entries.extend(
            preprint
                .requests
                .iter()
                .map(|r| ActivityEntry::new(preprint, ActivityRecord::Request(r.clone()))),
        );
        entries.extend(
            preprint
                .rapid_reviews
                .iter()
                .map(|r| ActivityEntry::new(preprint, ActivityRecord::RapidReview(r.clone()))),
        );
        entries.extend(
            preprint
                .published_full_reviews()
                .map(|r| ActivityEntry::new(preprint, ActivityRecord::FullReview(r.clone()))),
        );
    }
    entries
}

/// Build the dashboard feed at `now`.
///
/// Newest first, ties in collection order. Only entries from the last
/// [`ACTIVITY_WINDOW_DAYS`] days are kept unless there are none, in which
/// case all activity is used. At most [`ACTIVITY_LIMIT`] entries.
pub fn aggregate_activity(preprints: &[Preprint], now: Timestamp) -> Vec<ActivityEntry> {
    let mut all = collect_activity(preprints);
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let cutoff = now - Duration::days(ACTIVITY_WINDOW_DAYS);
    let recent: Vec<ActivityEntry> = all
        .iter()
        .filter(|e| e.created_at > cutoff)
        .cloned()
        .collect();

    let mut feed = if recent.is_empty() { all } else { recent };
    feed.truncate(ACTIVITY_LIMIT);
    feed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
