//! Trending score and "last activity" selection for preprint cards.
//!
//! The score is a gravity-style decay: engagement divided by a power of the
//! hours elapsed since the first activity.
//!
//! ```text
//! score = (requests + REVIEW_WEIGHT * reviews) / (hours_since_first + HOUR_OFFSET) ^ GRAVITY
//! ```
//!
//! Only its ordering matters: more engagement never lowers the score, and
//! the same engagement scores lower the older it is.

use std::str::FromStr;

use chrono_humanize::{Accuracy, HumanTime, Tense};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::Preprint;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// A review is worth this many requests.
pub const REVIEW_WEIGHT: f64 = 2.0;

/// Decay exponent applied to the elapsed hours.
pub const GRAVITY: f64 = 1.5;

/// Added to the elapsed hours so brand-new activity does not divide by zero.
pub const HOUR_OFFSET: f64 = 2.0;

/// Multiplier from raw score to the integer shown on the badge.
pub const BADGE_SCALE: f64 = 100.0;

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreInputs {
    pub request_count: u64,
    pub review_count: u64,
    pub first_activity_at: Option<Timestamp>,
}

/// Compute the trending score at `now`.
///
/// Returns `0.0` when there has been no activity. Timestamps in the future
/// are treated as happening at `now`.
pub fn trending_score(inputs: &ScoreInputs, now: Timestamp) -> f64 {
    let Some(first) = inputs.first_activity_at else {
        return 0.0;
    };

    let engagement = inputs.request_count as f64 + REVIEW_WEIGHT * inputs.review_count as f64;
    if engagement == 0.0 {
        return 0.0;
    }

    let hours = (now - first).num_seconds().max(0) as f64 / 3600.0;
    engagement / (hours + HOUR_OFFSET).powf(GRAVITY)
}

/// Integer shown on the score badge.
pub fn badge_score(score: f64) -> u64 {
    if score.is_finite() && score > 0.0 {
        (score * BADGE_SCALE).round() as u64
    } else {
        0
    }
}

/// Rough human label for the time elapsed since `at`, e.g. `"3 days ago"`.
///
/// Anything too recent to be counted, including timestamps after `now`,
/// reads as `"now"`.
pub fn time_since(at: Timestamp, now: Timestamp) -> String {
    let just_now = HumanTime::from(chrono::Duration::zero());
    let elapsed = HumanTime::from((now - at).max(chrono::Duration::zero()));
    let present = elapsed.to_text_en(Accuracy::Rough, Tense::Present);
    if present == just_now.to_text_en(Accuracy::Rough, Tense::Present) {
        return present;
    }
    elapsed.to_text_en(Accuracy::Rough, Tense::Past)
}

/// Stable sort, highest score first. Equal scores keep their order.
pub fn rank_by_score<T>(items: &mut [T], score: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| score(b).total_cmp(&score(a)));
}

// ---------------------------------------------------------------------------
// Sort options
// ---------------------------------------------------------------------------

/// Sort options offered on the preprint list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    #[default]
    New,
    /// "Trending".
    Score,
    Date,
    Reviewed,
    Requested,
}

impl SortOption {
    /// Map a normalized `sort` value; an empty value selects the default.
    pub fn from_query(sort: &str) -> Result<Self, CoreError> {
        if sort.is_empty() {
            Ok(Self::default())
        } else {
            sort.parse()
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortOption::New => "new",
            SortOption::Score => "score",
            SortOption::Date => "date",
            SortOption::Reviewed => "reviewed",
            SortOption::Requested => "requested",
        }
    }
}

impl FromStr for SortOption {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            SortOption::New,
            SortOption::Score,
            SortOption::Date,
            SortOption::Reviewed,
            SortOption::Requested,
        ]
        .into_iter()
        .find(|opt| opt.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| CoreError::Validation(format!("unknown sort option '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Last activity
// ---------------------------------------------------------------------------

/// Latest review and request timestamps of one preprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivitySummary {
    pub last_review_at: Option<Timestamp>,
    pub last_request_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgoVerb {
    Reviewed,
    Requested,
}

/// Verb and date shown as "reviewed 3 days ago" on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgoData {
    pub verb: AgoVerb,
    pub date: Timestamp,
}

/// Pick the verb/date pair for the active sort.
///
/// - `reviewed`: last review, else last request.
/// - `requested`: last request, else last review.
/// - anything else: whichever happened last; a review wins a tie.
pub fn ago_data(summary: &ActivitySummary, sort: SortOption) -> Option<AgoData> {
    let reviewed = summary.last_review_at.map(|date| AgoData {
        verb: AgoVerb::Reviewed,
        date,
    });
    let requested = summary.last_request_at.map(|date| AgoData {
        verb: AgoVerb::Requested,
        date,
    });

    match sort {
        SortOption::Reviewed => reviewed.or(requested),
        SortOption::Requested => requested.or(reviewed),
        SortOption::New | SortOption::Score | SortOption::Date => match (reviewed, requested) {
            (Some(rev), Some(req)) => Some(if rev.date >= req.date { rev } else { req }),
            (rev, req) => rev.or(req),
        },
    }
}

// ---------------------------------------------------------------------------
// Preprint card
// ---------------------------------------------------------------------------

/// A preprint decorated with everything its card displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprintCard {
    pub preprint: Preprint,
    pub score: f64,
    pub badge: u64,
    pub ago: Option<AgoData>,
    pub time_since: Option<String>,
}

impl PreprintCard {
    pub fn build(preprint: Preprint, sort: SortOption, now: Timestamp) -> Self {
        let score = trending_score(&preprint.score_inputs(), now);
        let ago = ago_data(&preprint.activity_summary(), sort);
        Self {
            badge: badge_score(score),
            time_since: ago.map(|a| time_since(a.date, now)),
            ago,
            score,
            preprint,
        }
    }
}

/// Build cards for a page of preprints, ranked by score under `Score`.
pub fn build_cards(
    preprints: Vec<Preprint>,
    sort: SortOption,
    now: Timestamp,
) -> Vec<PreprintCard> {
    let mut cards: Vec<PreprintCard> = preprints
        .into_iter()
        .map(|p| PreprintCard::build(p, sort, now))
        .collect();
    if sort == SortOption::Score {
        rank_by_score(&mut cards, |c| c.score);
    }
    cards
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
