//! Records returned by the PREreview REST API list endpoints.
//!
//! Field names follow the API's camelCase JSON. Nested activity arrays
//! default to empty so partial payloads (e.g. a preprint with no requests
//! yet) deserialize cleanly.

use serde::{Deserialize, Serialize};

use crate::trending::{ActivitySummary, ScoreInputs};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// `{ "data": [...], "totalCount": n }` payload of every list endpoint.
///
/// Endpoints without pagination (tags) omit `totalCount`; it then reads as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total_count: u64,
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total_count: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Activity records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub uuid: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A request for review placed on a preprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub uuid: String,
    #[serde(default)]
    pub author: Option<AuthorRef>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RapidReview {
    pub uuid: String,
    #[serde(default)]
    pub author: Option<AuthorRef>,
    pub created_at: Timestamp,
}

/// A long-form review. Drafts have `is_published == false` and never count
/// as activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullReview {
    pub uuid: String,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub authors: Vec<AuthorRef>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Preprint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preprint {
    pub uuid: String,
    /// Resolvable identifier, e.g. `doi:10.1101/2020.01.01.000001`.
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub date_posted: Option<Timestamp>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub requests: Vec<Request>,
    #[serde(default)]
    pub rapid_reviews: Vec<RapidReview>,
    #[serde(default)]
    pub full_reviews: Vec<FullReview>,
}

impl Preprint {
    /// Published long-form reviews only.
    pub fn published_full_reviews(&self) -> impl Iterator<Item = &FullReview> {
        self.full_reviews.iter().filter(|r| r.is_published)
    }

    /// Derive the inputs of the trending score.
    ///
    /// Reviews count rapid reviews plus published full reviews. The first
    /// activity is the earliest request or counted review.
    pub fn score_inputs(&self) -> ScoreInputs {
        let published: Vec<&FullReview> = self.published_full_reviews().collect();

        let first_activity_at = self
            .requests
            .iter()
            .map(|r| r.created_at)
            .chain(self.rapid_reviews.iter().map(|r| r.created_at))
            .chain(published.iter().map(|r| r.created_at))
            .min();

        ScoreInputs {
            request_count: self.requests.len() as u64,
            review_count: (self.rapid_reviews.len() + published.len()) as u64,
            first_activity_at,
        }
    }

    /// Latest review and latest request timestamps.
    pub fn activity_summary(&self) -> ActivitySummary {
        let last_review_at = self
            .rapid_reviews
            .iter()
            .map(|r| r.created_at)
            .chain(self.published_full_reviews().map(|r| r.created_at))
            .max();

        ActivitySummary {
            last_review_at,
            last_request_at: self.requests.iter().map(|r| r.created_at).max(),
        }
    }
}

// ---------------------------------------------------------------------------
// Other list entities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub uuid: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub badges: Vec<Badge>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    pub uuid: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
