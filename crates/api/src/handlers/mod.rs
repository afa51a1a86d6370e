//! Request handlers.
//!
//! Handlers read the raw query string and run it through
//! [`prereview_core::query::normalize`] instead of a typed `Query<T>`
//! extractor, so keys match case-insensitively and malformed numbers fall
//! back to defaults exactly as in every other list view.
//!
//! Each handler owns a [`RequestScope`](prereview_client::RequestScope) for
//! its upstream calls. When axum drops the handler future (client gone,
//! timeout) the scope is dropped and in-flight upstream requests are
//! cancelled.

pub mod dashboard;
pub mod directory;
pub mod preprints;
pub mod query;

use prereview_core::query::{normalize, QueryState};

/// Normalize the request's raw query string; absent means empty.
pub(crate) fn normalize_raw(raw: Option<&str>) -> QueryState {
    normalize(raw.unwrap_or_default())
}
