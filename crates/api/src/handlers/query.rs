//! Query inspection endpoint.

use axum::extract::RawQuery;
use axum::Json;
use prereview_core::query::{ListParams, QueryState};
use serde::Serialize;

use crate::handlers::normalize_raw;
use crate::response::DataResponse;

/// How a query string is understood by every list view.
#[derive(Debug, Serialize)]
pub struct NormalizedQuery {
    /// Normalized state, including `page` and the derived `offset`.
    pub state: QueryState,
    /// Parameters forwarded to the REST API (no `page`).
    pub params: ListParams,
    /// Canonical query string for the address bar.
    pub canonical: String,
}

/// GET /api/v1/query
pub async fn normalize_query(RawQuery(raw): RawQuery) -> Json<DataResponse<NormalizedQuery>> {
    let state = normalize_raw(raw.as_deref());
    Json(DataResponse {
        data: NormalizedQuery {
            params: state.to_list_params(),
            canonical: state.to_query_string(),
            state,
        },
    })
}
