//! Dashboard: preprints, tags, communities and the recent activity feed.

use axum::extract::{RawQuery, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use prereview_client::pages::load_dashboard;
use prereview_client::RequestScope;

use crate::error::AppResult;
use crate::handlers::normalize_raw;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> AppResult<impl IntoResponse> {
    let query = normalize_raw(raw.as_deref());

    let scope = RequestScope::new();
    let view = load_dashboard(state.backend.as_ref(), &scope, &query, Utc::now()).await?;

    Ok(Json(DataResponse { data: view }))
}
