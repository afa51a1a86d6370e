//! Persona and community listings.

use axum::extract::{RawQuery, State};
use axum::response::IntoResponse;
use axum::Json;
use prereview_client::pages::{load_communities, load_personas};
use prereview_client::RequestScope;

use crate::error::AppResult;
use crate::handlers::normalize_raw;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/personas
pub async fn list_personas(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> AppResult<impl IntoResponse> {
    let query = normalize_raw(raw.as_deref());
    let scope = RequestScope::new();
    let page = load_personas(state.backend.as_ref(), &scope, &query).await?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/communities
pub async fn list_communities(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> AppResult<impl IntoResponse> {
    let query = normalize_raw(raw.as_deref());
    let scope = RequestScope::new();
    let page = load_communities(state.backend.as_ref(), &scope, &query).await?;
    Ok(Json(DataResponse { data: page }))
}
