//! Preprint list with trending scores.

use axum::extract::{RawQuery, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use prereview_client::pages::load_preprint_page;
use prereview_client::RequestScope;
use prereview_core::trending::SortOption;

use crate::error::AppResult;
use crate::handlers::normalize_raw;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/preprints
///
/// One page of preprint cards. `sort` must be one of `new`, `score`,
/// `date`, `reviewed`, `requested` (or absent); `score` ranks the page by
/// trending score.
pub async fn list_preprints(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> AppResult<impl IntoResponse> {
    let query = normalize_raw(raw.as_deref());
    let sort = SortOption::from_query(&query.sort)?;

    let scope = RequestScope::new();
    let page = load_preprint_page(state.backend.as_ref(), &scope, &query, sort, Utc::now()).await?;

    tracing::debug!(
        page = query.page,
        limit = query.limit,
        cards = page.cards.len(),
        "Preprint list served",
    );

    Ok(Json(DataResponse { data: page }))
}
