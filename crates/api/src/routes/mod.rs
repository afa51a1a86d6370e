pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers::{dashboard, directory, preprints, query};
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// GET /query          normalize_query
/// GET /preprints      list_preprints
/// GET /personas       list_personas
/// GET /communities    list_communities
/// GET /dashboard      get_dashboard
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/query", get(query::normalize_query))
        .route("/preprints", get(preprints::list_preprints))
        .route("/personas", get(directory::list_personas))
        .route("/communities", get(directory::list_communities))
        .route("/dashboard", get(dashboard::get_dashboard))
}
