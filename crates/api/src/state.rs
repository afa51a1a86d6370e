use std::sync::Arc;

use prereview_client::PrereviewBackend;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Upstream PREreview REST API.
    pub backend: Arc<dyn PrereviewBackend>,
}
