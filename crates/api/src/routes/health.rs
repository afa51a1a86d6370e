use axum::extract::State;
use axum::{routing::get, Json, Router};
use prereview_client::{PrereviewBackend, RequestScope};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the PREreview API answered a cheap list call.
    pub upstream_healthy: bool,
}

/// GET /health -- returns service and upstream health.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let scope = RequestScope::new();
    let upstream_healthy = check_upstream(state.backend.as_ref(), &scope).await;

    let status = if upstream_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        upstream_healthy,
    })
}

/// Whether the upstream answers a cheap list call before `scope` is cancelled.
async fn check_upstream(backend: &dyn PrereviewBackend, scope: &RequestScope) -> bool {
    scope.run(backend.list_tags()).await.is_ok()
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use prereview_client::ClientError;
    use prereview_core::models::{Community, ListResponse, Persona, Preprint, Tag};
    use prereview_core::query::ListParams;

    use super::*;

    struct Reachable;

    #[async_trait]
    impl PrereviewBackend for Reachable {
        async fn list_preprints(
            &self,
            _params: &ListParams,
        ) -> Result<ListResponse<Preprint>, ClientError> {
            Ok(ListResponse::default())
        }

        async fn list_personas(
            &self,
            _params: &ListParams,
        ) -> Result<ListResponse<Persona>, ClientError> {
            Ok(ListResponse::default())
        }

        async fn list_communities(
            &self,
            _params: &ListParams,
        ) -> Result<ListResponse<Community>, ClientError> {
            Ok(ListResponse::default())
        }

        async fn list_tags(&self) -> Result<ListResponse<Tag>, ClientError> {
            Ok(ListResponse::default())
        }
    }

    #[tokio::test]
    async fn reachable_upstream_is_healthy() {
        assert!(check_upstream(&Reachable, &RequestScope::new()).await);
    }

    #[tokio::test]
    async fn cancelled_scope_reports_unhealthy() {
        let scope = RequestScope::new();
        scope.cancel();

        assert!(!check_upstream(&Reachable, &scope).await);
    }
}
