#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use prereview_api::config::ServerConfig;
use prereview_api::router::build_app_router;
use prereview_api::state::AppState;
use prereview_client::{ClientError, PrereviewBackend};
use prereview_core::models::{
    Community, FullReview, ListResponse, Persona, Preprint, RapidReview, Request as ReviewRequest,
    Tag,
};
use prereview_core::query::ListParams;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        prereview_api_url: "http://upstream.invalid/api/v2".to_string(),
        upstream_timeout_secs: 5,
    }
}

/// In-memory stand-in for the PREreview REST API.
#[derive(Default)]
pub struct FakeBackend {
    pub preprints: Vec<Preprint>,
    /// When set, every call fails with this upstream status.
    pub fail_with: Option<u16>,
    /// Parameters received by the list endpoints, in call order.
    pub seen: Mutex<Vec<ListParams>>,
}

impl FakeBackend {
    fn check(&self, params: Option<&ListParams>) -> Result<(), ClientError> {
        if let Some(params) = params {
            self.seen.lock().unwrap().push(params.clone());
        }
        match self.fail_with {
            Some(status) => Err(ClientError::Api {
                status,
                body: "upstream exploded".into(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PrereviewBackend for FakeBackend {
    async fn list_preprints(
        &self,
        params: &ListParams,
    ) -> Result<ListResponse<Preprint>, ClientError> {
        self.check(Some(params))?;
        Ok(ListResponse {
            data: self.preprints.clone(),
            total_count: self.preprints.len() as u64,
        })
    }

    async fn list_personas(
        &self,
        params: &ListParams,
    ) -> Result<ListResponse<Persona>, ClientError> {
        self.check(Some(params))?;
        Ok(ListResponse {
            data: vec![Persona {
                uuid: "persona-1".into(),
                name: "Jane Reviewer".into(),
                is_anonymous: false,
                badges: Vec::new(),
            }],
            total_count: 1,
        })
    }

    async fn list_communities(
        &self,
        params: &ListParams,
    ) -> Result<ListResponse<Community>, ClientError> {
        self.check(Some(params))?;
        Ok(ListResponse {
            data: vec![Community {
                uuid: "community-1".into(),
                slug: "outbreak-science".into(),
                name: "Outbreak Science".into(),
                description: Some("Rapid review of outbreak preprints".into()),
            }],
            total_count: 1,
        })
    }

    async fn list_tags(&self) -> Result<ListResponse<Tag>, ClientError> {
        self.check(None)?;
        Ok(ListResponse {
            data: vec![Tag {
                uuid: "tag-1".into(),
                name: "covid-19".into(),
                color: None,
            }],
            total_count: 0,
        })
    }
}

/// A preprint whose activity happened `hours_ago`, with the given numbers
/// of requests, rapid reviews and (published, draft) full reviews.
pub fn preprint(
    handle: &str,
    requests: usize,
    rapid: usize,
    (published, drafts): (usize, usize),
    hours_ago: i64,
) -> Preprint {
    let at = Utc::now() - Duration::hours(hours_ago);
    let full = |prefix: &str, n: usize, is_published: bool| {
        (0..n)
            .map(|i| FullReview {
                uuid: format!("{handle}-{prefix}{i}"),
                is_published,
                authors: Vec::new(),
                created_at: at,
            })
            .collect::<Vec<_>>()
    };

    let mut full_reviews = full("full", published, true);
    full_reviews.extend(full("draft", drafts, false));

    Preprint {
        uuid: format!("uuid-{handle}"),
        handle: handle.to_string(),
        title: format!("Title of {handle}"),
        date_posted: None,
        created_at: at,
        requests: (0..requests)
            .map(|i| ReviewRequest {
                uuid: format!("{handle}-req{i}"),
                author: None,
                created_at: at,
            })
            .collect(),
        rapid_reviews: (0..rapid)
            .map(|i| RapidReview {
                uuid: format!("{handle}-rapid{i}"),
                author: None,
                created_at: at,
            })
            .collect(),
        full_reviews,
    }
}

/// Build the full application router around `backend`, using the same
/// middleware stack as production.
pub fn build_test_app(backend: Arc<FakeBackend>) -> Router {
    let state = AppState { backend };
    build_app_router(state, &test_config())
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
