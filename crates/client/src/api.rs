//! REST API client for the PREreview list endpoints.
//!
//! Wraps `GET /preprints`, `/personas`, `/communities` and `/tags` using
//! [`reqwest`]. Query parameters come from
//! [`QueryState::to_list_params`](prereview_core::query::QueryState::to_list_params),
//! so every endpoint receives the same `offset`/`limit` pagination.

use std::time::Duration;

use prereview_core::models::{Community, ListResponse, Persona, Preprint, Tag};
use prereview_core::query::ListParams;
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// HTTP client for one PREreview API deployment.
#[derive(Debug, Clone)]
pub struct PrereviewApi {
    client: reqwest::Client,
    api_url: String,
}

impl PrereviewApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Base URL including the version prefix, e.g.
    ///   `https://prereview.org/api/v2`. A trailing `/` is ignored.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    /// Create an API client whose requests time out after `timeout`.
    pub fn with_timeout(
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_url))
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub async fn list_preprints(
        &self,
        params: &ListParams,
    ) -> Result<ListResponse<Preprint>, ClientError> {
        self.get_list("preprints", Some(params)).await
    }

    pub async fn list_personas(
        &self,
        params: &ListParams,
    ) -> Result<ListResponse<Persona>, ClientError> {
        self.get_list("personas", Some(params)).await
    }

    pub async fn list_communities(
        &self,
        params: &ListParams,
    ) -> Result<ListResponse<Community>, ClientError> {
        self.get_list("communities", Some(params)).await
    }

    /// Tags are not paginated; the endpoint returns all of them.
    pub async fn list_tags(&self) -> Result<ListResponse<Tag>, ClientError> {
        self.get_list("tags", None).await
    }

    // ---- private helpers ----

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&ListParams>,
    ) -> Result<ListResponse<T>, ClientError> {
        let url = format!("{}/{path}", self.api_url);
        tracing::debug!(%url, ?params, "Fetching list");

        let mut request = self.client.get(&url);
        if let Some(params) = params {
            request = request.query(params);
        }

        let response = request.send().await?;
        Self::parse_response(response).await
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ClientError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
