//! Object-safe seam over the list endpoints.
//!
//! Page loaders and the view service hold an `Arc<dyn PrereviewBackend>`
//! so tests can substitute an in-memory backend for [`PrereviewApi`].

use async_trait::async_trait;
use prereview_core::models::{Community, ListResponse, Persona, Preprint, Tag};
use prereview_core::query::ListParams;

use crate::api::PrereviewApi;
use crate::error::ClientError;

#[async_trait]
pub trait PrereviewBackend: Send + Sync {
    async fn list_preprints(
        &self,
        params: &ListParams,
    ) -> Result<ListResponse<Preprint>, ClientError>;

    async fn list_personas(
        &self,
        params: &ListParams,
    ) -> Result<ListResponse<Persona>, ClientError>;

    async fn list_communities(
        &self,
        params: &ListParams,
    ) -> Result<ListResponse<Community>, ClientError>;

    async fn list_tags(&self) -> Result<ListResponse<Tag>, ClientError>;
}

#[async_trait]
impl PrereviewBackend for PrereviewApi {
    async fn list_preprints(
        &self,
        params: &ListParams,
    ) -> Result<ListResponse<Preprint>, ClientError> {
        PrereviewApi::list_preprints(self, params).await
    }

    async fn list_personas(
        &self,
        params: &ListParams,
    ) -> Result<ListResponse<Persona>, ClientError> {
        PrereviewApi::list_personas(self, params).await
    }

    async fn list_communities(
        &self,
        params: &ListParams,
    ) -> Result<ListResponse<Community>, ClientError> {
        PrereviewApi::list_communities(self, params).await
    }

    async fn list_tags(&self) -> Result<ListResponse<Tag>, ClientError> {
        PrereviewApi::list_tags(self).await
    }
}
