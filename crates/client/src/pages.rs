//! Page loaders.
//!
//! Each loader takes an already normalized [`QueryState`], fetches
//! everything its view needs inside a [`RequestScope`], and shapes the
//! responses with `prereview_core`. Multi-resource pages issue their
//! fetches concurrently and only return once all of them succeeded.

use prereview_core::activity::{aggregate_activity, ActivityEntry};
use prereview_core::models::{Community, ListResponse, Persona, Preprint, Tag};
use prereview_core::query::{ListParams, QueryState};
use prereview_core::trending::{build_cards, PreprintCard, SortOption};
use prereview_core::types::Timestamp;
use serde::Serialize;

use crate::backend::PrereviewBackend;
use crate::error::ClientError;
use crate::scope::RequestScope;

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// One page of the preprint list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprintPage {
    pub query: QueryState,
    pub sort: SortOption,
    pub cards: Vec<PreprintCard>,
    pub total_count: u64,
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub query: QueryState,
    pub preprints: ListResponse<Preprint>,
    pub tags: Vec<Tag>,
    pub communities: Vec<Community>,
    pub activity: Vec<ActivityEntry>,
}

/// A plain paginated list together with the query that produced it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPage<T> {
    pub query: QueryState,
    pub data: Vec<T>,
    pub total_count: u64,
}

impl<T> ListPage<T> {
    fn new(query: &QueryState, list: ListResponse<T>) -> Self {
        Self {
            query: query.clone(),
            data: list.data,
            total_count: list.total_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Load one page of preprint cards.
///
/// Cards are ranked by trending score when `sort` is [`SortOption::Score`];
/// otherwise the backend order is kept.
pub async fn load_preprint_page(
    backend: &dyn PrereviewBackend,
    scope: &RequestScope,
    query: &QueryState,
    sort: SortOption,
    now: Timestamp,
) -> Result<PreprintPage, ClientError> {
    let params = query.to_list_params();
    let list = scope
        .run(backend.list_preprints(&params))
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to load preprints"))?;

    tracing::debug!(
        returned = list.data.len(),
        total = list.total_count,
        sort = sort.as_str(),
        "Preprint page loaded",
    );

    Ok(PreprintPage {
        query: query.clone(),
        sort,
        total_count: list.total_count,
        cards: build_cards(list.data, sort, now),
    })
}

/// Load the dashboard: preprints, tags and communities in parallel, then
/// the activity feed built from the preprints.
pub async fn load_dashboard(
    backend: &dyn PrereviewBackend,
    scope: &RequestScope,
    query: &QueryState,
    now: Timestamp,
) -> Result<DashboardView, ClientError> {
    let preprint_params = query.to_list_params();
    let community_params = ListParams::default();

    let (preprints, tags, communities) = scope
        .run(async {
            tokio::try_join!(
                backend.list_preprints(&preprint_params),
                backend.list_tags(),
                backend.list_communities(&community_params),
            )
        })
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to load dashboard"))?;

    let activity = aggregate_activity(&preprints.data, now);
    tracing::debug!(
        preprints = preprints.data.len(),
        tags = tags.data.len(),
        communities = communities.data.len(),
        activity = activity.len(),
        "Dashboard loaded",
    );

    Ok(DashboardView {
        query: query.clone(),
        preprints,
        tags: tags.data,
        communities: communities.data,
        activity,
    })
}

pub async fn load_personas(
    backend: &dyn PrereviewBackend,
    scope: &RequestScope,
    query: &QueryState,
) -> Result<ListPage<Persona>, ClientError> {
    let params = query.to_list_params();
    let list = scope
        .run(backend.list_personas(&params))
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to load personas"))?;
    Ok(ListPage::new(query, list))
}

pub async fn load_communities(
    backend: &dyn PrereviewBackend,
    scope: &RequestScope,
    query: &QueryState,
) -> Result<ListPage<Community>, ClientError> {
    let params = query.to_list_params();
    let list = scope
        .run(backend.list_communities(&params))
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to load communities"))?;
    Ok(ListPage::new(query, list))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use prereview_core::models::{RapidReview, Request};
    use prereview_core::query::normalize;

    use super::*;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn preprint(handle: &str, requests: usize, reviews: usize, hours_ago: i64) -> Preprint {
        let at = now() - Duration::hours(hours_ago);
        Preprint {
            uuid: format!("uuid-{handle}"),
            handle: handle.into(),
            title: format!("Title {handle}"),
            date_posted: None,
            created_at: at,
            requests: (0..requests)
                .map(|i| Request {
                    uuid: format!("{handle}-req{i}"),
                    author: None,
                    created_at: at,
                })
                .collect(),
            rapid_reviews: (0..reviews)
                .map(|i| RapidReview {
                    uuid: format!("{handle}-rr{i}"),
                    author: None,
                    created_at: at,
                })
                .collect(),
            full_reviews: Vec::new(),
        }
    }

    /// In-memory backend recording the parameters it was called with.
    #[derive(Default)]
    struct FakeBackend {
        preprints: Vec<Preprint>,
        fail_tags: bool,
        hang: bool,
        seen: Mutex<Vec<(&'static str, Option<ListParams>)>>,
    }

    impl FakeBackend {
        fn record(&self, endpoint: &'static str, params: Option<&ListParams>) {
            self.seen.lock().unwrap().push((endpoint, params.cloned()));
        }

        async fn maybe_hang(&self) {
            if self.hang {
                std::future::pending::<()>().await;
            }
        }
    }

    #[async_trait]
    impl PrereviewBackend for FakeBackend {
        async fn list_preprints(
            &self,
            params: &ListParams,
        ) -> Result<ListResponse<Preprint>, ClientError> {
            self.record("preprints", Some(params));
            self.maybe_hang().await;
            Ok(ListResponse {
                data: self.preprints.clone(),
                total_count: 42,
            })
        }

        async fn list_personas(
            &self,
            params: &ListParams,
        ) -> Result<ListResponse<Persona>, ClientError> {
            self.record("personas", Some(params));
            Ok(ListResponse {
                data: vec![Persona {
                    uuid: "persona-1".into(),
                    name: "Reviewer".into(),
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
            self.record("communities", Some(params));
            Ok(ListResponse {
                data: vec![Community {
                    uuid: "c1".into(),
                    slug: "outbreak-science".into(),
                    name: "Outbreak Science".into(),
                    description: None,
                }],
                total_count: 1,
            })
        }

        async fn list_tags(&self) -> Result<ListResponse<Tag>, ClientError> {
            self.record("tags", None);
            if self.fail_tags {
                return Err(ClientError::Api {
                    status: 500,
                    body: "boom".into(),
                });
            }
            Ok(ListResponse {
                data: vec![Tag {
                    uuid: "t1".into(),
                    name: "covid-19".into(),
                    color: None,
                }],
                total_count: 0,
            })
        }
    }

    #[tokio::test]
    async fn preprint_page_sends_list_params_and_ranks_by_score() {
        let backend = FakeBackend {
            preprints: vec![preprint("cold", 1, 0, 24 * 30), preprint("hot", 2, 3, 1)],
            ..Default::default()
        };
        let query = normalize("page=2&limit=5&sort=score");
        let scope = RequestScope::new();

        let page = load_preprint_page(&backend, &scope, &query, SortOption::Score, now())
            .await
            .unwrap();

        assert_eq!(page.total_count, 42);
        assert_eq!(page.cards[0].preprint.handle, "hot");
        assert_eq!(page.cards[1].preprint.handle, "cold");

        let seen = backend.seen.lock().unwrap();
        let (endpoint, params) = &seen[0];
        assert_eq!(*endpoint, "preprints");
        let params = params.as_ref().unwrap();
        assert_eq!((params.limit, params.offset), (5, 5));
        assert_eq!(params.sort.as_deref(), Some("score"));
    }

    #[tokio::test]
    async fn dashboard_joins_all_fetches() {
        let backend = FakeBackend {
            preprints: vec![preprint("doi:1", 1, 1, 2)],
            ..Default::default()
        };
        let query = normalize("search=covid");
        let scope = RequestScope::new();

        let view = load_dashboard(&backend, &scope, &query, now())
            .await
            .unwrap();

        assert_eq!(view.preprints.data.len(), 1);
        assert_eq!(view.tags.len(), 1);
        assert_eq!(view.communities.len(), 1);
        assert_eq!(view.activity.len(), 2);

        let seen = backend.seen.lock().unwrap();
        let mut endpoints: Vec<&str> = seen.iter().map(|(e, _)| *e).collect();
        endpoints.sort_unstable();
        assert_eq!(endpoints, vec!["communities", "preprints", "tags"]);
    }

    #[tokio::test]
    async fn dashboard_fails_when_any_fetch_fails() {
        let backend = FakeBackend {
            preprints: vec![preprint("doi:1", 1, 0, 2)],
            fail_tags: true,
            ..Default::default()
        };
        let scope = RequestScope::new();

        let result = load_dashboard(&backend, &scope, &QueryState::default(), now()).await;

        assert_matches!(result, Err(ClientError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn superseded_load_is_cancelled() {
        let backend = FakeBackend {
            hang: true,
            ..Default::default()
        };
        let scope = RequestScope::new();
        let token = scope.token();
        let query = QueryState::default();

        let load = load_preprint_page(&backend, &scope, &query, SortOption::New, now());
        let (result, ()) = tokio::join!(load, async {
            tokio::task::yield_now().await;
            token.cancel();
        });

        assert_matches!(result, Err(ClientError::Cancelled));
    }

    #[tokio::test]
    async fn list_pages_carry_query_and_total() {
        let backend = FakeBackend::default();
        let scope = RequestScope::new();
        let query = normalize("search=smith&limit=20");

        let personas = load_personas(&backend, &scope, &query).await.unwrap();
        assert_eq!(personas.total_count, 1);
        assert_eq!(personas.query.search, "smith");

        let communities = load_communities(&backend, &scope, &query).await.unwrap();
        assert_eq!(communities.data[0].slug, "outbreak-science");
    }
}
