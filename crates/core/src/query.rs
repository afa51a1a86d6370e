//! List-query protocol shared by every list view.
//!
//! A browser query string is normalized into a [`QueryState`] exactly once,
//! then either re-encoded for the address bar ([`QueryState::to_query_string`])
//! or turned into outgoing API parameters ([`QueryState::to_list_params`]).
//!
//! Parsing is permissive: unknown keys are dropped and malformed numbers fall
//! back to defaults. Nothing here returns an error.
//!
//! The API parameters deliberately omit `page`. The backend paginates with
//! `offset`/`limit`, so `page` only lives in the address bar.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Page used when `page` is absent or not a positive integer.
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used when `limit` is absent or not a positive integer.
pub const DEFAULT_LIMIT: u32 = 10;

// ---------------------------------------------------------------------------
// Filter keys
// ---------------------------------------------------------------------------

/// Multi-value filters accepted by the list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    Tags,
    Badges,
    Communities,
}

impl FilterKey {
    pub const ALL: [FilterKey; 3] = [FilterKey::Tags, FilterKey::Badges, FilterKey::Communities];

    /// Query-string key for this filter.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterKey::Tags => "tags",
            FilterKey::Badges => "badges",
            FilterKey::Communities => "communities",
        }
    }

    /// Match an already lower-cased key.
    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }
}

// ---------------------------------------------------------------------------
// QueryState
// ---------------------------------------------------------------------------

/// Canonical parameter set of a list view.
///
/// `offset` is derived: it always equals `limit * (page - 1)`. Build states
/// through [`normalize`] or [`QueryState::with_page`] to keep it in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub search: String,
    pub page: u32,
    pub limit: u32,
    pub offset: u64,
    /// Backend field name. Only meaningful if the endpoint declares the field
    /// sortable; the normalizer does not check.
    pub sort: String,
    pub ascending: bool,
    pub filters: BTreeMap<FilterKey, BTreeSet<String>>,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort: String::new(),
            ascending: false,
            filters: BTreeMap::new(),
        }
    }
}

fn compute_offset(page: u32, limit: u32) -> u64 {
    u64::from(limit) * u64::from(page.max(1) - 1)
}

/// Normalize a raw query string (with or without the leading `?`).
///
/// - Keys are matched case-insensitively; the last occurrence of a key wins.
/// - `page` and `limit` must be positive decimal integers, otherwise they
///   fall back to [`DEFAULT_PAGE`] / [`DEFAULT_LIMIT`].
/// - `asc` is true only for the exact value `"true"`.
/// - `tags`, `badges` and `communities` are comma-split into sets.
/// - Every other key is ignored.
pub fn normalize(query: &str) -> QueryState {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut search = None;
    let mut page = None;
    let mut limit = None;
    let mut sort = None;
    let mut asc = None;
    let mut raw_filters: BTreeMap<FilterKey, String> = BTreeMap::new();

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let key = key.to_lowercase();
        let value = value.into_owned();
        match key.as_str() {
            "search" => search = Some(value),
            "page" => page = Some(value),
            "limit" => limit = Some(value),
            "sort" => sort = Some(value),
            "asc" => asc = Some(value),
            other => {
                if let Some(filter) = FilterKey::from_key(other) {
                    raw_filters.insert(filter, value);
                }
            }
        }
    }

    let page = parse_positive(page.as_deref(), DEFAULT_PAGE);
    let limit = parse_positive(limit.as_deref(), DEFAULT_LIMIT);

    let filters = raw_filters
        .into_iter()
        .filter_map(|(key, value)| {
            let values = split_values(&value);
            if values.is_empty() {
                None
            } else {
                Some((key, values))
            }
        })
        .collect();

    QueryState {
        search: search.unwrap_or_default(),
        page,
        limit,
        offset: compute_offset(page, limit),
        sort: sort.unwrap_or_default(),
        ascending: asc.as_deref() == Some("true"),
        filters,
    }
}

fn parse_positive(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

fn split_values(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn join_values(values: &BTreeSet<String>) -> String {
    values
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

impl QueryState {
    /// Same query, different page. `offset` is recomputed.
    pub fn with_page(&self, page: u32) -> Self {
        let page = page.max(1);
        Self {
            page,
            offset: compute_offset(page, self.limit),
            ..self.clone()
        }
    }

    /// Values of one filter, if any were given.
    pub fn filter(&self, key: FilterKey) -> Option<&BTreeSet<String>> {
        self.filters.get(&key)
    }

    /// Canonical query string for the address bar.
    ///
    /// Always carries `page` and `limit`; `search` and `sort` only when
    /// non-empty; `asc=true` only when ascending. Normalizing the result
    /// yields this state again.
    pub fn to_query_string(&self) -> String {
        let mut out = url::form_urlencoded::Serializer::new(String::new());
        if !self.search.is_empty() {
            out.append_pair("search", &self.search);
        }
        out.append_pair("page", &self.page.to_string());
        out.append_pair("limit", &self.limit.to_string());
        if !self.sort.is_empty() {
            out.append_pair("sort", &self.sort);
        }
        if self.ascending {
            out.append_pair("asc", "true");
        }
        for (key, values) in &self.filters {
            out.append_pair(key.as_str(), &join_values(values));
        }
        out.finish()
    }

    /// Parameters sent to the REST API list endpoints. `page` is dropped.
    pub fn to_list_params(&self) -> ListParams {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        let filter = |key: FilterKey| self.filter(key).map(join_values);

        ListParams {
            search: non_empty(&self.search),
            limit: self.limit,
            offset: self.offset,
            sort: non_empty(&self.sort),
            asc: self.ascending,
            tags: filter(FilterKey::Tags),
            badges: filter(FilterKey::Badges),
            communities: filter(FilterKey::Communities),
        }
    }
}

// ---------------------------------------------------------------------------
// ListParams
// ---------------------------------------------------------------------------

/// Outgoing query parameters for a list endpoint.
///
/// Serializes (e.g. via `reqwest::RequestBuilder::query`) to
/// `search, limit, offset, sort, asc, tags, badges, communities`. `asc` is
/// always present as `"true"` or `"false"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub limit: u32,
    pub offset: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    pub asc: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badges: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communities: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        QueryState::default().to_list_params()
    }
}

impl ListParams {
    /// Key/value pairs in wire order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(8);
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("offset", self.offset.to_string()));
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        pairs.push(("asc", self.asc.to_string()));
        for (key, value) in [
            ("tags", &self.tags),
            ("badges", &self.badges),
            ("communities", &self.communities),
        ] {
            if let Some(value) = value {
                pairs.push((key, value.clone()));
            }
        }
        pairs
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
