//! Catalog REST client.
//!
//! One function per query shape. Every function performs a single HTTP GET
//! (search and by-generation reuse the capped full listing) and returns a
//! `Result<_, FetchError>`; the loaders decide how each failure is shown.

use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::types::{Category, Creature};

/// Default cap used when emulating by-generation queries client-side.
pub const GENERATION_CAP: u32 = 400;
/// Listing size scanned by name search.
pub const SEARCH_SCAN: u32 = 200;
pub const SEARCH_LIMIT: usize = 20;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch {what}: HTTP {status}")]
    Status { what: String, status: u16, url: String },

    #[error("unexpected content type from {url}: {found:?}")]
    ContentType { url: String, found: String },

    #[error("malformed response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("[api] falling back to default http client: {e}");
                reqwest::Client::new()
            });
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("[api] GET {url}");

        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                what: what.to_string(),
                status: status.as_u16(),
                url,
            });
        }

        let found = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !found.contains("application/json") {
            return Err(FetchError::ContentType { url, found });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Parse { url, source })
    }

    /// All creatures, optionally capped at `limit`.
    pub async fn fetch_all(&self, limit: Option<u32>) -> Result<Vec<Creature>, FetchError> {
        let path = match limit {
            Some(n) if n > 0 => format!("/pokemon/limit/{n}"),
            _ => "/pokemon".to_string(),
        };
        let list: Vec<Creature> = self.get_json(&path, "creatures").await?;
        log::info!("[api] fetched {} creatures", list.len());
        Ok(list)
    }

    /// Lookup by catalog number.
    ///
    /// A non-2xx status or a non-JSON body yields `Ok(None)` after logging;
    /// transport and parse failures are still returned.
    pub async fn fetch_by_id(&self, id: u32) -> Result<Option<Creature>, FetchError> {
        match self.get_json(&format!("/pokemon/{id}"), &format!("creature #{id}")).await {
            Ok(creature) => Ok(Some(creature)),
            Err(e @ (FetchError::Status { .. } | FetchError::ContentType { .. })) => {
                log::warn!("[api] creature #{id} unavailable: {e}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn fetch_by_name(&self, name: &str) -> Result<Creature, FetchError> {
        let path = format!("/pokemon/{}", urlencoding::encode(name));
        self.get_json(&path, &format!("creature {name}")).await
    }

    /// Creatures carrying the category `name` (matched lowercase by the API).
    pub async fn fetch_by_category(&self, name: &str) -> Result<Vec<Creature>, FetchError> {
        let path = format!("/pokemon/type/{}", urlencoding::encode(&name.to_lowercase()));
        log::debug!("[api] fetching category {name}");
        self.get_json(&path, &format!("category {name}")).await
    }

    /// Creatures of one generation, filtered locally from the first `cap` records.
    pub async fn fetch_by_generation(
        &self,
        generation: u32,
        cap: u32,
    ) -> Result<Vec<Creature>, FetchError> {
        let mut list = self.fetch_all(Some(cap)).await?;
        list.retain(|c| c.generation == generation);
        Ok(list)
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, FetchError> {
        self.get_json("/types", "categories").await
    }

    /// Case-insensitive name search over the first [`SEARCH_SCAN`] records.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Creature>, FetchError> {
        let needle = query.to_lowercase();
        let list = self.fetch_all(Some(SEARCH_SCAN)).await?;
        Ok(list
            .into_iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .take(limit)
            .collect())
    }

    /// Resolve several catalog numbers concurrently, skipping unavailable ones.
    /// A lookup that fails outright is logged and skipped like a missing id.
    /// Output keeps the order of `ids`.
    pub async fn fetch_many_by_id(&self, ids: &[u32]) -> Result<Vec<Creature>, FetchError> {
        let lookups = ids.iter().map(|&id| self.fetch_by_id(id));
        let results = futures::future::join_all(lookups).await;
        let mut found = Vec::with_capacity(ids.len());
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(Some(creature)) => found.push(creature),
                Ok(None) => {}
                Err(e) => log::warn!("[api] skipping creature {id}: {e}"),
            }
        }
        Ok(found)
    }
}
