//! HTTP client for the search store.
//!
//! The client is a process-lifetime singleton constructed at startup and
//! shared read-only across all concurrent query executions. A connectivity
//! probe ([`StoreClient::ping`]) runs once at startup; the process aborts if
//! it fails.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::types::{LogDocument, SearchResult};

/// Configuration for the store client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreClientConfig {
    /// Base URL of the store, e.g. `http://127.0.0.1:9200`.
    pub base_url: String,
    /// Per-request timeout; bounds every search so a slow store cannot hang
    /// a detection flow forever.
    pub request_timeout: Duration,
}

impl StoreClientConfig {
    /// Creates a configuration with the default request timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Abstract search capability.
///
/// Fronts [`StoreClient::search`] so detection flows can be driven against
/// a fake store in tests.
#[async_trait]
pub trait LogSearch: Send + Sync {
    /// Executes a query against the named index, returning at most `limit`
    /// hits plus the store's authoritative total.
    async fn search(&self, index: &str, query: &Value, limit: usize) -> Result<SearchResult>;
}

/// HTTP client for an Elasticsearch-compatible search store.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl StoreClient {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if the base URL is empty and
    /// `StoreError::Connection` if the HTTP client cannot be built.
    pub fn new(config: StoreClientConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(StoreError::Config {
                reason: "base URL cannot be empty".to_string(),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probes store connectivity, returning the store's reported version.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Probe` if the store is unreachable or answers
    /// with a non-success status. Callers treat this as startup-fatal.
    pub async fn ping(&self) -> Result<String> {
        let response = self
            .http
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| StoreError::Probe {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Probe {
                reason: format!("status {status}"),
            });
        }

        let body: Value = response.json().await.map_err(|e| StoreError::Probe {
            reason: e.to_string(),
        })?;

        let version = body["version"]["number"]
            .as_str()
            .unwrap_or("unknown")
            .to_string();
        Ok(version)
    }

    async fn execute(&self, index: &str, query: &Value, limit: usize) -> Result<SearchResult> {
        let url = format!("{}/{}/_search", self.base_url, index);
        let body = json!({ "query": query, "size": limit });

        debug!(index = %index, limit = limit, "executing store query");

        let response = self.http.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
            });
        }

        let raw: Value = response.json().await?;
        parse_search_response(raw)
    }
}

#[async_trait]
impl LogSearch for StoreClient {
    async fn search(&self, index: &str, query: &Value, limit: usize) -> Result<SearchResult> {
        self.execute(index, query, limit).await
    }
}

/// Decodes a raw store response body into a [`SearchResult`].
///
/// Supports both the object form of `hits.total` (`{"value": N}`) and the
/// bare-integer form used by older store versions.
fn parse_search_response(raw: Value) -> Result<SearchResult> {
    let response: RawSearchResponse =
        serde_json::from_value(raw).map_err(|e| StoreError::Decode {
            reason: e.to_string(),
        })?;

    let hits = response
        .hits
        .hits
        .into_iter()
        .map(|hit| LogDocument {
            id: hit.id,
            fields: hit.source,
        })
        .collect();

    Ok(SearchResult {
        total: response.hits.total.value(),
        hits,
    })
}

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    hits: RawHits,
}

#[derive(Debug, Deserialize)]
struct RawHits {
    total: RawTotal,
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTotal {
    Count(u64),
    Object {
        value: u64,
    },
}

impl RawTotal {
    const fn value(&self) -> u64 {
        match self {
            Self::Count(n) | Self::Object { value: n } => *n,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", default)]
    source: HashMap<String, Value>,
}
