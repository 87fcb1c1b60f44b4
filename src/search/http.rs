//! HTTP search client for `esg-search`.
//!
//! Issues a single GET against `http://{index_node}/esg-search/search/`
//! with the Solr JSON response format.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::{
    select_prior, validate_identity, PriorRecord, SearchClient, SearchError, SearchResponse,
};
use crate::record::DatasetIdentity;

/// Response format requested from the search service.
const SOLR_JSON_FORMAT: &str = "application/solr+json";

/// Fields requested for each matching record.
const RETURN_FIELDS: &str = "version,id";

/// Search client configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Index node host (optionally with port).
    pub index_node: String,

    /// Request timeout.
    pub timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            index_node: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl SearchConfig {
    pub fn new(index_node: impl Into<String>) -> Self {
        Self {
            index_node: index_node.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Search client backed by reqwest.
pub struct HttpSearchClient {
    client: Client,
    config: SearchConfig,
}

impl HttpSearchClient {
    /// Create a new search client with the given configuration.
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        if config.index_node.is_empty() {
            return Err(SearchError::InvalidArgument(
                "index node not configured".to_string(),
            ));
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { client, config })
    }

    /// Build the search URL for `identity`.
    ///
    /// Restricts the search to latest, non-replica records on the local
    /// core and asks only for `version` and `id`.
    pub fn search_url(&self, identity: &DatasetIdentity) -> Result<Url, SearchError> {
        let base = format!("http://{}/esg-search/search/", self.config.index_node);
        let mut url = Url::parse(&base).map_err(|e| {
            SearchError::InvalidArgument(format!("index node '{}': {}", self.config.index_node, e))
        })?;

        url.query_pairs_mut()
            .append_pair("latest", "true")
            .append_pair("distrib", "false")
            .append_pair("format", SOLR_JSON_FORMAT)
            .append_pair("data_node", &identity.data_node)
            .append_pair("master_id", &identity.master_id)
            .append_pair("fields", RETURN_FIELDS);

        Ok(url)
    }
}

#[async_trait]
impl SearchClient for HttpSearchClient {
    async fn find_prior_version(
        &self,
        identity: &DatasetIdentity,
    ) -> Result<Option<PriorRecord>, SearchError> {
        validate_identity(identity)?;

        let url = self.search_url(identity)?;
        debug!(url = %url, "Search URL");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(status = %status, body = %body, "Search response");

        if status != StatusCode::OK {
            return Err(SearchError::Status {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        select_prior(parsed)
    }
}
