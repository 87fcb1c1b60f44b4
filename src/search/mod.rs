//! Prior-version lookup against the index search endpoint.
//!
//! Resolves a dataset identity to the record currently flagged `latest`
//! on the local index core (replicas excluded), if there is one.
//!
//! # Architecture
//!
//! ```text
//! DatasetIdentity ──→ [SearchClient] ──→ SearchResponse ──→ select_prior ──→ Option<PriorRecord>
//!                     (HTTP GET, JSON)                      (highest version wins)
//! ```

mod http;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::record::{DatasetIdentity, Version};

pub use http::{HttpSearchClient, SearchConfig};

/// Errors that can occur while looking up a prior version.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// HTTP request failed (connection, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Index server answered with a non-200 status.
    #[error("received {status} from index server")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Response body did not have the expected shape.
    #[error("invalid search response: {0}")]
    InvalidResponse(String),

    /// Lookup was asked for with an unusable identity or endpoint.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// The record a new version supersedes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriorRecord {
    /// Full versioned identifier, e.g. `master_id.vN|data_node`.
    pub id: String,
    #[serde(default)]
    pub version: Option<Version>,
}

/// Top-level Solr JSON response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub response: SearchResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "numFound")]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<PriorRecord>,
}

/// Trait for prior-version lookup.
///
/// Implement this trait to create mock resolvers for testing or
/// alternative search backends.
#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Find the record currently flagged latest for `identity`.
    ///
    /// `Ok(None)` means the identity has never been published on this node.
    async fn find_prior_version(
        &self,
        identity: &DatasetIdentity,
    ) -> Result<Option<PriorRecord>, SearchError>;
}

/// Pick the prior record out of a search response.
///
/// When several records claim to be latest, the highest comparable
/// version wins; equal ranks keep response order.
pub fn select_prior(response: SearchResponse) -> Result<Option<PriorRecord>, SearchError> {
    let result = response.response;
    if result.num_found == 0 {
        return Ok(None);
    }

    if result.docs.len() > 1 {
        warn!(
            candidates = result.docs.len(),
            num_found = result.num_found,
            "Multiple records flagged latest, selecting highest version"
        );
    }

    let selected = result.docs.into_iter().reduce(|best, doc| {
        if Version::rank(doc.version.as_ref(), best.version.as_ref()).is_gt() {
            doc
        } else {
            best
        }
    });

    match selected {
        Some(record) => Ok(Some(record)),
        None => Err(SearchError::InvalidResponse(format!(
            "numFound is {} but no documents were returned",
            result.num_found
        ))),
    }
}

/// Reject identities the search endpoint cannot be asked about.
pub(crate) fn validate_identity(identity: &DatasetIdentity) -> Result<(), SearchError> {
    if identity.master_id.is_empty() {
        return Err(SearchError::InvalidArgument("master_id is empty".to_string()));
    }
    if identity.data_node.is_empty() {
        return Err(SearchError::InvalidArgument("data_node is empty".to_string()));
    }
    Ok(())
}
