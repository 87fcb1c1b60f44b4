//! Supersession coordinator.
//!
//! Receives the publication record of a new dataset version, looks up the
//! version it replaces and flags that version (and its files) as no longer
//! latest.
//!
//! # Flow
//!
//! ```text
//! PublicationRecord ──→ dataset_entry ──→ [SearchClient] ──→ prior id?
//!                                                              │
//!                          ┌───────────────────────────────────┤
//!                          ▼                                   ▼
//!                 Outcome::FirstVersion          datasets update ──→ files update
//!                   (no submissions)             via [UpdatePublisher]
//! ```
//!
//! Both updates are always attempted, datasets first. A failed datasets
//! update does not skip the files update; failures are reported together.

use std::fmt;
use std::sync::Arc;

use esgf_publish_client::{PublishError, UpdatePublisher};
use tracing::{debug, error, info};

use crate::payload::{Collection, UpdatePayload};
use crate::record::{PublicationRecord, RecordError, Version};
use crate::search::{SearchClient, SearchError};

/// Controls informational and diagnostic output.
///
/// `silent` gates the coordinator's notices. `verbose` only selects the
/// default log level (see `utils::bootstrap::default_log_level`); every
/// diagnostic (search URL, raw response, payloads) is a `debug!` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoticeConfig {
    /// Suppress informational notices.
    pub silent: bool,
    /// Extended diagnostic output.
    pub verbose: bool,
}

/// Result of processing one publication event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A prior version was found and both cores were updated.
    Superseded { prior_id: String },
    /// Nothing to supersede; this is the first version of the dataset.
    FirstVersion {
        master_id: String,
        version: Option<Version>,
    },
}

/// One rejected update submission.
#[derive(Debug)]
pub struct SubmissionFailure {
    pub collection: Collection,
    pub error: PublishError,
}

impl fmt::Display for SubmissionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.collection, self.error)
    }
}

/// Errors that end a supersession.
#[derive(Debug, thiserror::Error)]
pub enum SupersedeError {
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] RecordError),

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error("Update submission failed: {}", describe_failures(.0))]
    Submission(Vec<SubmissionFailure>),
}

fn describe_failures(failures: &[SubmissionFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Retires the previous latest version of a dataset.
///
/// Collaborators are injected so the publisher (and its credential) is
/// built once per coordinator and shared by every submission it makes.
pub struct Supersession {
    search: Arc<dyn SearchClient>,
    publisher: Arc<dyn UpdatePublisher>,
    notices: NoticeConfig,
}

impl Supersession {
    /// Create a new coordinator with the given collaborators.
    pub fn new(search: Arc<dyn SearchClient>, publisher: Arc<dyn UpdatePublisher>) -> Self {
        Self {
            search,
            publisher,
            notices: NoticeConfig::default(),
        }
    }

    /// Set output behaviour.
    pub fn with_notices(mut self, notices: NoticeConfig) -> Self {
        self.notices = notices;
        self
    }

    /// Process one publication record.
    pub async fn process(&self, record: &PublicationRecord) -> Result<Outcome, SupersedeError> {
        let entry = record.dataset_entry()?;
        let identity = &entry.identity;

        let Some(prior) = self.search.find_prior_version(identity).await? else {
            if !self.notices.silent {
                info!(
                    master_id = %identity.master_id,
                    version = %display_version(entry.version.as_ref()),
                    "First dataset version for {}: v{}",
                    identity.master_id,
                    display_version(entry.version.as_ref())
                );
            }
            return Ok(Outcome::FirstVersion {
                master_id: identity.master_id.clone(),
                version: entry.version,
            });
        };

        self.retire(&prior.id).await?;

        if !self.notices.silent {
            info!(
                prior_id = %prior.id,
                "Found previous version, updated the record: {}",
                prior.id
            );
        }

        Ok(Outcome::Superseded { prior_id: prior.id })
    }

    /// Submit `latest=false` for `prior_id` to every core, in order.
    async fn retire(&self, prior_id: &str) -> Result<(), SupersedeError> {
        let mut failures = Vec::new();

        for collection in Collection::ALL {
            let xml = UpdatePayload::hide_latest(collection, prior_id).to_xml();

            debug!(collection = %collection, payload = %xml, "Update payload");

            if let Err(e) = self.publisher.update(&xml).await {
                error!(
                    collection = %collection,
                    target = %prior_id,
                    publisher = %self.publisher.name(),
                    error = %e,
                    "Update submission failed"
                );
                failures.push(SubmissionFailure {
                    collection,
                    error: e,
                });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(SupersedeError::Submission(failures))
        }
    }
}

fn display_version(version: Option<&Version>) -> String {
    version
        .map(ToString::to_string)
        .unwrap_or_else(|| "unknown".to_string())
}
