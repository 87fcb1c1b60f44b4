//! Client trait for index update submission.
//!
//! The supersession workflow only depends on this trait, so tests and
//! alternative transports can stand in for the certificate-bearing client.

use async_trait::async_trait;

use crate::error::Result;

/// Trait for submitting update documents to an index node.
///
/// Implement this trait to create mock clients for testing or
/// alternative transport implementations.
#[async_trait]
pub trait UpdatePublisher: Send + Sync {
    /// Submit a single `<updates>` document.
    async fn update(&self, xml: &str) -> Result<()>;

    /// Return the publisher name for logging.
    fn name(&self) -> &str {
        "publisher"
    }
}
