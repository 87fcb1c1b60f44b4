//! Client for the ESGF index update service.
//!
//! Submits pre-built Solr update documents to an index node's
//! `esg-search/ws/update` endpoint, authenticating with the publisher's
//! certificate when one is configured.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use esgf_publish_client::{PublisherClient, PublisherConfig, UpdatePublisher};
//!
//! async fn example(xml: &str) -> esgf_publish_client::Result<()> {
//!     let config = PublisherConfig::new("esgf-node.example.org")
//!         .with_cert("/home/publisher/.globus/certificate-file");
//!     let client = PublisherClient::new(config)?;
//!     client.update(xml).await
//! }
//! ```
//!
//! # Mocking for Tests
//!
//! Implement [`UpdatePublisher`] to record submissions instead of sending them:
//!
//! ```rust,ignore
//! use esgf_publish_client::UpdatePublisher;
//! use async_trait::async_trait;
//!
//! struct RecordingPublisher(std::sync::Mutex<Vec<String>>);
//!
//! #[async_trait]
//! impl UpdatePublisher for RecordingPublisher {
//!     async fn update(&self, xml: &str) -> esgf_publish_client::Result<()> {
//!         self.0.lock().unwrap().push(xml.to_string());
//!         Ok(())
//!     }
//! }
//! ```

pub mod client;
pub mod error;
pub mod traits;

pub use client::{PublisherClient, PublisherConfig};
pub use error::{PublishError, Result};
pub use traits::UpdatePublisher;
