//! Certificate-bearing HTTP client for the index update service.
//!
//! POSTs `<updates>` documents to `https://{index_node}/esg-search/ws/update`
//! using `text/xml` content type.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Identity};
use tracing::{debug, error, warn};

use crate::error::{PublishError, Result};
use crate::traits::UpdatePublisher;

/// Path of the update operation below the service base URL.
const UPDATE_OPERATION: &str = "update";

/// Publisher client configuration.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Index node hostname (optionally with port).
    pub index_node: String,

    /// PEM file holding the publisher certificate and private key.
    /// `None` submits without client authentication.
    pub cert: Option<PathBuf>,

    /// Request timeout.
    pub timeout: Duration,

    /// Skip server certificate verification (self-signed index nodes).
    pub accept_invalid_certs: bool,

    /// Overrides the `https://{index_node}/esg-search/ws` base URL.
    pub service_url: Option<String>,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            index_node: String::new(),
            cert: None,
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            service_url: None,
        }
    }
}

impl PublisherConfig {
    /// Create config targeting the given index node.
    pub fn new(index_node: impl Into<String>) -> Self {
        Self {
            index_node: index_node.into(),
            ..Default::default()
        }
    }

    /// Set the certificate file.
    pub fn with_cert(mut self, cert: impl Into<PathBuf>) -> Self {
        self.cert = Some(cert.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept invalid server certificates.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Override the service base URL.
    pub fn with_service_url(mut self, url: impl Into<String>) -> Self {
        self.service_url = Some(url.into());
        self
    }

    /// Full URL of the update operation.
    pub fn update_url(&self) -> String {
        let base = match &self.service_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}/esg-search/ws", self.index_node),
        };
        format!("{}/{}", base, UPDATE_OPERATION)
    }
}

/// Client for the index update service.
///
/// Built once and reused for every submission, so the certificate is
/// loaded a single time per client.
pub struct PublisherClient {
    client: Client,
    config: PublisherConfig,
}

impl PublisherClient {
    /// Create a new client with the given configuration.
    pub fn new(config: PublisherConfig) -> Result<Self> {
        if config.index_node.is_empty() && config.service_url.is_none() {
            return Err(PublishError::Config(
                "index node not configured".to_string(),
            ));
        }

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs);

        if let Some(cert) = &config.cert {
            builder = builder.identity(load_identity(cert)?);
        }

        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }
}

/// Load a PEM bundle (certificate chain plus private key) as a client identity.
fn load_identity(path: &Path) -> Result<Identity> {
    let pem = std::fs::read(path).map_err(|e| PublishError::Certificate {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Identity::from_pem(&pem).map_err(|e| PublishError::Certificate {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[async_trait]
impl UpdatePublisher for PublisherClient {
    async fn update(&self, xml: &str) -> Result<()> {
        let url = self.config.update_url();

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "text/xml")
            .body(xml.to_string())
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            // The update is applied once the status arrives; the body is informational.
            match response.text().await {
                Ok(body) => debug!(url = %url, status = %status, body = %body, "Update accepted"),
                Err(e) => warn!(
                    url = %url,
                    status = %status,
                    error = %e,
                    "Update accepted, response body unreadable"
                ),
            }
            return Ok(());
        }

        let body = response.text().await?;
        error!(url = %url, status = %status, body = %body, "Update rejected");
        Err(PublishError::Status {
            status,
            body: body.chars().take(200).collect(),
        })
    }

    fn name(&self) -> &str {
        "esg-search/ws"
    }
}
