//! Application configuration.
//!
//! Settings are layered from YAML files and environment variables, then
//! finalised by command-line flags in the binary.

use std::path::PathBuf;
use std::time::Duration;

use esgf_publish_client::PublisherConfig;
use serde::Deserialize;

use crate::search::SearchConfig;
use crate::supersede::NoticeConfig;

/// Default configuration file name (without extension).
pub const DEFAULT_CONFIG_FILE: &str = "supersede";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "ESGF_SUPERSEDE_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "ESGF_SUPERSEDE";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "ESGF_SUPERSEDE_LOG";
/// Default timeout for search and update requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Index node hosting both the search and update services.
    pub index_node: String,
    /// PEM file with the publisher certificate and key.
    pub cert: Option<PathBuf>,
    /// Suppress informational notices.
    pub silent: bool,
    /// Extended diagnostic output.
    pub verbose: bool,
    /// Timeout applied to every request.
    pub timeout_secs: u64,
    /// Skip server certificate verification on the update endpoint.
    pub accept_invalid_certs: bool,
    /// Base URL of the update service, when it is not
    /// `https://{index_node}/esg-search/ws`.
    pub update_service_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_node: String::new(),
            cert: None,
            silent: false,
            verbose: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            accept_invalid_certs: false,
            update_service_url: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("index_node is required (config file, ESGF_SUPERSEDE__INDEX_NODE or --index-node)")]
    MissingIndexNode,
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `supersede.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check that everything required to run is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index_node.is_empty() {
            return Err(ConfigError::MissingIndexNode);
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn notices(&self) -> NoticeConfig {
        NoticeConfig {
            silent: self.silent,
            verbose: self.verbose,
        }
    }

    /// Settings for the search client.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig::new(&self.index_node).with_timeout(self.timeout())
    }

    /// Settings for the update-submission client.
    pub fn publisher_config(&self) -> PublisherConfig {
        let mut config = PublisherConfig::new(&self.index_node)
            .with_timeout(self.timeout())
            .with_accept_invalid_certs(self.accept_invalid_certs);
        if let Some(cert) = &self.cert {
            config = config.with_cert(cert);
        }
        if let Some(url) = &self.update_service_url {
            config = config.with_service_url(url);
        }
        config
    }
}
