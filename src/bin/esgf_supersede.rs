//! esgf-supersede: retire the previous version of a newly published dataset
//!
//! Reads the publication record of a new dataset version, finds the version
//! currently flagged latest on the index node and sets `latest=false` on it
//! in both the datasets and files cores.
//!
//! ## Usage
//! ```text
//! esgf-supersede --index-node esgf-node.example.org \
//!     --cert ~/.globus/certificate-file record.json
//! ```
//!
//! ## Configuration
//! - `supersede.yaml`, `--config FILE` or `ESGF_SUPERSEDE_CONFIG`
//! - `ESGF_SUPERSEDE__INDEX_NODE`, `ESGF_SUPERSEDE__CERT`, ... environment overrides
//! - `ESGF_SUPERSEDE__UPDATE_SERVICE_URL`: update service base URL, when it is
//!   not `https://{index_node}/esg-search/ws`
//! - `ESGF_SUPERSEDE_LOG`: tracing filter (default: info)

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, error};

use esgf_publish_client::PublisherClient;
use esgf_supersede::config::Config;
use esgf_supersede::utils::bootstrap::init_tracing;
use esgf_supersede::{HttpSearchClient, NoticeConfig, Outcome, PublicationRecord, Supersession};

#[derive(Parser, Debug)]
#[command(author, version, about = "Mark the previous version of a published dataset as no longer latest")]
struct Args {
    /// Publication record (JSON array) of the new dataset version
    input: PathBuf,
    /// Configuration file (YAML)
    #[arg(long)]
    config: Option<String>,
    /// Index node to search and update
    #[arg(long)]
    index_node: Option<String>,
    /// PEM file with the publisher certificate and private key
    #[arg(long)]
    cert: Option<PathBuf>,
    /// Suppress informational messages
    #[arg(long)]
    silent: bool,
    /// Extended output, useful for debugging
    #[arg(long)]
    verbose: bool,
    /// Timeout for each request in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Accept self-signed index node certificates
    #[arg(long)]
    accept_invalid_certs: bool,
}

impl Args {
    /// Command-line flags override every other configuration source.
    fn apply_to(&self, config: &mut Config) {
        if let Some(index_node) = &self.index_node {
            config.index_node = index_node.clone();
        }
        if let Some(cert) = &self.cert {
            config.cert = Some(cert.clone());
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        config.silent |= self.silent;
        config.verbose |= self.verbose;
        config.accept_invalid_certs |= self.accept_invalid_certs;
    }
}

fn load_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::load(args.config.as_deref())?;
    args.apply_to(&mut config);
    config.validate()?;
    Ok(config)
}

async fn run(config: &Config, input: &Path) -> Result<Outcome, Box<dyn std::error::Error>> {
    let record = PublicationRecord::from_path(input)?;
    debug!(input = %input.display(), entries = record.entries.len(), "Loaded publication record");

    let search = HttpSearchClient::new(config.search_config())?;
    let publisher = PublisherClient::new(config.publisher_config())?;

    let supersession = Supersession::new(Arc::new(search), Arc::new(publisher))
        .with_notices(config.notices());

    Ok(supersession.process(&record).await?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = load_config(&args);
    let notices = match &config {
        Ok(config) => config.notices(),
        Err(_) => NoticeConfig {
            silent: args.silent,
            verbose: args.verbose,
        },
    };
    init_tracing(notices);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&config, &args.input).await {
        Ok(outcome) => {
            debug!(?outcome, "Supersession complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}, exiting!", e);
            ExitCode::FAILURE
        }
    }
}
