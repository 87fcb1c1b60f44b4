//! esgf-supersede - version currency for the ESGF search index
//!
//! When a new version of a dataset is published, the previously indexed
//! version and its files must stop being reported as latest. This crate
//! finds that prior version and submits the `latest=false` updates for
//! both the datasets and the files cores.

pub mod config;
pub mod payload;
pub mod record;
pub mod search;
pub mod supersede;
pub mod utils;

pub use payload::{Collection, UpdatePayload};
pub use record::{DatasetEntry, DatasetIdentity, PublicationRecord, Version};
pub use search::{HttpSearchClient, PriorRecord, SearchClient, SearchConfig};
pub use supersede::{NoticeConfig, Outcome, SupersedeError, Supersession};
