//! Input publication records.
//!
//! A publication record is the JSON array produced by the publication
//! step: one `Dataset` entry plus any number of `File` entries. The
//! Dataset entry sits either at the end or at the start of the array.

use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

/// Value of the `type` field that marks the dataset entry.
pub const DATASET_TYPE: &str = "Dataset";

/// Errors raised while reading or interpreting a publication record.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Failed to read input record '{0}': {1}")]
    FileRead(String, String),

    #[error("Failed to parse input record: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not find the Dataset record (checked last and first entries)")]
    DatasetEntryNotFound,

    #[error("Dataset record has no usable '{0}' field")]
    MissingField(&'static str),
}

/// A dataset version as stored in the index.
///
/// The index carries both numeric versions (`2`) and date-like tokens
/// (`"20190612"`). Any other JSON shape is kept as its JSON text so an
/// odd version never makes a record unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub enum Version {
    Number(u64),
    Token(String),
}

impl From<Value> for Version {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(n) => Version::Number(n),
                None => Version::Token(n.to_string()),
            },
            Value::String(token) => Version::Token(token),
            other => Version::Token(other.to_string()),
        }
    }
}

impl Version {
    /// Comparable form of the version, if it has one.
    ///
    /// Digit strings (optionally prefixed with `v`) compare numerically.
    pub fn ordinal(&self) -> Option<u64> {
        match self {
            Version::Number(n) => Some(*n),
            Version::Token(token) => {
                let digits = token.strip_prefix('v').unwrap_or(token);
                digits.parse().ok()
            }
        }
    }

    /// Order two optional versions, treating `None` as lowest.
    pub fn rank(a: Option<&Version>, b: Option<&Version>) -> Ordering {
        let a = a.and_then(Version::ordinal);
        let b = b.and_then(Version::ordinal);
        a.cmp(&b)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Number(n) => write!(f, "{}", n),
            Version::Token(token) => f.write_str(token),
        }
    }
}

/// Identity of a dataset independent of its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetIdentity {
    pub master_id: String,
    pub data_node: String,
}

impl DatasetIdentity {
    pub fn new(master_id: impl Into<String>, data_node: impl Into<String>) -> Self {
        Self {
            master_id: master_id.into(),
            data_node: data_node.into(),
        }
    }
}

/// One entry of a publication record.
///
/// Entries are kept as raw JSON objects. Fields are only interpreted on
/// the located Dataset entry, so the shape of any other entry never
/// affects processing.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct PublicationEntry {
    pub fields: Map<String, Value>,
}

impl PublicationEntry {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// The `type` field, when it is a string.
    pub fn entry_type(&self) -> Option<&str> {
        self.str_field("type")
    }

    pub fn is_dataset(&self) -> bool {
        self.entry_type() == Some(DATASET_TYPE)
    }

    /// A string-valued field; any other shape reads as absent.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn version(&self) -> Option<Version> {
        self.fields
            .get("version")
            .filter(|v| !v.is_null())
            .cloned()
            .map(Version::from)
    }
}

/// The located Dataset entry, reduced to what supersession needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    pub identity: DatasetIdentity,
    pub version: Option<Version>,
}

/// Ordered sequence of publication entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct PublicationRecord {
    pub entries: Vec<PublicationEntry>,
}

impl PublicationRecord {
    pub fn new(entries: Vec<PublicationEntry>) -> Self {
        Self { entries }
    }

    /// Load a record from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RecordError::FileRead(path.display().to_string(), e.to_string()))?;
        Self::from_json(&content)
    }

    /// Parse a record from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Locate the Dataset entry: last position first, then first position.
    pub fn dataset_entry(&self) -> Result<DatasetEntry, RecordError> {
        let entry = [self.entries.last(), self.entries.first()]
            .into_iter()
            .flatten()
            .find(|e| e.is_dataset())
            .ok_or(RecordError::DatasetEntryNotFound)?;

        let master_id = required(entry.str_field("master_id"), "master_id")?;
        let data_node = required(entry.str_field("data_node"), "data_node")?;

        Ok(DatasetEntry {
            identity: DatasetIdentity::new(master_id, data_node),
            version: entry.version(),
        })
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, RecordError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(RecordError::MissingField(field))
}
