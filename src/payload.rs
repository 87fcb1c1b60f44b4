//! Update payloads that retire a dataset version.
//!
//! Each supersession produces one `<updates>` document per index core,
//! setting `latest=false` on every record selected by the prior version's
//! identifier.

use std::fmt;

use chrono::{DateTime, Utc};

/// Timestamp layout expected by the index (`YYYY-MM-DDTHH:MM:SSZ`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Index core an update is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Datasets,
    Files,
}

impl Collection {
    /// Submission order: dataset records before their files.
    pub const ALL: [Collection; 2] = [Collection::Datasets, Collection::Files];

    pub fn core_name(self) -> &'static str {
        match self {
            Collection::Datasets => "datasets",
            Collection::Files => "files",
        }
    }

    /// Field that links a record in this core to a dataset id.
    pub fn selector_field(self) -> &'static str {
        match self {
            Collection::Datasets => "id",
            Collection::Files => "dataset_id",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.core_name())
    }
}

/// A `latest=false` update addressed at one dataset id in one core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePayload {
    pub collection: Collection,
    pub target_id: String,
    pub timestamp: DateTime<Utc>,
}

impl UpdatePayload {
    /// Build a payload stamped with the current UTC time.
    pub fn hide_latest(collection: Collection, target_id: impl Into<String>) -> Self {
        Self::at(collection, target_id, Utc::now())
    }

    /// Build a payload with an explicit timestamp.
    pub fn at(collection: Collection, target_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            collection,
            target_id: target_id.into(),
            timestamp,
        }
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Render the `<updates>` document submitted to the index.
    pub fn to_xml(&self) -> String {
        format!(
            r#"<updates core="{core}" action="set">
  <update>
    <query>{field}={id}</query>
    <field name="latest">
      <value>false</value>
    </field>
    <field name="_timestamp">
      <value>{ts}</value>
    </field>
  </update>
</updates>
"#,
            core = self.collection.core_name(),
            field = self.collection.selector_field(),
            id = escape_xml(&self.target_id),
            ts = self.formatted_timestamp(),
        )
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
