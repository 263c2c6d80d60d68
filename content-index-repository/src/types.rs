//! Response types for search index operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a delete that did not fail.
///
/// Deleting something that is already absent is a success, so a missing
/// index or document is reported here rather than as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The index or document existed and was removed.
    Deleted,
    /// The index or document did not exist.
    Missing,
}

impl DeleteOutcome {
    pub fn is_missing(self) -> bool {
        self == DeleteOutcome::Missing
    }
}

/// Metadata returned by the backend after creating an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexMetadata {
    /// The created index name.
    pub index: String,
    /// Whether the cluster acknowledged the creation.
    #[serde(default)]
    pub acknowledged: bool,
    /// Whether the required shard copies started before the timeout.
    #[serde(default)]
    pub shards_acknowledged: bool,
}

impl IndexMetadata {
    /// Read the metadata from a create-index response body, falling back to
    /// `name` when the body does not echo the index.
    pub fn from_response(name: &str, body: &Value) -> Self {
        Self {
            index: body
                .get("index")
                .and_then(Value::as_str)
                .unwrap_or(name)
                .to_string(),
            acknowledged: body
                .get("acknowledged")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            shards_acknowledged: body
                .get("shards_acknowledged")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}
