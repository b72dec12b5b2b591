use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::utils::time;

/// A submitted answer record.
///
/// The answer fields depend on the quiz that produced the record, so they are
/// kept as an untyped map flattened next to the bookkeeping fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: i64,
    #[serde(default, deserialize_with = "time::deserialize_lenient")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<i64>,
    #[serde(flatten)]
    pub answers: Map<String, JsonValue>,
}

impl Response {
    /// String value of an answer field, if present and textual.
    pub fn answer(&self, key: &str) -> Option<&str> {
        self.answers.get(key).and_then(JsonValue::as_str)
    }
}
