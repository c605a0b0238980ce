use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// A JSON object extracted from document text. Always an object, possibly
/// empty; malformed text can never be represented.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredRecord(Map<String, Value>);

impl StructuredRecord {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Storage form: pretty-printed with four-space indentation, keys in the
    /// order the model produced them. The empty record renders as `{}`.
    pub fn to_canonical_json(&self) -> String {
        if self.0.is_empty() {
            return "{}".to_string();
        }
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        // Serializing a Map<String, Value> into a Vec cannot fail.
        if self.0.serialize(&mut ser).is_err() {
            return "{}".to_string();
        }
        String::from_utf8(buf).unwrap_or_else(|_| "{}".to_string())
    }
}

impl From<Map<String, Value>> for StructuredRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One row of the append-only database channel.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExtractedRecordRow {
    pub id: Uuid,
    pub data: Value,
    pub source_path: String,
    pub created_at: DateTime<Utc>,
}
