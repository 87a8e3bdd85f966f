//! Solr response envelope and source documents
//!
//! Requests are always made with `wt=json`, so the body is a JSON object of
//! the shape `{"response": {"numFound": N, "start": S, "docs": [...]}}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A document as stored in the crawl index (an EDR record)
///
/// Field values are strings, lists of strings, or numbers. Every document
/// returned by the index carries an `id` of the form `scheme:/path/to/resource`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceDocument(Map<String, Value>);

impl SourceDocument {
    /// The document id, if present and a string
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Iterates over field names and values
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for SourceDocument {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Top-level body of a `/select` response
#[derive(Debug, Deserialize)]
pub(crate) struct SelectResponse {
    pub response: ResultPage,
}

/// One page of matches
#[derive(Debug, Deserialize)]
pub(crate) struct ResultPage {
    /// Total number of documents matching the query
    #[serde(rename = "numFound")]
    pub num_found: u64,

    #[serde(default)]
    pub docs: Vec<SourceDocument>,
}
