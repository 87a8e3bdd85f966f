//! EDR → CDR document transformation
//!
//! This module maps a raw index document onto the CDR layout:
//! - Renaming the well-known fields (`id`, `parent_id`, `contentType`, ...)
//! - Moving every other field into `extracted_metadata`, stripping Solr
//!   dynamic-field suffixes such as `_s_md` or `_ts_md`
//! - Adding provenance fields and the stored-object URL
//! - Inlining the raw text of textual documents
//! - Reducing ids to their CDR form

mod content;
mod date;
mod ids;

pub use content::{is_textual, read_raw_content};
pub use date::{parse_date, try_parse_date, SOLR_DATE_FORMAT};
pub use ids::{normalize_id, normalize_id_str};

use crate::config::{validate_metadata_pattern, TransformOverrides};
use crate::solr::SourceDocument;
use crate::ConfigError;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

/// Nested object holding every field not renamed by the mapping table
pub const METADATA_FIELD: &str = "extracted_metadata";

/// Errors that can occur while transforming a document
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Source document has no string id")]
    MissingId,

    #[error("Invalid date '{value}': {source}")]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;

/// A document in the CDR layout, ready to be serialized as one output line
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DestinationDocument(Map<String, Value>);

impl DestinationDocument {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// The nested `extracted_metadata` object, if present
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.0.get(METADATA_FIELD).and_then(Value::as_object)
    }

}

impl From<Map<String, Value>> for DestinationDocument {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Static field transformation table, fixed for a run
#[derive(Debug, Clone, PartialEq)]
pub struct TransformConfig {
    /// Source field → destination field renames
    pub mapping: BTreeMap<String, String>,

    /// Source fields dropped entirely
    pub removals: BTreeSet<String>,

    /// Pattern recognizing suffixed metadata fields; group 1 is the base name
    pub metadata_pattern: String,

    /// Provenance fields merged into every document, overwriting prior values
    pub additions: Map<String, Value>,

    /// Id prefix replaced by `mount_point_prefix` to build `obj_stored_url`
    pub dump_path_prefix: String,

    pub mount_point_prefix: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        let mapping = [
            ("id", "obj_id"),
            ("parent_id", "obj_parent"),
            ("contentType", "content_type"),
            ("content", "extracted_text"),
            ("url", "obj_original_url"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

        let mut additions = Map::new();
        additions.insert("crawler".into(), Value::from("Nutch-1.12-SNAPSHOT"));
        additions.insert("team".into(), Value::from("NASA_JPL"));
        additions.insert("version".into(), Value::from(2.0));

        Self {
            mapping,
            removals: BTreeSet::new(),
            // Anchored at both ends: `x_s_md_y` is copied verbatim, not renamed to `x`
            metadata_pattern: r"^(.*)_(ts?|ss?|ds?|bs?|fs?|is?|ls?)_md$".to_string(),
            additions,
            dump_path_prefix: "file:/data2/USCWeaponsStatsGathering/nutch/full_dump/".to_string(),
            mount_point_prefix: "http://imagecat.dyndns.org/weapons/alldata/".to_string(),
        }
    }
}

impl TransformConfig {
    /// Builds a table from the defaults, replacing every overridden field
    pub fn from_overrides(overrides: &TransformOverrides) -> Self {
        let defaults = Self::default();
        Self {
            mapping: overrides.mapping.clone().unwrap_or(defaults.mapping),
            removals: overrides.removals.clone().unwrap_or(defaults.removals),
            metadata_pattern: overrides
                .metadata_pattern
                .clone()
                .unwrap_or(defaults.metadata_pattern),
            additions: overrides.additions.clone().unwrap_or(defaults.additions),
            dump_path_prefix: overrides
                .dump_path_prefix
                .clone()
                .unwrap_or(defaults.dump_path_prefix),
            mount_point_prefix: overrides
                .mount_point_prefix
                .clone()
                .unwrap_or(defaults.mount_point_prefix),
        }
    }
}

/// Transforms EDR documents into CDR documents
#[derive(Debug, Clone)]
pub struct Transformer {
    config: TransformConfig,
    metadata_pattern: Regex,
}

impl Transformer {
    /// Compiles the metadata pattern of `config`
    pub fn new(config: TransformConfig) -> Result<Self, ConfigError> {
        let metadata_pattern = validate_metadata_pattern(&config.metadata_pattern)?;
        Ok(Self {
            config,
            metadata_pattern,
        })
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Transforms one document
    ///
    /// # Rules (in order)
    ///
    /// 1. `extracted_metadata.edr_id` is the source id
    /// 2. Mapped fields are renamed at the top level; fields matching the
    ///    metadata pattern go to metadata under their base name; all other
    ///    fields not listed in `removals` go to metadata verbatim
    /// 3. `obj_stored_url` is the id with the dump path prefix swapped for
    ///    the mount point prefix
    /// 4. `timestamp` is `lastModified` in epoch milliseconds; the current
    ///    time if absent or empty, skipped if malformed
    /// 5. `additions` are merged, overwriting
    /// 6. Textual documents get `raw_content` from the file behind their
    ///    `file:` id (`null` if unreadable)
    /// 7. `outlinks` moves to `obj_outlinks`, `outpaths` to `obj_children`
    /// 8. `obj_id`, `obj_parent` and `obj_children` hold CDR ids
    ///
    /// # Returns
    ///
    /// * `Ok((id, document))` - The CDR id and the transformed document
    /// * `Err(TransformError::MissingId)` - The source has no string `id`
    pub fn transform(
        &self,
        doc: SourceDocument,
    ) -> TransformResult<(String, DestinationDocument)> {
        let id = doc.id().ok_or(TransformError::MissingId)?.to_string();
        let last_modified = doc.get("lastModified").and_then(first_str).map(str::to_string);
        let content_type = doc.get("contentType").cloned();

        let mut result = Map::new();
        let mut metadata = Map::new();
        metadata.insert("edr_id".into(), Value::String(id.clone()));

        for (field, value) in doc.into_fields() {
            if let Some(target) = self.config.mapping.get(&field) {
                result.insert(target.clone(), value);
                continue;
            }
            match self.metadata_base_name(&field) {
                Some(base) => {
                    metadata.insert(base, value);
                }
                None if !self.config.removals.contains(&field) => {
                    metadata.insert(field, value);
                }
                None => {}
            }
        }
        result.insert(METADATA_FIELD.into(), Value::Object(metadata));

        result.insert("obj_stored_url".into(), Value::String(self.stored_url(&id)));

        match last_modified.as_deref().filter(|raw| !raw.is_empty()) {
            Some(raw) => match try_parse_date(raw) {
                Ok(date) => {
                    result.insert("timestamp".into(), Value::from(date.timestamp_millis()));
                }
                Err(e) => tracing::warn!("Skipped timestamp for {}: {}", id, e),
            },
            None => {
                let now = parse_date(None);
                result.insert("timestamp".into(), Value::from(now.timestamp_millis()));
            }
        }

        for (field, value) in &self.config.additions {
            result.insert(field.clone(), value.clone());
        }

        if content_type.as_ref().is_some_and(is_textual) {
            let path = id.strip_prefix("file:").unwrap_or(&id);
            let raw = read_raw_content(Path::new(path));
            result.insert("raw_content".into(), raw.map_or(Value::Null, Value::String));
        }

        if let Some(outlinks) = take_metadata(&mut result, "outlinks") {
            result.insert("obj_outlinks".into(), outlinks);
        }
        if let Some(outpaths) = take_metadata(&mut result, "outpaths") {
            result.insert("obj_children".into(), normalize_id(&outpaths));
        }

        let obj_id = normalize_id(result.get("obj_id").unwrap_or(&Value::Null));
        let obj_parent = normalize_id(result.get("obj_parent").unwrap_or(&Value::Null));
        let destination_id = match &obj_id {
            Value::String(cdr_id) => cdr_id.clone(),
            _ => normalize_id_str(&id).to_string(),
        };
        result.insert("obj_id".into(), obj_id);
        result.insert("obj_parent".into(), obj_parent);

        Ok((destination_id, DestinationDocument(result)))
    }

    /// Base name of a suffixed metadata field, e.g. `title` for `title_s_md`
    fn metadata_base_name(&self, field: &str) -> Option<String> {
        self.metadata_pattern
            .captures(field)
            .and_then(|caps| caps.get(1))
            .map(|base| base.as_str().to_string())
    }

    fn stored_url(&self, id: &str) -> String {
        match id.strip_prefix(self.config.dump_path_prefix.as_str()) {
            Some(rest) => format!("{}{}", self.config.mount_point_prefix, rest),
            None => id.to_string(),
        }
    }
}

/// First string of a single- or multi-valued field
fn first_str(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        Value::Array(values) => values.first().and_then(Value::as_str),
        _ => None,
    }
}

fn take_metadata(result: &mut Map<String, Value>, field: &str) -> Option<Value> {
    result.get_mut(METADATA_FIELD)?.as_object_mut()?.remove(field)
}
