//! EDR → CDR identifier normalization
//!
//! EDR ids carry the full path of the crawled file (`file:/dump/ab/cd/HASH`);
//! CDR ids are only the final path segment, which is the file's hash name.

use serde_json::Value;

/// Returns the last `/`-delimited segment of an id
///
/// # Examples
///
/// ```
/// use solr2cdr::transform::normalize_id_str;
///
/// assert_eq!(normalize_id_str("file:/a/b/c"), "c");
/// assert_eq!(normalize_id_str("plain"), "plain");
/// ```
pub fn normalize_id_str(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

/// Normalizes an id value
///
/// | Input | Output |
/// |-------|--------|
/// | `null`, `""`, `[]` | `null` |
/// | string | last path segment |
/// | array | element-wise, order preserved |
/// | other scalars | unchanged |
pub fn normalize_id(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::String(id) if id.is_empty() => Value::Null,
        Value::String(id) => Value::String(normalize_id_str(id).to_string()),
        Value::Array(ids) if ids.is_empty() => Value::Null,
        Value::Array(ids) => Value::Array(ids.iter().map(normalize_id).collect()),
        other => other.clone(),
    }
}
