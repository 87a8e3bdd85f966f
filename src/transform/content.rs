//! Raw file content inlining

use serde_json::Value;
use std::path::Path;

/// Returns true if a `contentType` value names a textual document
///
/// Matches any type containing `text` or `ml` (`text/plain`,
/// `application/xhtml+xml`, `application/xml`, ...). Multi-valued fields
/// match if any value does.
pub fn is_textual(content_type: &Value) -> bool {
    match content_type {
        Value::String(ct) => ct.contains("text") || ct.contains("ml"),
        Value::Array(values) => values.iter().any(is_textual),
        _ => false,
    }
}

/// Reads a file as UTF-8, dropping any invalid byte sequences
///
/// Returns `None` if the file does not exist or cannot be read.
pub fn read_raw_content(path: &Path) -> Option<String> {
    if !path.is_file() {
        tracing::debug!("No content file at {}", path.display());
        return None;
    }

    match std::fs::read(path) {
        Ok(bytes) => Some(decode_utf8_dropping_invalid(&bytes)),
        Err(e) => {
            tracing::warn!("Error reading {}: {}", path.display(), e);
            None
        }
    }
}

fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
