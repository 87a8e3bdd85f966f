//! Solr timestamp parsing

use crate::transform::{TransformError, TransformResult};
use chrono::{DateTime, NaiveDateTime, Utc};

/// The only timestamp layout the index uses, always in UTC
pub const SOLR_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Strictly parses a Solr timestamp such as `2016-03-04T10:15:30Z`
pub fn try_parse_date(value: &str) -> TransformResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, SOLR_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| TransformError::InvalidDate {
            value: value.to_string(),
            source,
        })
}

/// Parses a Solr timestamp, falling back to the current time
///
/// Empty, absent, or malformed input is logged and yields `Utc::now()`;
/// this function never fails.
pub fn parse_date(value: Option<&str>) -> DateTime<Utc> {
    match value.filter(|v| !v.is_empty()) {
        Some(raw) => try_parse_date(raw).unwrap_or_else(|e| {
            tracing::warn!("Error parsing date: {}", e);
            Utc::now()
        }),
        None => {
            tracing::debug!("No date given, using current time");
            Utc::now()
        }
    }
}
