use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Main configuration structure for a dump run
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub solr: SolrConfig,
    #[serde(default)]
    pub import: ImportConfig,
    pub dump: DumpConfig,
    #[serde(default)]
    pub transform: TransformOverrides,
}

/// Source index and query configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SolrConfig {
    /// Base URL of the Solr core, optionally carrying `user:pass@` credentials
    pub url: String,

    /// Solr query string
    #[serde(default = "default_query")]
    pub query: String,

    /// Field list passed through as `fl`
    #[serde(default)]
    pub fl: Option<String>,

    /// Offset of the first document to fetch
    #[serde(default)]
    pub start: u64,

    /// Page size; the client paginates internally over all matches
    #[serde(default = "default_rows")]
    pub rows: u64,

    /// Stop after this many documents
    #[serde(default)]
    pub limit: Option<u64>,
}

/// Import progress configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    /// Minimum time between progress reports (milliseconds)
    #[serde(rename = "log-delay", alias = "log_delay", default = "default_log_delay")]
    pub log_delay: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            log_delay: default_log_delay(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DumpConfig {
    /// Path of the newline-delimited JSON file to (re)create
    pub filename: String,
}

/// Optional overrides for the built-in field transformation table
///
/// Every field left out keeps the default from
/// [`TransformConfig`](crate::transform::TransformConfig).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransformOverrides {
    #[serde(default)]
    pub mapping: Option<BTreeMap<String, String>>,

    #[serde(default)]
    pub removals: Option<BTreeSet<String>>,

    #[serde(rename = "metadata-pattern", alias = "md_pattern", default)]
    pub metadata_pattern: Option<String>,

    #[serde(default)]
    pub additions: Option<Map<String, Value>>,

    #[serde(rename = "dump-path-prefix", alias = "dump_path", default)]
    pub dump_path_prefix: Option<String>,

    #[serde(rename = "mount-point-prefix", alias = "mount_point", default)]
    pub mount_point_prefix: Option<String>,
}

fn default_query() -> String {
    "*:*".to_string()
}

fn default_rows() -> u64 {
    100
}

fn default_log_delay() -> u64 {
    2000
}
