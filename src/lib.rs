//! solr2cdr: dumps a Solr crawl index as CDR documents
//!
//! This crate pages through a Solr query, reparents documents that lack a
//! parent id, remaps their fields into the CDR layout and writes the result
//! as newline-delimited JSON, ready for bulk loading into a document store.

pub mod config;
pub mod dump;
pub mod output;
pub mod solr;
pub mod transform;

use thiserror::Error;

/// Main error type for dump operations
#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Search error: {0}")]
    Search(#[from] solr::SearchError),

    #[error("Transform error: {0}")]
    Transform(#[from] transform::TransformError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid metadata pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for dump operations
pub type Result<T> = std::result::Result<T, DumpError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use dump::Dumper;
pub use solr::{SolrClient, SourceDocument};
pub use transform::{DestinationDocument, TransformConfig, Transformer};
