//! Configuration module for solr2cdr
//!
//! This module handles loading, parsing, and validating TOML run configuration files.
//!
//! # Example
//!
//! ```no_run
//! use solr2cdr::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("dump.toml")).unwrap();
//! println!("Dumping {} to {}", config.solr.query, config.dump.filename);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, DumpConfig, ImportConfig, SolrConfig, TransformOverrides};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
pub(crate) use validation::{validate_dump_config, validate_metadata_pattern};
