//! Dump module: moves documents from the index into the output file
//!
//! This module contains the dump loop, including:
//! - Paging through the source query
//! - Resolving missing parent ids through a lookup query
//! - Transforming documents and writing them out
//! - Progress reporting

mod dumper;
mod parents;

pub use dumper::Dumper;
pub use parents::{find_parent_id, PARENT_CANDIDATES};

use crate::config::Config;
use crate::output::DumpStatistics;
use crate::transform::{TransformConfig, Transformer};
use crate::DumpError;

/// Runs a complete dump
///
/// This is the main entry point for a dump run. It will:
/// 1. Build the transformer from the configured overrides
/// 2. Connect to the Solr core
/// 3. Write every matching document to the dump file
///
/// # Arguments
///
/// * `config` - The run configuration
///
/// # Returns
///
/// * `Ok(DumpStatistics)` - Dump completed; `documents` is the count written
/// * `Err(DumpError)` - Dump failed
///
/// # Example
///
/// ```no_run
/// use solr2cdr::config::load_config;
/// use solr2cdr::dump::run_dump;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("dump.toml"))?;
/// let stats = run_dump(config).await?;
/// println!("Total docs imported={}", stats.documents);
/// # Ok(())
/// # }
/// ```
pub async fn run_dump(config: Config) -> Result<DumpStatistics, DumpError> {
    let transformer = Transformer::new(TransformConfig::from_overrides(&config.transform))?;
    let mut dumper = Dumper::new(config)?;
    dumper.dump(|doc| transformer.transform(doc)).await?;
    Ok(dumper.statistics().clone())
}
