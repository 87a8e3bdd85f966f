//! Output module for writing transformed documents
//!
//! This module handles:
//! - The sink interface transformed documents are written through
//! - Newline-delimited JSON output files
//! - Run statistics

mod jsonl;
pub mod stats;
mod traits;

pub use jsonl::JsonLinesWriter;
pub use stats::{print_statistics, DumpStatistics};
pub use traits::{DocumentSink, OutputError, OutputResult};
