//! Statistics collected during a dump run

use crate::transform::DestinationDocument;
use serde_json::Value;
use std::time::Duration;

/// Counters for one dump run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DumpStatistics {
    /// Documents written to the output
    pub documents: u64,

    /// Result pages fetched by the main query
    pub pages: u64,

    /// Total matches reported by the index
    pub total_matches: Option<u64>,

    /// Documents whose parent was found by lookup
    pub parents_resolved: u64,

    /// Documents left without a parent after lookup
    pub orphans: u64,

    /// Parent lookups that failed and were treated as "no parent"
    pub parent_lookup_failures: u64,

    /// Textual documents whose raw content was inlined
    pub content_inlined: u64,

    /// Textual documents whose content file could not be read
    pub content_missing: u64,

    /// Documents written without a `timestamp` (malformed `lastModified`)
    pub timestamps_skipped: u64,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl DumpStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the per-document counters from a transformed document
    pub fn record_document(&mut self, document: &DestinationDocument) {
        self.documents += 1;

        match document.get("raw_content") {
            Some(Value::Null) => self.content_missing += 1,
            Some(_) => self.content_inlined += 1,
            None => {}
        }

        if !document.contains("timestamp") {
            self.timestamps_skipped += 1;
        }
    }

    /// Documents written per second
    pub fn rate(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.documents as f64 / secs
    }
}

/// Prints statistics to stdout in a human-readable format
pub fn print_statistics(stats: &DumpStatistics) {
    println!("=== Dump Statistics ===\n");

    println!("Documents written: {}", stats.documents);
    match stats.total_matches {
        Some(total) => println!("Matches in index: {}", total),
        None => println!("Matches in index: unknown"),
    }
    println!("Pages fetched: {}", stats.pages);

    println!("\nParents:");
    println!("  Resolved by lookup: {}", stats.parents_resolved);
    println!("  Orphans: {}", stats.orphans);
    println!("  Lookup failures: {}", stats.parent_lookup_failures);

    println!("\nContent:");
    println!("  Inlined: {}", stats.content_inlined);
    println!("  Missing: {}", stats.content_missing);
    println!("  Timestamps skipped: {}", stats.timestamps_skipped);

    println!(
        "\nElapsed: {:.1}s ({:.2} docs/sec)",
        stats.elapsed.as_secs_f64(),
        stats.rate()
    );
}
