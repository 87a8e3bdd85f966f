//! Dump coordinator - main dump loop
//!
//! This module drives a dump run:
//! - Paging through the configured query
//! - Looking up missing parent ids
//! - Transforming each document and appending it to the output
//! - Reporting progress

use crate::config::{validate_dump_config, Config};
use crate::dump::parents::find_parent_id;
use crate::output::{DocumentSink, DumpStatistics, JsonLinesWriter};
use crate::solr::{SolrClient, SourceDocument};
use crate::transform::{DestinationDocument, TransformResult};
use crate::DumpError;
use chrono::Utc;
use serde_json::Value;
use std::path::Path;
use std::time::{Duration, Instant};

/// Main dump coordinator
pub struct Dumper {
    config: Config,
    solr: SolrClient,
    stats: DumpStatistics,
}

impl Dumper {
    /// Creates a dumper reading from the configured Solr core
    pub fn new(config: Config) -> Result<Self, DumpError> {
        let solr = SolrClient::new(&config.solr.url)?;
        Ok(Self::with_client(config, solr))
    }

    /// Creates a dumper using an existing client
    pub fn with_client(config: Config, solr: SolrClient) -> Self {
        Self {
            config,
            solr,
            stats: DumpStatistics::new(),
        }
    }

    /// Statistics of the last completed run
    pub fn statistics(&self) -> &DumpStatistics {
        &self.stats
    }

    /// Dumps every matching document into the configured output file
    ///
    /// The output file is recreated. It is closed on every exit path; on
    /// failure it holds the documents written before the error.
    ///
    /// # Arguments
    ///
    /// * `transform` - Maps a source document to its id and CDR document
    ///
    /// # Returns
    ///
    /// * `Ok(count)` - Number of documents written
    /// * `Err(DumpError)` - Empty output path, search failure, transform
    ///   failure, or write failure
    pub async fn dump<F>(&mut self, transform: F) -> Result<u64, DumpError>
    where
        F: FnMut(SourceDocument) -> TransformResult<(String, DestinationDocument)>,
    {
        validate_dump_config(&self.config.dump)?;

        let path = Path::new(&self.config.dump.filename).to_path_buf();
        let mut writer = JsonLinesWriter::create(&path)?;
        tracing::info!("Writing documents to {}", path.display());

        self.dump_into(&mut writer, transform).await
    }

    /// Dumps every matching document into `sink`
    pub async fn dump_into<S, F>(&mut self, sink: &mut S, mut transform: F) -> Result<u64, DumpError>
    where
        S: DocumentSink,
        F: FnMut(SourceDocument) -> TransformResult<(String, DestinationDocument)>,
    {
        let solr_config = &self.config.solr;
        let params: Vec<(String, String)> = solr_config
            .fl
            .iter()
            .map(|fl| ("fl".to_string(), fl.clone()))
            .collect();

        tracing::info!(
            "Dumping query '{}' from {} (start={}, rows={}, limit={:?})",
            solr_config.query,
            self.solr.select_url(),
            solr_config.start,
            solr_config.rows,
            solr_config.limit
        );

        let started = Instant::now();
        let log_delay = Duration::from_millis(self.config.import.log_delay);
        let mut stats = DumpStatistics::new();
        let mut last_report = Instant::now();
        let mut batch_index: u64 = 0;
        let mut batch_docs: u64 = 0;

        let mut docs = self.solr.query_paginated(
            &solr_config.query,
            solr_config.start,
            solr_config.rows,
            solr_config.limit,
            &params,
        );

        while let Some(mut doc) = docs.next_document().await? {
            if !doc.contains("parent_id") {
                let parent = match doc.id() {
                    Some(id) => self.lookup_parent(id, &mut stats).await,
                    None => Value::Null,
                };
                doc.insert("parent_id", parent);
            }

            let (id, mut document) = transform(doc)?;
            document.insert("imported_at", Value::from(Utc::now().timestamp_millis()));
            document.insert("_id", Value::String(id.clone()));

            sink.write_document(&document)?;
            stats.record_document(&document);
            batch_docs += 1;

            if last_report.elapsed() > log_delay {
                tracing::info!(
                    "Progress: {} docs, batch {} ({} since last report), last doc {}",
                    stats.documents,
                    batch_index,
                    batch_docs,
                    id
                );
                batch_index += 1;
                batch_docs = 0;
                last_report = Instant::now();
            }
        }

        sink.flush()?;

        stats.pages = docs.pages_fetched();
        stats.total_matches = docs.total();
        stats.elapsed = started.elapsed();
        tracing::info!(
            "Done: {} documents in {:?}",
            stats.documents,
            stats.elapsed
        );

        let count = stats.documents;
        self.stats = stats;
        Ok(count)
    }

    /// Looks up the parent of `id`, absorbing lookup failures
    async fn lookup_parent(&self, id: &str, stats: &mut DumpStatistics) -> Value {
        match find_parent_id(&self.solr, id).await {
            Ok(Some(parent)) => {
                tracing::debug!("Resolved parent of {}: {}", id, parent);
                stats.parents_resolved += 1;
                Value::String(parent)
            }
            Ok(None) => {
                tracing::debug!("No parent found for {}", id);
                stats.orphans += 1;
                Value::Null
            }
            Err(e) => {
                tracing::warn!("Parent lookup for {} failed, treating as orphan: {}", id, e);
                stats.parent_lookup_failures += 1;
                stats.orphans += 1;
                Value::Null
            }
        }
    }
}
