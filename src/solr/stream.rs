//! Lazy pagination over a Solr query

use crate::solr::{SearchError, SearchResult, SolrClient, SourceDocument};
use std::collections::VecDeque;

/// A finite, non-restartable sequence of documents matching a query
///
/// Pages of `rows` documents are fetched on demand, advancing the offset by
/// the number of documents actually received. The stream ends when:
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | Offset reaches the reported `numFound` | End of stream |
/// | `limit` documents yielded | End of stream |
/// | Non-200 status on a page | Logged, end of stream |
/// | Page with zero documents | End of stream |
/// | Transport failure / malformed body | `Err` |
pub struct DocumentStream<'a> {
    client: &'a SolrClient,
    query: String,
    params: Vec<(String, String)>,
    rows: u64,
    offset: u64,
    total: Option<u64>,
    limit: Option<u64>,
    yielded: u64,
    pages: u64,
    buffer: VecDeque<SourceDocument>,
    exhausted: bool,
}

impl<'a> DocumentStream<'a> {
    pub(crate) fn new(
        client: &'a SolrClient,
        query: &str,
        start: u64,
        rows: u64,
        limit: Option<u64>,
        params: Vec<(String, String)>,
    ) -> Self {
        Self {
            client,
            query: query.to_string(),
            params,
            rows,
            offset: start,
            total: None,
            limit,
            yielded: 0,
            pages: 0,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Returns the next document, fetching a new page when needed
    ///
    /// # Returns
    ///
    /// * `Ok(Some(doc))` - The next matching document
    /// * `Ok(None)` - The stream has ended
    /// * `Err(SearchError)` - The service could not be reached or answered garbage
    pub async fn next_document(&mut self) -> SearchResult<Option<SourceDocument>> {
        loop {
            if self.limit.is_some_and(|limit| self.yielded >= limit) {
                return Ok(None);
            }

            if let Some(doc) = self.buffer.pop_front() {
                self.yielded += 1;
                return Ok(Some(doc));
            }

            if self.exhausted {
                return Ok(None);
            }

            if self.total.is_some_and(|total| self.offset >= total) {
                self.exhausted = true;
                return Ok(None);
            }

            self.fetch_next_page().await?;
        }
    }

    async fn fetch_next_page(&mut self) -> SearchResult<()> {
        match self.total {
            Some(total) => tracing::debug!("start = {}, total = {}", self.offset, total),
            None => tracing::debug!("start = {}, total = unknown", self.offset),
        }

        let page = match self
            .client
            .fetch_page(&self.query, self.offset, self.rows, &self.params)
            .await
        {
            Ok(page) => page,
            Err(SearchError::Status { status, url }) => {
                tracing::warn!(
                    "Search service returned HTTP {} for {} at start={}; stopping after {} documents (query params: q={}, {:?})",
                    status,
                    url,
                    self.offset,
                    self.yielded,
                    self.query,
                    self.params
                );
                self.exhausted = true;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        self.pages += 1;
        self.total = Some(page.num_found);

        if page.docs.is_empty() {
            if self.offset < page.num_found {
                tracing::warn!(
                    "Empty page at start={} although {} documents match; ending pagination",
                    self.offset,
                    page.num_found
                );
            }
            self.exhausted = true;
            return Ok(());
        }

        self.offset += page.docs.len() as u64;
        self.buffer.extend(page.docs);
        Ok(())
    }

    /// Number of pages fetched so far
    pub fn pages_fetched(&self) -> u64 {
        self.pages
    }

    /// Total matches reported by the last page, if any page was fetched
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Number of documents handed out so far
    pub fn yielded(&self) -> u64 {
        self.yielded
    }
}
