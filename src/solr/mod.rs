//! Solr search client
//!
//! This module contains everything needed to read documents out of the
//! crawl index:
//! - Building an HTTP client and resolving the `/select` endpoint
//! - Bounded queries returning a single page of documents
//! - Lazy pagination over every document matching a query

mod client;
mod response;
mod stream;

pub use client::{build_http_client, SolrClient};
pub use response::SourceDocument;
pub use stream::DocumentStream;

use thiserror::Error;

/// Errors raised while talking to the search service
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Search service returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed search response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Result type alias for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Escapes a value for use inside a quoted Solr phrase
///
/// # Examples
///
/// ```
/// use solr2cdr::solr::escape_phrase;
///
/// assert_eq!(escape_phrase(r#"file:/a "b"/c"#), r#"file:/a \"b\"/c"#);
/// ```
pub fn escape_phrase(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
