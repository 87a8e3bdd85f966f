//! Parent document lookup
//!
//! Documents extracted from containers (archives, pages embedding images)
//! do not always carry a `parent_id`. The container lists its children in
//! its `outpaths` field, so the parent can be found by searching for it.

use crate::solr::{escape_phrase, SearchResult, SolrClient};

/// Number of candidate parents requested per lookup
pub const PARENT_CANDIDATES: u64 = 3;

/// Finds the id of the document whose `outpaths` contains `id`
///
/// A document may list itself among its own outpaths, so candidates with the
/// same id are skipped.
///
/// # Returns
///
/// * `Ok(Some(parent_id))` - The first candidate distinct from `id`
/// * `Ok(None)` - No distinct candidate exists
/// * `Err(SearchError)` - The lookup query failed
pub async fn find_parent_id(solr: &SolrClient, id: &str) -> SearchResult<Option<String>> {
    let query = format!("outpaths:\"{}\"", escape_phrase(id));
    let params = [("fl".to_string(), "id".to_string())];

    let candidates = solr.query(&query, 0, PARENT_CANDIDATES, &params).await?;

    Ok(candidates
        .iter()
        .filter_map(|candidate| candidate.id())
        .find(|candidate_id| *candidate_id != id)
        .map(str::to_string))
}
