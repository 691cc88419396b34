//! Popular keywords, each linked to the location that searches it.

use crate::backend::SearchBackend;
use crate::error::Result;
use crate::models::{KeywordCount, ResultType};
use crate::query::Location;

#[derive(Debug, Clone, PartialEq)]
pub struct TrendingKeyword {
    pub keyword: String,
    pub count: u64,
    pub location: Location,
}

impl TrendingKeyword {
    pub fn new(entry: KeywordCount, result_type: ResultType) -> Self {
        let location = Location::with_term(result_type, entry.keyword.clone());
        Self {
            keyword: entry.keyword,
            count: entry.count,
            location,
        }
    }
}

/// Trending keywords in backend order
pub async fn fetch_trending(backend: &dyn SearchBackend, result_type: ResultType) -> Result<Vec<TrendingKeyword>> {
    let entries = backend.trending().await?;
    Ok(entries
        .into_iter()
        .map(|entry| TrendingKeyword::new(entry, result_type))
        .collect())
}
