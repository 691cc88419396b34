//! Backend collaborators consumed by the search session and admin surfaces

mod http;

pub use http::HttpBackend;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Feature, KeywordCount, ResultType, SearchResult};

/// Whether a feature write creates a new entry or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertMode {
    Create,
    Update,
}

/// Search backend API
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Ranked results for a term; scores are computed by the backend
    async fn search(&self, term: &str, result_type: ResultType) -> Result<Vec<SearchResult>>;

    /// Suggested spelling for a term (may equal the input)
    async fn spell_check(&self, term: &str) -> Result<String>;

    /// Registered scoring features in backend order
    async fn list_features(&self) -> Result<Vec<Feature>>;

    /// Create or update a feature
    async fn upsert_feature(&self, feature: &Feature, mode: UpsertMode) -> Result<()>;

    /// Engine tuning knobs
    async fn get_config(&self) -> Result<BTreeMap<String, f64>>;

    /// Set one engine tuning knob
    async fn set_config(&self, name: &str, value: f64) -> Result<()>;

    /// Most searched keywords
    async fn trending(&self) -> Result<Vec<KeywordCount>>;
}
