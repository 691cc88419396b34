//! Common test utilities: an in-memory backend with scripted answers
//! and a call log.

#![allow(dead_code)]

use async_trait::async_trait;
use search_console::backend::{SearchBackend, UpsertMode};
use search_console::error::{AppError, Result};
use search_console::models::{Feature, KeywordCount, ResultType, SearchResult};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct ScriptedBackend {
    results: HashMap<String, Vec<SearchResult>>,
    suggestions: HashMap<String, String>,
    features: Mutex<Vec<Feature>>,
    config: Mutex<BTreeMap<String, f64>>,
    trending: Vec<KeywordCount>,
    fail_search: bool,
    fail_spellcheck: bool,
    fail_writes: bool,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, term: &str, results: Vec<SearchResult>) -> Self {
        self.results.insert(term.to_string(), results);
        self
    }

    pub fn with_suggestion(mut self, term: &str, suggested: &str) -> Self {
        self.suggestions.insert(term.to_string(), suggested.to_string());
        self
    }

    pub fn with_features(self, features: Vec<Feature>) -> Self {
        Self {
            features: Mutex::new(features),
            ..self
        }
    }

    pub fn with_config(self, config: &[(&str, f64)]) -> Self {
        Self {
            config: Mutex::new(config.iter().map(|(k, v)| (k.to_string(), *v)).collect()),
            ..self
        }
    }

    pub fn with_trending(mut self, trending: &[(&str, u64)]) -> Self {
        self.trending = trending
            .iter()
            .map(|(keyword, count)| KeywordCount {
                keyword: keyword.to_string(),
                count: *count,
            })
            .collect();
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.fail_search = true;
        self
    }

    pub fn failing_spellcheck(mut self) -> Self {
        self.fail_spellcheck = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }

    pub async fn features(&self) -> Vec<Feature> {
        self.features.lock().await.clone()
    }

    async fn record(&self, call: String) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl SearchBackend for ScriptedBackend {
    async fn search(&self, term: &str, result_type: ResultType) -> Result<Vec<SearchResult>> {
        self.record(format!("search:{}:{}", result_type, term)).await;
        if self.fail_search {
            return Err(AppError::fetch("search", "backend returned 500 Internal Server Error"));
        }
        Ok(self.results.get(term).cloned().unwrap_or_default())
    }

    async fn spell_check(&self, term: &str) -> Result<String> {
        self.record(format!("spellcheck:{}", term)).await;
        if self.fail_spellcheck {
            return Err(AppError::fetch("spellcheck", "connection reset"));
        }
        Ok(self.suggestions.get(term).cloned().unwrap_or_else(|| term.to_string()))
    }

    async fn list_features(&self) -> Result<Vec<Feature>> {
        self.record("list_features".to_string()).await;
        Ok(self.features.lock().await.clone())
    }

    async fn upsert_feature(&self, feature: &Feature, mode: UpsertMode) -> Result<()> {
        self.record(format!("{:?}:{}", mode, feature.name)).await;
        if self.fail_writes {
            return Err(AppError::fetch("upsert_feature", "backend returned 403 Forbidden"));
        }

        let mut features = self.features.lock().await;
        match features.iter_mut().find(|f| f.name == feature.name) {
            Some(existing) => *existing = feature.clone(),
            None => features.push(feature.clone()),
        }
        Ok(())
    }

    async fn get_config(&self) -> Result<BTreeMap<String, f64>> {
        self.record("get_config".to_string()).await;
        Ok(self.config.lock().await.clone())
    }

    async fn set_config(&self, name: &str, value: f64) -> Result<()> {
        self.record(format!("set_config:{}", name)).await;
        if self.fail_writes {
            return Err(AppError::fetch("set_config", "backend returned 403 Forbidden"));
        }
        self.config.lock().await.insert(name.to_string(), value);
        Ok(())
    }

    async fn trending(&self) -> Result<Vec<KeywordCount>> {
        self.record("trending".to_string()).await;
        Ok(self.trending.clone())
    }
}

/// Build a scored result with the given raw features
pub fn scored(url: &str, total_score: f64, features: &[(&str, f64)]) -> SearchResult {
    SearchResult {
        url: url.to_string(),
        title: format!("Title of {}", url),
        result_type: "doc".to_string(),
        display_text: format!("Snippet of {}", url),
        total_score,
        features: features.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
    }
}

/// `count` results with urls `r0..r{count-1}`
pub fn numbered(count: usize) -> Vec<SearchResult> {
    (0..count).map(|i| scored(&format!("r{}", i), count as f64 - i as f64, &[])).collect()
}
