//! Engine tuning knobs outside the feature registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::backend::SearchBackend;
use crate::error::Result;

/// Local copy of the backend's engine configuration, ordered by name
pub struct EngineConfig {
    backend: Arc<dyn SearchBackend>,
    values: BTreeMap<String, f64>,
}

impl EngineConfig {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            values: BTreeMap::new(),
        }
    }

    /// Fetch all knobs from the backend
    pub async fn load(&mut self) -> Result<&BTreeMap<String, f64>> {
        self.values = self.backend.get_config().await?;
        info!(count = self.values.len(), "Engine config loaded");
        Ok(&self.values)
    }

    /// Push one value; the local copy changes only when the backend accepts it
    pub async fn set(&mut self, name: &str, value: f64) -> Result<()> {
        self.backend.set_config(name, value).await?;
        info!(name, value, "Engine config updated");
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn values(&self) -> &BTreeMap<String, f64> {
        &self.values
    }
}
