//! Operator surface for listing, adding and editing features.

use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::{SearchBackend, UpsertMode};
use crate::error::Result;
use crate::features::FeatureRegistry;
use crate::models::FeatureForm;

/// Keeps a local registry in step with the backend's feature list
pub struct FeatureAdmin {
    backend: Arc<dyn SearchBackend>,
    registry: FeatureRegistry,
}

impl FeatureAdmin {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            registry: FeatureRegistry::new(),
        }
    }

    /// Replace the local registry with the backend's list
    pub async fn load(&mut self) -> Result<usize> {
        let features = self.backend.list_features().await.inspect_err(|e| {
            warn!(error_code = e.error_code(), error = %e, "Failed to list features");
        })?;
        self.registry = FeatureRegistry::from_features(features);
        info!(count = self.registry.len(), "Feature registry loaded");
        Ok(self.registry.len())
    }

    /// Validate the form, create or update on the backend, then upsert locally.
    ///
    /// Create vs update is decided by a local name lookup. The local
    /// registry is left untouched when validation or the backend call fails.
    pub async fn submit(&mut self, form: FeatureForm) -> Result<UpsertMode> {
        let feature = form.into_feature()?;
        let mode = if self.registry.contains(&feature.name) {
            UpsertMode::Update
        } else {
            UpsertMode::Create
        };

        self.backend.upsert_feature(&feature, mode).await?;
        info!(name = %feature.name, ?mode, "Feature saved");
        self.registry.upsert(feature);
        Ok(mode)
    }

    pub fn registry(&self) -> &FeatureRegistry {
        &self.registry
    }

    /// Snapshot for the debug explainer
    pub fn snapshot(&self) -> FeatureRegistry {
        self.registry.clone()
    }
}
