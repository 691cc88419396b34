//! Ordered registry of named scoring features.

use crate::models::Feature;

/// Formula shown when no feature is registered
pub const EMPTY_FORMULA: &str = "Final Score = (no features configured)";

/// Outcome of an upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    /// The name was new and the feature was appended
    Appended,
    /// An existing feature with the same name was replaced at its position
    Replaced { position: usize },
}

/// Ordered collection of features keyed by name.
///
/// Insertion order is preserved; replacing a feature keeps its original
/// position. At most one feature per name is held.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRegistry {
    features: Vec<Feature>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a backend listing, later duplicates replacing earlier ones
    pub fn from_features(features: impl IntoIterator<Item = Feature>) -> Self {
        let mut registry = Self::new();
        for feature in features {
            registry.upsert(feature);
        }
        registry
    }

    /// Replace the feature with the same name in place, or append it.
    ///
    /// Never fails. Name validation belongs to the caller
    /// (see [`crate::models::FeatureForm`]).
    pub fn upsert(&mut self, feature: Feature) -> Upserted {
        match self.position(&feature.name) {
            Some(position) => {
                self.features[position] = feature;
                Upserted::Replaced { position }
            }
            None => {
                self.features.push(feature);
                Upserted::Appended
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|feature| feature.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|feature| feature.name == name)
    }

    /// Features in registry order
    pub fn list(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Human-readable scoring formula, e.g. `Final Score = a * 2 + log(b) * 3`
    pub fn render_formula(&self) -> String {
        if self.features.is_empty() {
            return EMPTY_FORMULA.to_string();
        }

        let terms: Vec<String> = self.features.iter().map(Feature::term).collect();
        format!("Final Score = {}", terms.join(" + "))
    }
}
