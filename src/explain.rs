//! Per-result breakdown of the inputs behind a backend score.

use std::fmt;

use serde::Serialize;

use crate::features::FeatureRegistry;
use crate::models::SearchResult;

/// One registered feature as seen on one result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub name: String,
    /// Raw value from the result; `0` when the result did not report it
    pub raw_value: f64,
    pub coefficient: f64,
    pub use_log: bool,
    /// Whether the result actually reported this feature
    pub reported: bool,
}

/// Explanation of a single result's score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Explanation {
    /// Backend-provided score, never recomputed here
    pub total_score: f64,
    /// Rows in registry order
    pub contributions: Vec<FeatureContribution>,
    /// Raw features the registry does not know about, sorted by name
    pub unregistered: Vec<(String, f64)>,
}

/// Explain `result` against a registry snapshot. Read-only.
pub fn explain(result: &SearchResult, registry: &FeatureRegistry) -> Explanation {
    let contributions = registry
        .list()
        .iter()
        .map(|feature| {
            let raw = result.features.get(&feature.name).copied();
            FeatureContribution {
                name: feature.name.clone(),
                raw_value: raw.unwrap_or(0.0),
                coefficient: feature.coefficient,
                use_log: feature.use_log,
                reported: raw.is_some(),
            }
        })
        .collect();

    let mut unregistered: Vec<(String, f64)> = result
        .features
        .iter()
        .filter(|(name, _)| !registry.contains(name))
        .map(|(name, value)| (name.clone(), *value))
        .collect();
    unregistered.sort_by(|a, b| a.0.cmp(&b.0));

    Explanation {
        total_score: result.total_score,
        contributions,
        unregistered,
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total Score: {}", self.total_score)?;
        for row in &self.contributions {
            let label = if row.use_log {
                format!("log({})", row.name)
            } else {
                row.name.clone()
            };
            write!(f, "\n  {} = {} (x {})", label, row.raw_value, row.coefficient)?;
            if !row.reported {
                write!(f, " [not reported]")?;
            }
        }
        for (name, value) in &self.unregistered {
            write!(f, "\n  {} = {} [unregistered]", name, value)?;
        }
        Ok(())
    }
}
