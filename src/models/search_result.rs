use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumString};

/// Kind of result a search is restricted to; also the path segment of a search location
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResultType {
    #[default]
    Doc,
    Pdf,
    Video,
}

/// A single scored result as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub url: String,

    #[serde(default)]
    pub title: String,

    #[serde(rename = "type", default)]
    pub result_type: String,

    #[serde(default)]
    pub display_text: String,

    /// Backend-computed score, displayed verbatim
    pub total_score: f64,

    /// Raw (pre-coefficient, pre-log) feature values keyed by feature name
    #[serde(default)]
    pub features: HashMap<String, f64>,
}

impl SearchResult {
    /// Title shown for the result
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "(No title)"
        } else {
            &self.title
        }
    }

    /// Snippet shown under the title; falls back to the title when the backend had no excerpt
    pub fn snippet(&self) -> &str {
        let text = self.display_text.trim();
        if text.is_empty() || text == "..." {
            self.display_title()
        } else {
            text
        }
    }
}
