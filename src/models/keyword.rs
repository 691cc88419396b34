use serde::{Deserialize, Serialize};

/// Popular keyword with the number of times it was searched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u64,
}

/// Suggested correction for a query term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellcheckSuggestion {
    pub original: String,
    pub suggested: String,
}

impl SpellcheckSuggestion {
    /// True when the backend proposed something other than the input
    pub fn is_correction(&self) -> bool {
        self.suggested != self.original
    }
}
