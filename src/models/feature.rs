use serde::{Deserialize, Serialize};
use validator::Validate;

/// A named, weighted scoring signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Unique key within the registry
    pub name: String,

    #[serde(rename = "coeff")]
    pub coefficient: f64,

    #[serde(rename = "useLog", default)]
    pub use_log: bool,
}

impl Feature {
    pub fn new(name: impl Into<String>, coefficient: f64, use_log: bool) -> Self {
        Self {
            name: name.into(),
            coefficient,
            use_log,
        }
    }

    /// Formula term for this feature, e.g. `log(len) * 0.2`
    pub fn term(&self) -> String {
        if self.use_log {
            format!("log({}) * {}", self.name, self.coefficient)
        } else {
            format!("{} * {}", self.name, self.coefficient)
        }
    }
}

/// Operator input for adding or editing a feature
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FeatureForm {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    pub coefficient: f64,

    pub use_log: bool,
}

impl FeatureForm {
    pub fn new(name: impl Into<String>, coefficient: f64, use_log: bool) -> Self {
        Self {
            name: name.into(),
            coefficient,
            use_log,
        }
    }

    /// Trim, validate and convert into a registry entry
    pub fn into_feature(mut self) -> crate::error::Result<Feature> {
        self.name = self.name.trim().to_string();
        self.validate()?;
        Ok(Feature::new(self.name, self.coefficient, self.use_log))
    }
}
