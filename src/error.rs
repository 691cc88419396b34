use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Network or backend errors on search, spellcheck, feature or config calls
    #[error("Fetch failure ({operation}): {message}")]
    FetchFailure { operation: String, message: String },

    /// Feature name rejected before upsert
    #[error("Invalid feature name: {0}")]
    InvalidFeatureName(String),

    /// A response arrived after the request that triggered it was superseded
    #[error("Stale response for generation {generation} (current {current})")]
    StaleResponse { generation: u64, current: u64 },

    /// Validation errors other than the feature name
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// Build a fetch failure for a named backend operation
    pub fn fetch(operation: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::FetchFailure {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::FetchFailure { .. } => "FETCH_FAILURE",
            AppError::InvalidFeatureName(_) => "INVALID_FEATURE_NAME",
            AppError::StaleResponse { .. } => "STALE_RESPONSE",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Whether the error should be shown to the user as a notice.
    ///
    /// Stale responses are dropped silently. Spellcheck fetch failures are
    /// absorbed by the advisor before they ever reach this point.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, AppError::StaleResponse { .. })
    }
}

/// Conversion from validator::ValidationErrors
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        if err.field_errors().contains_key("name") {
            AppError::InvalidFeatureName(err.to_string())
        } else {
            AppError::Validation(err.to_string())
        }
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
