use serde::{Deserialize, Serialize};

use crate::models::ResultType;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection
    #[serde(default)]
    pub backend: BackendConfig,

    /// Search presentation
    #[serde(default)]
    pub search: SearchConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the compiled-in defaults, an optional file and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("SEARCH_CONSOLE_CONFIG")
            .unwrap_or_else(|_| "config/search-console.toml".to_string());
        Self::load_from(&config_path)
    }

    /// Same layering as [`Config::load`] with an explicit override file
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(config_path).required(false))
            // Override with environment variables (prefix: SEARCH_CONSOLE_)
            .add_source(
                config::Environment::with_prefix("SEARCH_CONSOLE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Bearer token for admin calls, read from the configured env var
    pub fn access_token(&self) -> Option<String> {
        self.backend
            .access_token_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|token| !token.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the search backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Env var holding the admin bearer token
    #[serde(default = "default_access_token_env")]
    pub access_token_env: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            access_token_env: default_access_token_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Results per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Result type used when a location does not name one
    #[serde(default)]
    pub default_result_type: ResultType,

    /// Offer the debug toggle
    #[serde(default)]
    pub debug_allowed: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            default_result_type: ResultType::default(),
            debug_allowed: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:45555".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_access_token_env() -> Option<String> {
    Some("SEARCH_CONSOLE_TOKEN".to_string())
}

fn default_page_size() -> usize {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}
