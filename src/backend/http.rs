use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::backend::{SearchBackend, UpsertMode};
use crate::config::BackendConfig;
use crate::error::{AppError, Result};
use crate::models::{Feature, KeywordCount, ResultType, SearchResult};

/// REST client for the search backend
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    access_token: Option<String>,
}

impl HttpBackend {
    /// Create a new backend client
    pub fn new(config: &BackendConfig, access_token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        // a trailing slash keeps any path prefix when joining endpoints
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| AppError::Configuration(format!("Invalid backend URL {}: {}", base, e)))?;

        Ok(Self {
            client,
            base_url,
            access_token,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::Configuration(format!("Invalid endpoint {}: {}", path, e)))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send a request and return the body of a 2xx response
    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<String> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::fetch(operation, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(
                operation,
                format!("backend returned {}", status),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::fetch(operation, e.to_string()))?;
        debug!(operation, status = status.as_u16(), bytes = body.len(), "Backend response");
        Ok(body)
    }

    /// Send a request and decode its JSON body; a shape mismatch is a fetch failure
    async fn fetch_json<T: DeserializeOwned>(&self, operation: &str, request: RequestBuilder) -> Result<T> {
        let body = self.send(operation, request).await?;
        serde_json::from_str(&body)
            .map_err(|e| AppError::fetch(operation, format!("unexpected response shape: {}", e)))
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn search(&self, term: &str, result_type: ResultType) -> Result<Vec<SearchResult>> {
        let kind = result_type.to_string();
        let request = self
            .client
            .get(self.endpoint("api/search")?)
            .query(&[("q", term), ("type", kind.as_str())]);
        self.fetch_json("search", request).await
    }

    async fn spell_check(&self, term: &str) -> Result<String> {
        let request = self
            .client
            .get(self.endpoint("api/spellcheck")?)
            .query(&[("q", term)]);
        self.send("spellcheck", request).await
    }

    async fn list_features(&self) -> Result<Vec<Feature>> {
        let request = self.authorized(self.client.get(self.endpoint("api/features")?));
        self.fetch_json("list_features", request).await
    }

    async fn upsert_feature(&self, feature: &Feature, mode: UpsertMode) -> Result<()> {
        let url = self.endpoint("api/features")?;
        let request = match mode {
            UpsertMode::Create => self.client.post(url),
            UpsertMode::Update => self.client.put(url),
        };
        self.send("upsert_feature", self.authorized(request).json(feature))
            .await
            .map(|_| ())
    }

    async fn get_config(&self) -> Result<BTreeMap<String, f64>> {
        let request = self.authorized(self.client.get(self.endpoint("api/configs")?));
        self.fetch_json("get_config", request).await
    }

    async fn set_config(&self, name: &str, value: f64) -> Result<()> {
        let mut url = self.endpoint("api/configs")?;
        url.path_segments_mut()
            .map_err(|_| AppError::Configuration("backend URL cannot be a base".to_string()))?
            .push(name);

        let request = self
            .authorized(self.client.put(url))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(value.to_string());
        self.send("set_config", request).await.map(|_| ())
    }

    async fn trending(&self) -> Result<Vec<KeywordCount>> {
        let request = self.client.get(self.endpoint("api/trending")?);
        self.fetch_json("trending", request).await
    }
}
