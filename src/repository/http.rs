//! HTTP plumbing shared by the endpoint repositories

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::{
    config::ApiConfig,
    error::{AppError, AppResult, ServiceError},
    repository::storage::{KeyValueStore, TOKEN_KEY},
};

/// Backing-service client; attaches the persisted credential to every request
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    storage: Arc<dyn KeyValueStore>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, storage: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Self::with_client(http, &config.base_url, storage)
    }

    /// Fails when `base_url` is not an absolute http(s)-style URL
    pub fn with_client(http: Client, base_url: &str, storage: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let invalid = |reason: String| {
            AppError::Config(::config::ConfigError::Message(format!(
                "Invalid api.base_url {}: {}",
                base_url, reason
            )))
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }
        Ok(Self {
            http,
            base_url: parsed,
            storage,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `segments` under the base URL. Each segment is percent-encoded,
    /// so an id holding `/`, `?` or `#` stays a single path segment.
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Start a request, adding `Authorization: Bearer` when a token is stored
    pub fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        tracing::debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) => builder.bearer_auth(token),
            Ok(None) => builder,
            Err(e) => {
                tracing::warn!("Could not read stored credential: {}", e);
                builder
            }
        }
    }

    /// Send and decode a JSON response body
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> AppResult<T> {
        let response = check_status(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send, ignoring any response body
    pub async fn send_empty(&self, builder: RequestBuilder) -> AppResult<()> {
        check_status(builder.send().await?).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let error = ServiceError::from_body(status, &body);
    tracing::debug!("Service rejected request: {} ({:?})", status, error.message);
    Err(AppError::Service(error))
}
