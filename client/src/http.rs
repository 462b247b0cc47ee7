//! Request helpers over a configured `reqwest` client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, Response};
use serde_json::Value;
use url::Url;

use crate::config::OrgConfig;
use crate::error::{ApiError, Result};
use crate::read_capped_error_body;
use crate::retry::{self, RetryOutcome};

pub const JSON: &str = "application/json; charset=utf-8";
pub const HTML: &str = "text/html";
pub const OCTET_STREAM: &str = "application/octet-stream; charset=utf-8";

const CONNECT_TIMEOUT_SECS: u64 = 30;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 16;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Authenticated client for one organization.
///
/// Cloning is cheap; clones share the connection pool and the cache.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<OrgConfig>,
}

/// Outgoing request description, resolved to a URL by [`ApiClient::send`].
#[derive(Debug, Clone)]
pub struct ApiRequest<'a> {
    pub method: Method,
    pub segments: &'a [&'a str],
    pub query: &'a [(&'a str, &'a str)],
    pub body: Option<&'a Value>,
    pub accept: &'a str,
}

impl<'a> ApiRequest<'a> {
    #[must_use]
    pub fn new(method: Method, segments: &'a [&'a str]) -> Self {
        Self {
            method,
            segments,
            query: &[],
            body: None,
            accept: JSON,
        }
    }

    #[must_use]
    pub fn query(mut self, query: &'a [(&'a str, &'a str)]) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn body(mut self, body: &'a Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn accept(mut self, accept: &'a str) -> Self {
        self.accept = accept;
        self
    }
}

fn client_builder(config: &OrgConfig) -> reqwest::ClientBuilder {
    let mut default_headers = HeaderMap::new();
    if let Ok(agent) = HeaderValue::from_str(config.user_agent()) {
        default_headers.insert(USER_AGENT, agent);
    }

    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .timeout(config.timeout())
        .redirect(reqwest::redirect::Policy::none())
        .https_only(config.endpoint().scheme() == "https")
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        .default_headers(default_headers)
}

impl ApiClient {
    pub fn new(config: OrgConfig) -> Result<Self> {
        let http = client_builder(&config)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    #[must_use]
    pub fn config(&self) -> &OrgConfig {
        &self.config
    }

    #[must_use]
    pub fn org_name(&self) -> &str {
        self.config.org_name()
    }

    /// A client identical to this one but scoped to another organization.
    #[must_use]
    pub fn for_org(&self, org_name: &str) -> Self {
        Self {
            http: self.http.clone(),
            config: Arc::new(self.config.as_ref().clone().with_org_name(org_name)),
        }
    }

    /// Join path segments onto the endpoint, percent-encoding each segment.
    ///
    /// Segments are pushed verbatim, so a `/` inside an entity name is encoded
    /// rather than treated as a separator.
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.config.endpoint().clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                ApiError::Config(format!(
                    "endpoint '{}' cannot be used as a base URL",
                    self.config.endpoint()
                ))
            })?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Send a request through the retry policy and return the 2xx response.
    pub async fn send(&self, request: ApiRequest<'_>) -> Result<Response> {
        let url = self.url(request.segments)?;
        let credentials = self.config.credentials();

        tracing::debug!(method = %request.method, url = %url, "Sending management API request");

        let build = || {
            let mut builder = self
                .http
                .request(request.method.clone(), url.clone())
                .basic_auth(credentials.username(), Some(credentials.expose_password()))
                .header(ACCEPT, request.accept);
            if !request.query.is_empty() {
                builder = builder.query(request.query);
            }
            if let Some(body) = request.body {
                builder = builder
                    .header(CONTENT_TYPE, JSON)
                    .body(body.to_string());
            }
            builder
        };

        match retry::send_with_retry(build, self.config.retry()).await {
            RetryOutcome::Success(response) => Ok(response),
            RetryOutcome::HttpError(response) => {
                let status = response.status();
                let url = response.url().to_string();
                let body = read_capped_error_body(response).await;
                tracing::debug!(%status, %url, "Management API returned an error status");
                Err(ApiError::Response {
                    method: request.method.to_string(),
                    url,
                    status,
                    body,
                })
            }
            RetryOutcome::ConnectionError { attempts, source } => Err(ApiError::Transport {
                url: url.to_string(),
                attempts,
                source,
            }),
            RetryOutcome::NonRetryable(source) => Err(ApiError::Transport {
                url: url.to_string(),
                attempts: 1,
                source,
            }),
        }
    }

    /// Send and decode the body as JSON. An empty body decodes to `Value::Null`.
    pub async fn send_json(&self, request: ApiRequest<'_>) -> Result<Value> {
        let response = self.send(request).await?;
        let url = response.url().to_string();
        let text = response.text().await.map_err(|source| ApiError::Transport {
            url: url.clone(),
            attempts: 1,
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|source| ApiError::Decode { url, source })
    }

    pub async fn send_text(&self, request: ApiRequest<'_>) -> Result<String> {
        let response = self.send(request).await?;
        let url = response.url().to_string();
        response.text().await.map_err(|source| ApiError::Transport {
            url,
            attempts: 1,
            source,
        })
    }

    pub async fn get_json(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Value> {
        self.send_json(ApiRequest::new(Method::GET, segments).query(query))
            .await
    }

    /// GET through the configured cache: a hit skips the request, a miss stores
    /// the decoded body under `cache_key`.
    pub async fn get_json_cached(
        &self,
        cache_key: &str,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Value> {
        let cache = self.config.cache();
        if let Some(value) = cache.get(cache_key) {
            tracing::debug!(key = cache_key, "Cache hit");
            return Ok(value);
        }
        let value = self.get_json(segments, query).await?;
        cache.set(cache_key, value.clone());
        Ok(value)
    }

    pub async fn get_text(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        accept: &str,
    ) -> Result<String> {
        self.send_text(
            ApiRequest::new(Method::GET, segments)
                .query(query)
                .accept(accept),
        )
        .await
    }

    pub async fn post_json(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let mut request = ApiRequest::new(Method::POST, segments).query(query);
        if let Some(body) = body {
            request = request.body(body);
        }
        self.send_json(request).await
    }

    pub async fn post_for_text(
        &self,
        segments: &[&str],
        body: &Value,
        accept: &str,
    ) -> Result<String> {
        self.send_text(
            ApiRequest::new(Method::POST, segments)
                .body(body)
                .accept(accept),
        )
        .await
    }

    pub async fn put_json(&self, segments: &[&str], body: &Value) -> Result<Value> {
        self.send_json(ApiRequest::new(Method::PUT, segments).body(body))
            .await
    }

    pub async fn delete(&self, segments: &[&str]) -> Result<Value> {
        self.send_json(ApiRequest::new(Method::DELETE, segments))
            .await
    }
}
