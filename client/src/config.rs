//! Connection settings for one organization on the management API.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::cache::{CacheManager, MemoryCache};
use crate::error::{ApiError, Result};
use crate::retry::RetryConfig;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("edgemgmt/", env!("CARGO_PKG_VERSION"));

/// Basic-auth credentials.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn expose_password(&self) -> &str {
        &self.password
    }
}

// Manual Debug impl to prevent leaking passwords in logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Endpoint, organization and client tuning shared by every entity.
///
/// ```rust
/// use edgemgmt_client::{Credentials, OrgConfig};
///
/// let config = OrgConfig::new(
///     "https://api.enterprise.apigee.com/v1",
///     "acme",
///     Credentials::new("ops@acme.test", "secret"),
/// )
/// .unwrap()
/// .with_timeout_secs(10);
/// assert_eq!(config.org_name(), "acme");
/// ```
#[derive(Debug, Clone)]
pub struct OrgConfig {
    endpoint: Url,
    org_name: String,
    credentials: Credentials,
    timeout: Duration,
    retry: RetryConfig,
    user_agent: String,
    cache: Arc<dyn CacheManager>,
}

impl OrgConfig {
    pub fn new(
        endpoint: impl AsRef<str>,
        org_name: impl Into<String>,
        credentials: Credentials,
    ) -> Result<Self> {
        let raw = endpoint.as_ref().trim();
        let endpoint = Url::parse(raw)
            .map_err(|e| ApiError::Config(format!("invalid endpoint '{raw}': {e}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "endpoint '{raw}' must use http or https"
            )));
        }
        if endpoint.cannot_be_a_base() {
            return Err(ApiError::Config(format!(
                "endpoint '{raw}' cannot be used as a base URL"
            )));
        }

        let org_name = org_name.into();
        if org_name.trim().is_empty() {
            return Err(ApiError::Config(
                "organization name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            endpoint,
            org_name,
            credentials,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cache: Arc::new(MemoryCache::default()),
        })
    }

    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs.max(1));
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        if !user_agent.trim().is_empty() {
            self.user_agent = user_agent;
        }
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn CacheManager>) -> Self {
        self.cache = cache;
        self
    }

    /// Blank names are ignored and the current organization kept.
    #[must_use]
    pub fn with_org_name(mut self, org_name: impl Into<String>) -> Self {
        let org_name = org_name.into();
        if org_name.trim().is_empty() {
            tracing::warn!(current = %self.org_name, "Ignoring blank organization name");
        } else {
            self.org_name = org_name;
        }
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    #[must_use]
    pub fn org_name(&self) -> &str {
        &self.org_name
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<dyn CacheManager> {
        &self.cache
    }
}
