//! Configuration file for edgemgmt.
//!
//! Read from `~/.edgemgmt/config.toml`:
//!
//! ```toml
//! [connection]
//! endpoint = "https://api.enterprise.apigee.com/v1"
//! organization = "acme"
//! username = "ops@acme.test"
//! password = "${EDGE_PASSWORD}"
//! timeout_seconds = 30
//!
//! [cache]
//! enabled = true
//! ttl_seconds = 300
//! max_entries = 512
//!
//! [retry]
//! max_retries = 2
//! ```
//!
//! Connection settings missing from the file fall back to `EDGE_ENDPOINT`,
//! `EDGE_ORG`, `EDGE_USERNAME` and `EDGE_PASSWORD`.

use serde::Deserialize;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use std::{env, fs, path::Path, path::PathBuf};

use edgemgmt_client::{CacheManager, Credentials, MemoryCache, NoCache, OrgConfig, RetryConfig};

pub const ENV_ENDPOINT: &str = "EDGE_ENDPOINT";
pub const ENV_ORG: &str = "EDGE_ORG";
pub const ENV_USERNAME: &str = "EDGE_USERNAME";
pub const ENV_PASSWORD: &str = "EDGE_PASSWORD";

// bool::default() is false, so only true needs a fn
const fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize)]
pub struct EdgeConfig {
    pub connection: Option<ConnectionConfig>,
    pub cache: Option<CacheConfig>,
    pub retry: Option<RetryPolicyConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("missing {setting}: set [connection].{setting} or {env_var}")]
    Missing {
        setting: &'static str,
        env_var: &'static str,
    },
    #[error(transparent)]
    Client(#[from] edgemgmt_client::ApiError),
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path),
            ConfigError::Missing { .. } | ConfigError::Client(_) => None,
        }
    }
}

#[derive(Default, Deserialize)]
pub struct ConnectionConfig {
    pub endpoint: Option<String>,
    pub organization: Option<String>,
    pub username: Option<String>,
    /// Supports `${ENV_VAR}` references.
    pub password: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

// Manual Debug impl to prevent leaking the password in logs.
impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("endpoint", &self.endpoint)
            .field("organization", &self.organization)
            .field("username", &self.username)
            .field(
                "password",
                &if self.password.is_some() { "[REDACTED]" } else { "None" },
            )
            .field("timeout_seconds", &self.timeout_seconds)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Response cache for cached GETs (organizations, currencies, families).
#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    /// Default: true.
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub ttl_seconds: Option<u64>,
    pub max_entries: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: None,
            max_entries: None,
        }
    }
}

impl CacheConfig {
    fn build(&self) -> Arc<dyn CacheManager> {
        if !self.enabled {
            return Arc::new(NoCache);
        }
        let ttl = self
            .ttl_seconds
            .map_or(MemoryCache::DEFAULT_TTL, Duration::from_secs);
        let max_entries = self.max_entries.unwrap_or(MemoryCache::DEFAULT_MAX_ENTRIES);
        Arc::new(MemoryCache::new(ttl, max_entries))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RetryPolicyConfig {
    pub max_retries: Option<u32>,
}

/// Replace `${VAR}` with the value of `VAR` (empty when unset).
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(end_rel) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &rest[start + 2..start + 2 + end_rel];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &rest[start + 2 + end_rel + 1..];
    }

    out.push_str(rest);
    out
}

impl EdgeConfig {
    /// Load the default config file. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!(path = %path.display(), error = %source, "Failed to read config");
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map(Some).map_err(|source| {
            tracing::warn!(path = %path.display(), error = %source, "Failed to parse config");
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Build an [`OrgConfig`], falling back to `EDGE_*` environment variables
    /// for connection settings absent from the file.
    pub fn to_org_config(&self) -> Result<OrgConfig, ConfigError> {
        self.to_org_config_with(|name| env::var(name).ok())
    }

    /// Like [`to_org_config`](Self::to_org_config) with an explicit
    /// environment lookup.
    pub fn to_org_config_with(
        &self,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<OrgConfig, ConfigError> {
        let connection = self.connection.as_ref();
        let setting = |value: Option<&String>, setting: &'static str, env_var: &'static str| {
            value
                .map(|value| expand_env_vars(value))
                .filter(|value| !value.trim().is_empty())
                .or_else(|| env_lookup(env_var).filter(|value| !value.trim().is_empty()))
                .ok_or(ConfigError::Missing { setting, env_var })
        };

        let endpoint = setting(connection.and_then(|c| c.endpoint.as_ref()), "endpoint", ENV_ENDPOINT)?;
        let organization = setting(
            connection.and_then(|c| c.organization.as_ref()),
            "organization",
            ENV_ORG,
        )?;
        let username = setting(connection.and_then(|c| c.username.as_ref()), "username", ENV_USERNAME)?;
        let password = setting(connection.and_then(|c| c.password.as_ref()), "password", ENV_PASSWORD)?;

        let mut config = OrgConfig::new(endpoint, organization, Credentials::new(username, password))?
            .with_cache(self.cache.as_ref().map_or_else(
                || CacheConfig::default().build(),
                CacheConfig::build,
            ));

        if let Some(secs) = connection.and_then(|c| c.timeout_seconds) {
            config = config.with_timeout_secs(secs);
        }
        if let Some(agent) = connection.and_then(|c| c.user_agent.as_ref()) {
            config = config.with_user_agent(agent.clone());
        }
        if let Some(max_retries) = self.retry.as_ref().and_then(|r| r.max_retries) {
            config = config.with_retry(RetryConfig {
                max_retries,
                ..RetryConfig::default()
            });
        }
        Ok(config)
    }

    /// Persist the default organization to the config file.
    ///
    /// Uses `toml_edit` to preserve comments and formatting.
    /// Creates the config file and parent directory if they don't exist.
    pub fn persist_organization(org: &str) -> std::io::Result<()> {
        let Some(path) = config_path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config path",
            ));
        };
        Self::persist_organization_to(&path, org)
    }

    pub fn persist_organization_to(path: &Path, org: &str) -> std::io::Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !parent.exists() {
            fs::create_dir_all(parent)?;
            restrict_permissions(parent, 0o700)?;
        }

        let content = if path.exists() {
            fs::read_to_string(path)?
        } else {
            String::new()
        };

        let mut doc = content
            .parse::<toml_edit::DocumentMut>()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        if !doc.contains_key("connection") {
            doc["connection"] = toml_edit::Item::Table(toml_edit::Table::new());
        }
        doc["connection"]["organization"] = toml_edit::value(org);

        // Write back atomically
        let mut file = tempfile::NamedTempFile::new_in(parent)?;
        file.write_all(doc.to_string().as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| e.error)?;

        restrict_permissions(path, 0o600)?;
        tracing::debug!(path = %path.display(), org, "Persisted default organization");
        Ok(())
    }
}

/// Tighten `path` to `mode` when it is ours and readable by group or others.
#[cfg(unix)]
fn restrict_permissions(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::{MetadataExt, PermissionsExt};
    let metadata = fs::metadata(path)?;
    let our_uid = unsafe { libc::getuid() };
    if metadata.uid() == our_uid && metadata.permissions().mode() & 0o077 != 0 {
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".edgemgmt").join("config.toml"))
}
