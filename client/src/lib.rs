//! HTTP transport for the management API.
//!
//! # Architecture
//!
//! - [`OrgConfig`] - endpoint, organization, credentials and tuning knobs
//! - [`ApiClient`] - authenticated request helpers (`get_json`, `post_json`, ...)
//! - [`retry`] - exponential backoff for transient failures
//! - [`cache`] - key/value cache consulted before cached GETs
//! - [`ApiError`] - the error type every entity operation returns
//!
//! Path segments passed to [`ApiClient`] are percent-encoded one by one, so
//! entity names never need manual escaping.

pub mod cache;
mod config;
mod error;
mod http;
pub mod retry;

pub use cache::{CacheManager, MemoryCache, NoCache};
pub use config::{Credentials, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, OrgConfig};
pub use error::{ApiError, Result};
pub use http::{ApiClient, ApiRequest, HTML, JSON, OCTET_STREAM};
pub use retry::RetryConfig;

pub use edgemgmt_types;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// Read an error response body, truncated to 32 KiB.
pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}
