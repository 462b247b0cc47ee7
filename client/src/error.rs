//! Error type shared by the transport and the entity layer.

use reqwest::StatusCode;
use thiserror::Error;

use edgemgmt_types::EnumParseError;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The management API answered with a non-2xx status.
    #[error("{method} {url} returned {status}: {body}")]
    Response {
        method: String,
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("request to {url} failed after {attempts} attempt(s): {source}")]
    Transport {
        url: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A caller-supplied or server-supplied value failed validation.
    #[error("{0}")]
    Parameter(String),

    #[error("{0}")]
    NotImplemented(String),

    /// Monetization error reported with a `mint.*` code.
    #[error("mint API error {code} ({status}): {message}")]
    Mint {
        code: String,
        message: String,
        status: StatusCode,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    pub fn parameter(message: impl Into<String>) -> Self {
        Self::Parameter(message.into())
    }

    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Response { status, .. } | Self::Mint { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Extracts `(code, message)` when a response body carries a mint error code.
    ///
    /// Mint errors are JSON objects whose `code` starts with `mint.`.
    #[must_use]
    pub fn mint_error_code(body: &str) -> Option<(String, String)> {
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        let code = value.get("code")?.as_str()?;
        if !code.to_ascii_lowercase().starts_with("mint.") {
            return None;
        }
        let message = value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        Some((code.to_string(), message.to_string()))
    }

    /// Converts a response error carrying a mint error code into [`ApiError::Mint`].
    ///
    /// Every other error is returned unchanged.
    #[must_use]
    pub fn into_mint(self) -> Self {
        match self {
            Self::Response { status, body, .. } if Self::mint_error_code(&body).is_some() => {
                let (code, message) = Self::mint_error_code(&body).unwrap_or_default();
                Self::Mint {
                    code,
                    message,
                    status,
                }
            }
            other => other,
        }
    }
}

impl From<EnumParseError> for ApiError {
    fn from(err: EnumParseError) -> Self {
        Self::Parameter(err.to_string())
    }
}
