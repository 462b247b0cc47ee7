//! Nested JSON data structures returned by the management API.
//!
//! Unknown keys are ignored and missing keys take their defaults, so partial
//! payloads (e.g. a parent organization's abbreviated address list) still parse.

use serde::{Deserialize, Serialize};

/// Postal address attached to a mint organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub address1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub zip: String,
    pub country: String,
    pub is_primary: bool,
}

/// A currency an organization accepts, as listed by `supported-currencies`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupportedCurrency {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub description: String,
    /// Owning organization id, flattened from the nested `organization` object.
    #[serde(deserialize_with = "organization_id")]
    pub organization: Option<String>,
    pub virtual_currency: bool,
    pub status: Option<String>,
    pub credit_limit: Option<f64>,
    pub minimum_topup_amount: Option<f64>,
}

fn organization_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(id)) => Some(id),
        Some(serde_json::Value::Object(map)) => map
            .get("id")
            .or_else(|| map.get("name"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
        _ => None,
    })
}

/// Name/value pair used to extend app and credential profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Approval state of one API product on a credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialApiProduct {
    pub apiproduct: String,
    #[serde(default)]
    pub status: String,
}
