//! Apps registered by a developer, and their consumer credentials.
//!
//! An app may carry several credentials (key/secret pairs). Accessors expose
//! the *active* one: the approved, unexpired credential issued most recently,
//! or the most recently issued credential when none is approved.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value, json};

use edgemgmt_client::{ApiClient, ApiError, Result};
use edgemgmt_types::{AccessType, Attribute, CredentialApiProduct, KeyAction, attributes_to_json};

use crate::controller::OrganizationAware;
use crate::value::{array_field, decode};

const DESCRIPTION_ATTRIBUTE: &str = "description";
const DEFAULT_APP_FAMILY: &str = "default";
const APPROVED: &str = "approved";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireApp {
    app_id: String,
    name: String,
    callback_url: String,
    access_type: Option<String>,
    status: String,
    developer_id: String,
    app_family: Option<String>,
    scopes: Vec<String>,
    api_products: Option<Vec<String>>,
    attributes: Vec<Attribute>,
    created_at: Option<i64>,
    created_by: String,
    last_modified_at: Option<i64>,
    last_modified_by: String,
    credentials: Vec<WireCredential>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireCredential {
    consumer_key: String,
    consumer_secret: String,
    api_products: Vec<CredentialApiProduct>,
    scopes: Vec<String>,
    status: String,
    attributes: Vec<Attribute>,
    issued_at: Option<i64>,
    expires_at: Option<i64>,
}

impl WireCredential {
    /// `expires_at` of `-1` (or absent) means the credential never expires.
    fn is_live(&self, now_ms: i64) -> bool {
        self.status.eq_ignore_ascii_case(APPROVED)
            && self
                .expires_at
                .is_none_or(|expires| expires < 0 || expires > now_ms)
    }
}

fn active_credential(credentials: &[WireCredential], now_ms: i64) -> Option<&WireCredential> {
    let issued = |credential: &&WireCredential| credential.issued_at.unwrap_or(0);
    credentials
        .iter()
        .filter(|credential| credential.is_live(now_ms))
        .max_by_key(issued)
        .or_else(|| credentials.iter().max_by_key(issued))
}

/// A developer app.
#[derive(Debug, Clone)]
pub struct DeveloperApp {
    client: ApiClient,
    developer_mail: String,
    app_id: String,
    name: String,
    callback_url: String,
    access_type: AccessType,
    status: String,
    developer_id: String,
    app_family: String,
    scopes: Vec<String>,
    api_products: Vec<String>,
    attributes: Vec<Attribute>,
    created_at: Option<i64>,
    created_by: String,
    modified_at: Option<i64>,
    modified_by: String,
    consumer_key: String,
    consumer_secret: String,
    credential_api_products: Option<Vec<CredentialApiProduct>>,
    credential_scopes: Option<Vec<String>>,
    credential_status: String,
    credential_attributes: Vec<Attribute>,
}

impl DeveloperApp {
    #[must_use]
    pub fn new(client: ApiClient, developer_mail: impl Into<String>) -> Self {
        Self {
            client,
            developer_mail: developer_mail.into(),
            app_id: String::new(),
            name: String::new(),
            callback_url: String::new(),
            access_type: AccessType::Read,
            status: String::new(),
            developer_id: String::new(),
            app_family: DEFAULT_APP_FAMILY.to_string(),
            scopes: Vec::new(),
            api_products: Vec::new(),
            attributes: Vec::new(),
            created_at: None,
            created_by: String::new(),
            modified_at: None,
            modified_by: String::new(),
            consumer_key: String::new(),
            consumer_secret: String::new(),
            credential_api_products: None,
            credential_scopes: None,
            credential_status: String::new(),
            credential_attributes: Vec::new(),
        }
    }

    /// `/o/{org}/developers/{developer_mail}/apps/{tail...}`
    fn segments<'a>(&'a self, tail: &[&'a str]) -> Vec<&'a str> {
        let mut segments = vec![
            "o",
            self.client.org_name(),
            "developers",
            self.developer_mail.as_str(),
            "apps",
        ];
        segments.extend_from_slice(tail);
        segments
    }

    fn resolve_name(&self, name: Option<&str>) -> Result<String> {
        let name = name.filter(|name| !name.is_empty()).unwrap_or(&self.name);
        if name.is_empty() {
            return Err(ApiError::parameter("Missing app name"));
        }
        Ok(name.to_string())
    }

    fn require_consumer_key(&self) -> Result<String> {
        if self.consumer_key.is_empty() {
            return Err(ApiError::parameter(format!(
                "App '{}' has no consumer key",
                self.name
            )));
        }
        Ok(self.consumer_key.clone())
    }

    /// Load an app by name. Defaults to this app's name.
    pub async fn load(&mut self, name: Option<&str>) -> Result<()> {
        let name = self.resolve_name(name)?;
        let data = self
            .client
            .get_json(&self.segments(&[name.as_str()]), &[])
            .await?;
        self.load_from_raw_data(&data)
    }

    /// Whether an app with this name exists for the developer.
    pub async fn validate(&self, name: Option<&str>) -> Result<bool> {
        let name = self.resolve_name(name)?;
        match self
            .client
            .get_json(&self.segments(&[name.as_str()]), &[])
            .await
        {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Create or update the app.
    ///
    /// An update is issued when `force_update` is set, when the app id is
    /// known, or when an app with this name already exists. Updates leave the
    /// consumer key untouched and reconcile the key's API products with
    /// [`api_products`](Self::api_products) separately.
    pub async fn save(&mut self, force_update: bool) -> Result<()> {
        let name = self.resolve_name(None)?;
        let is_update =
            force_update || !self.app_id.is_empty() || self.validate(Some(name.as_str())).await?;

        if !is_update {
            tracing::debug!(app = %name, developer = %self.developer_mail, "Creating developer app");
            let body = self.wire_body(true);
            let response = self
                .client
                .post_json(&self.segments(&[]), &[], Some(&body))
                .await?;
            return self.load_from_raw_data(&response);
        }

        tracing::debug!(app = %name, developer = %self.developer_mail, "Updating developer app");
        let consumer_key = self.consumer_key.clone();
        let consumer_secret = self.consumer_secret.clone();
        let previous: Vec<String> = self.credential_product_names();
        let wanted = self.api_products.clone();

        let body = self.wire_body(false);
        let response = self
            .client
            .put_json(&self.segments(&[name.as_str()]), &body)
            .await?;

        let mut changed = false;
        if !consumer_key.is_empty() {
            let added: Vec<&String> = wanted.iter().filter(|p| !previous.contains(p)).collect();
            if !added.is_empty() {
                let body = json!({ "apiProducts": added });
                self.client
                    .post_json(
                        &self.segments(&[name.as_str(), "keys", consumer_key.as_str()]),
                        &[],
                        Some(&body),
                    )
                    .await?;
                changed = true;
            }
            for product in previous.iter().filter(|p| !wanted.contains(p)) {
                self.client
                    .delete(&self.segments(&[
                        name.as_str(),
                        "keys",
                        consumer_key.as_str(),
                        "apiproducts",
                        product.as_str(),
                    ]))
                    .await?;
                changed = true;
            }
        }

        if changed {
            return self.load(Some(name.as_str())).await;
        }
        self.load_from_raw_data(&response)?;
        if self.consumer_key.is_empty() {
            self.consumer_key = consumer_key;
            self.consumer_secret = consumer_secret;
        }
        Ok(())
    }

    /// Approve or revoke the active consumer key, optionally along with each
    /// of its API products.
    pub async fn set_key_status(
        &mut self,
        action: impl Into<KeyAction>,
        also_set_apiproduct: bool,
    ) -> Result<()> {
        let action = action.into();
        let name = self.resolve_name(None)?;
        let key = self.require_consumer_key()?;
        let query = [("action", action.as_str())];

        self.client
            .post_json(
                &self.segments(&[name.as_str(), "keys", key.as_str()]),
                &query,
                None,
            )
            .await?;

        if also_set_apiproduct {
            for product in self.credential_product_names() {
                self.client
                    .post_json(
                        &self.segments(&[
                            name.as_str(),
                            "keys",
                            key.as_str(),
                            "apiproducts",
                            product.as_str(),
                        ]),
                        &query,
                        None,
                    )
                    .await?;
            }
            if let Some(products) = &mut self.credential_api_products {
                for product in products {
                    product.status = action.resulting_status().to_string();
                }
            }
        }

        self.credential_status = action.resulting_status().to_string();
        Ok(())
    }

    /// Delete an app by name. Deleting this app blanks it.
    pub async fn delete(&mut self, name: Option<&str>) -> Result<()> {
        let name = self.resolve_name(name)?;
        self.client
            .delete(&self.segments(&[name.as_str()]))
            .await?;
        if name == self.name {
            self.blank_values();
        }
        Ok(())
    }

    /// Names of the developer's apps.
    pub async fn get_list(&self) -> Result<Vec<String>> {
        let value = self.client.get_json(&self.segments(&[]), &[]).await?;
        decode(value, "developer apps")
    }

    /// Fully loaded apps of a developer. Defaults to this app's developer.
    pub async fn get_list_detail(&self, developer_mail: Option<&str>) -> Result<Vec<DeveloperApp>> {
        let developer_mail = developer_mail
            .filter(|mail| !mail.is_empty())
            .unwrap_or(&self.developer_mail);
        let data = self
            .client
            .get_json(
                &[
                    "o",
                    self.client.org_name(),
                    "developers",
                    developer_mail,
                    "apps",
                ],
                &[("expand", "true")],
            )
            .await?;

        array_field(&data, "app")
            .iter()
            .map(|entry| {
                let mut app = DeveloperApp::new(self.client.clone(), developer_mail);
                app.load_from_raw_data(entry)?;
                Ok(app)
            })
            .collect()
    }

    /// Add a caller-supplied key/secret pair and attach the app's products to it.
    pub async fn create_key(&mut self, consumer_key: &str, consumer_secret: &str) -> Result<()> {
        if consumer_key.is_empty() || consumer_secret.is_empty() {
            return Err(ApiError::parameter(
                "Consumer key and consumer secret must both be provided",
            ));
        }
        let name = self.resolve_name(None)?;

        let body = json!({ "consumerKey": consumer_key, "consumerSecret": consumer_secret });
        self.client
            .post_json(
                &self.segments(&[name.as_str(), "keys", "create"]),
                &[],
                Some(&body),
            )
            .await?;

        let body = json!({ "apiProducts": self.api_products });
        self.client
            .post_json(
                &self.segments(&[name.as_str(), "keys", consumer_key]),
                &[],
                Some(&body),
            )
            .await?;

        self.load(Some(name.as_str())).await
    }

    pub async fn delete_key(&mut self, consumer_key: &str) -> Result<()> {
        let name = self.resolve_name(None)?;
        self.client
            .delete(&self.segments(&[name.as_str(), "keys", consumer_key]))
            .await?;
        if consumer_key == self.consumer_key {
            self.clear_credential();
        }
        Ok(())
    }

    /// Every app in the organization, with developer emails resolved.
    pub async fn list_all_org_apps(&self) -> Result<Vec<DeveloperApp>> {
        let org = self.client.org_name();
        let apps = self
            .client
            .get_json(&["o", org, "apps"], &[("expand", "true")])
            .await?;
        let developers = self
            .client
            .get_json(&["o", org, "developers"], &[("expand", "true")])
            .await?;

        let mail_by_id: HashMap<&str, &str> = array_field(&developers, "developer")
            .iter()
            .filter_map(|developer| {
                let id = developer.get("developerId")?.as_str()?;
                let email = developer.get("email")?.as_str()?;
                Some((id, email))
            })
            .collect();

        array_field(&apps, "app")
            .iter()
            .map(|entry| {
                let developer_id = entry
                    .get("developerId")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                let mail = mail_by_id.get(developer_id).copied().unwrap_or_else(|| {
                    tracing::warn!(developer_id, "No developer found for app; email left blank");
                    ""
                });
                let mut app = DeveloperApp::new(self.client.clone(), mail);
                app.load_from_raw_data(entry)?;
                Ok(app)
            })
            .collect()
    }

    /// Replace this app's state with a raw app object from the API.
    pub fn load_from_raw_data(&mut self, data: &Value) -> Result<()> {
        let wire: WireApp = decode(data.clone(), "developer app")?;
        self.blank_values();

        let now_ms = chrono::Utc::now().timestamp_millis();
        let credential = active_credential(&wire.credentials, now_ms);

        self.app_id = wire.app_id;
        self.name = wire.name;
        self.callback_url = wire.callback_url;
        if let Some(access_type) = wire.access_type.filter(|a| !a.is_empty()) {
            self.access_type = AccessType::parse(&access_type)?;
        }
        self.status = wire.status;
        self.developer_id = wire.developer_id;
        if let Some(family) = wire.app_family.filter(|f| !f.is_empty()) {
            self.app_family = family;
        }
        self.scopes = wire.scopes;
        self.attributes = wire.attributes;
        self.created_at = wire.created_at;
        self.created_by = wire.created_by;
        self.modified_at = wire.last_modified_at;
        self.modified_by = wire.last_modified_by;

        if let Some(credential) = credential {
            self.consumer_key = credential.consumer_key.clone();
            self.consumer_secret = credential.consumer_secret.clone();
            self.credential_api_products = Some(credential.api_products.clone());
            self.credential_scopes = Some(credential.scopes.clone());
            self.credential_status = credential.status.clone();
            self.credential_attributes = credential.attributes.clone();
        }

        self.api_products = match wire.api_products {
            Some(products) => products,
            None => self.credential_product_names(),
        };
        Ok(())
    }

    /// Reset every field except the developer the app belongs to.
    pub fn blank_values(&mut self) {
        let developer_mail = std::mem::take(&mut self.developer_mail);
        *self = Self::new(self.client.clone(), developer_mail);
    }

    fn clear_credential(&mut self) {
        self.consumer_key.clear();
        self.consumer_secret.clear();
        self.credential_api_products = None;
        self.credential_scopes = None;
        self.credential_status.clear();
        self.credential_attributes.clear();
    }

    fn credential_product_names(&self) -> Vec<String> {
        self.credential_api_products
            .iter()
            .flatten()
            .map(|product| product.apiproduct.clone())
            .collect()
    }

    fn wire_body(&self, include_products: bool) -> Value {
        let mut obj = Map::new();
        obj.insert("name".into(), self.name.clone().into());
        obj.insert("callbackUrl".into(), self.callback_url.clone().into());
        obj.insert("attributes".into(), attributes_to_json(&self.attributes));
        if include_products {
            obj.insert("apiProducts".into(), self.api_products.clone().into());
        }
        obj.insert("appFamily".into(), self.app_family.clone().into());
        obj.insert("scopes".into(), self.scopes.clone().into());
        obj.insert("accessType".into(), self.access_type.as_str().into());
        Value::Object(obj)
    }

    // App fields

    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[must_use]
    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    pub fn set_callback_url(&mut self, url: impl Into<String>) {
        self.callback_url = url.into();
    }

    /// The description lives in the `description` attribute.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.get_attribute(DESCRIPTION_ATTRIBUTE)
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.set_attribute(DESCRIPTION_ATTRIBUTE, description);
    }

    #[must_use]
    pub fn access_type(&self) -> AccessType {
        self.access_type
    }

    pub fn set_access_type(&mut self, access_type: &str) -> Result<()> {
        self.access_type = AccessType::parse(access_type)?;
        Ok(())
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn developer_id(&self) -> &str {
        &self.developer_id
    }

    #[must_use]
    pub fn developer_mail(&self) -> &str {
        &self.developer_mail
    }

    #[must_use]
    pub fn app_family(&self) -> &str {
        &self.app_family
    }

    pub fn set_app_family(&mut self, family: impl Into<String>) {
        self.app_family = family.into();
    }

    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    #[must_use]
    pub fn api_products(&self) -> &[String] {
        &self.api_products
    }

    pub fn set_api_products(&mut self, products: Vec<String>) {
        self.api_products = products;
    }

    #[must_use]
    pub fn created_at(&self) -> Option<i64> {
        self.created_at
    }

    #[must_use]
    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    #[must_use]
    pub fn modified_at(&self) -> Option<i64> {
        self.modified_at
    }

    #[must_use]
    pub fn modified_by(&self) -> &str {
        &self.modified_by
    }

    // Attributes

    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|attr| attr.name == name)
    }

    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        set_in(&mut self.attributes, name, value.into());
    }

    // Active credential

    #[must_use]
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    #[must_use]
    pub fn consumer_secret(&self) -> &str {
        &self.consumer_secret
    }

    #[must_use]
    pub fn credential_api_products(&self) -> Option<&[CredentialApiProduct]> {
        self.credential_api_products.as_deref()
    }

    #[must_use]
    pub fn credential_scopes(&self) -> Option<&[String]> {
        self.credential_scopes.as_deref()
    }

    #[must_use]
    pub fn credential_status(&self) -> &str {
        &self.credential_status
    }

    #[must_use]
    pub fn credential_attributes(&self) -> &[Attribute] {
        &self.credential_attributes
    }

    #[must_use]
    pub fn get_credential_attribute(&self, name: &str) -> Option<&str> {
        self.credential_attributes
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    pub fn set_credential_attribute(&mut self, name: &str, value: impl Into<String>) {
        set_in(&mut self.credential_attributes, name, value.into());
    }

    pub fn clear_credential_attributes(&mut self) {
        self.credential_attributes.clear();
    }

    /// Whether the active credential is fully populated.
    #[must_use]
    pub fn has_credential_info(&self) -> bool {
        self.credential_api_products.is_some()
            && self.credential_scopes.is_some()
            && !self.consumer_key.is_empty()
            && !self.consumer_secret.is_empty()
            && !self.credential_status.is_empty()
    }
}

fn set_in(attributes: &mut Vec<Attribute>, name: &str, value: String) {
    match attributes.iter_mut().find(|attr| attr.name == name) {
        Some(attr) => attr.value = value,
        None => attributes.push(Attribute::new(name, value)),
    }
}

impl OrganizationAware for DeveloperApp {
    fn organisation(&self) -> &str {
        self.client.org_name()
    }

    fn set_organisation(&mut self, org_name: &str) {
        self.client = self.client.for_org(org_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgemgmt_client::{Credentials, OrgConfig, RetryConfig};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BASE: &str = "/o/acme/developers/dev@example.com/apps";

    fn client_for(uri: &str) -> ApiClient {
        let config = OrgConfig::new(uri, "acme", Credentials::new("ops", "secret"))
            .unwrap()
            .with_retry(RetryConfig::disabled());
        ApiClient::new(config).unwrap()
    }

    fn offline_app() -> DeveloperApp {
        DeveloperApp::new(client_for("https://mgmt.example"), "dev@example.com")
    }

    fn credential(key: &str, status: &str, issued_at: i64, expires_at: i64) -> Value {
        json!({
            "consumerKey": key,
            "consumerSecret": format!("{key}-secret"),
            "apiProducts": [{ "apiproduct": "weather", "status": "approved" }],
            "scopes": [],
            "status": status,
            "attributes": [{ "name": "tier", "value": key }],
            "issuedAt": issued_at,
            "expiresAt": expires_at
        })
    }

    fn app_json(credentials: Vec<Value>) -> Value {
        json!({
            "appId": "app-1",
            "name": "weather-app",
            "callbackUrl": "https://cb.example",
            "accessType": "write",
            "status": "approved",
            "developerId": "dev-1",
            "scopes": [],
            "attributes": [{ "name": "description", "value": "Forecasts" }],
            "createdAt": 1_700_000_000_000_i64,
            "createdBy": "ops",
            "lastModifiedAt": 1_700_000_100_000_i64,
            "lastModifiedBy": "ops",
            "credentials": credentials
        })
    }

    #[test]
    fn picks_latest_approved_unexpired_credential() {
        let mut app = offline_app();
        app.load_from_raw_data(&app_json(vec![
            credential("old", "approved", 1, -1),
            credential("newest-revoked", "revoked", 30, -1),
            credential("expired", "approved", 20, 5),
            credential("current", "approved", 10, -1),
        ]))
        .unwrap();
        assert_eq!(app.consumer_key(), "current");
        assert_eq!(app.consumer_secret(), "current-secret");
        assert_eq!(app.get_credential_attribute("tier"), Some("current"));
        assert_eq!(app.api_products(), ["weather"]);
        assert!(app.has_credential_info());
    }

    #[test]
    fn falls_back_to_most_recent_credential() {
        let mut app = offline_app();
        app.load_from_raw_data(&app_json(vec![
            credential("a", "revoked", 1, -1),
            credential("b", "pending", 2, -1),
        ]))
        .unwrap();
        assert_eq!(app.consumer_key(), "b");
        assert_eq!(app.credential_status(), "pending");
    }

    #[test]
    fn hydrates_app_fields() {
        let mut app = offline_app();
        app.load_from_raw_data(&app_json(Vec::new())).unwrap();
        assert_eq!(app.app_id(), "app-1");
        assert_eq!(app.access_type(), AccessType::Write);
        assert_eq!(app.description(), Some("Forecasts"));
        assert_eq!(app.app_family(), "default");
        assert_eq!(app.created_at(), Some(1_700_000_000_000));
        assert_eq!(app.modified_by(), "ops");
        assert!(!app.has_credential_info());
        assert!(app.credential_api_products().is_none());
    }

    #[test]
    fn attribute_helpers_replace_in_place() {
        let mut app = offline_app();
        app.set_attribute("color", "red");
        app.set_attribute("color", "blue");
        assert_eq!(app.attributes().len(), 1);
        assert!(app.has_attribute("color"));
        assert_eq!(app.get_attribute("color"), Some("blue"));
        assert_eq!(app.get_attribute("missing"), None);

        app.set_credential_attribute("k", "v");
        assert_eq!(app.credential_attributes().len(), 1);
        app.clear_credential_attributes();
        assert!(app.credential_attributes().is_empty());
    }

    #[test]
    fn blank_values_keeps_developer() {
        let mut app = offline_app();
        app.load_from_raw_data(&app_json(vec![credential("k", "approved", 1, -1)]))
            .unwrap();
        app.blank_values();
        assert_eq!(app.name(), "");
        assert_eq!(app.consumer_key(), "");
        assert_eq!(app.developer_mail(), "dev@example.com");
    }

    #[test]
    fn organisation_can_be_rescoped() {
        let mut app = offline_app();
        assert_eq!(app.organisation(), "acme");
        app.set_organisation("globex");
        assert_eq!(app.organisation(), "globex");
    }

    #[tokio::test]
    async fn validate_maps_not_found_to_false() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{BASE}/missing")))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("{BASE}/broken")))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let app = DeveloperApp::new(client_for(&server.uri()), "dev@example.com");
        assert!(!app.validate(Some("missing")).await.unwrap());
        assert!(app.validate(Some("broken")).await.is_err());
    }

    #[tokio::test]
    async fn save_creates_new_app() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{BASE}/weather-app")))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(BASE))
            .and(body_json(json!({
                "name": "weather-app",
                "callbackUrl": "",
                "attributes": [],
                "apiProducts": ["weather"],
                "appFamily": "default",
                "scopes": [],
                "accessType": "read"
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(app_json(vec![credential("new", "approved", 1, -1)])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut app = DeveloperApp::new(client_for(&server.uri()), "dev@example.com");
        app.set_name("weather-app");
        app.set_api_products(vec!["weather".to_string()]);
        app.save(false).await.unwrap();
        assert_eq!(app.app_id(), "app-1");
        assert_eq!(app.consumer_key(), "new");
    }

    #[tokio::test]
    async fn set_key_status_requires_key() {
        let mut app = offline_app();
        app.set_name("weather-app");
        let err = app.set_key_status(KeyAction::Approve, true).await.unwrap_err();
        assert!(matches!(err, ApiError::Parameter(_)));
    }

    #[tokio::test]
    async fn set_key_status_updates_products() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("{BASE}/weather-app/keys/k1")))
            .and(query_param("action", "revoke"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{BASE}/weather-app/keys/k1/apiproducts/weather")))
            .and(query_param("action", "revoke"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = DeveloperApp::new(client_for(&server.uri()), "dev@example.com");
        app.load_from_raw_data(&app_json(vec![credential("k1", "approved", 1, -1)]))
            .unwrap();
        app.set_key_status(false, true).await.unwrap();
        assert_eq!(app.credential_status(), "revoked");
        assert_eq!(app.credential_api_products().unwrap()[0].status, "revoked");
    }

    #[tokio::test]
    async fn create_key_rejects_blank_values() {
        let mut app = offline_app();
        app.set_name("weather-app");
        assert!(matches!(
            app.create_key("", "secret").await,
            Err(ApiError::Parameter(_))
        ));
    }

    #[tokio::test]
    async fn delete_key_clears_active_credential() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path(format!("{BASE}/weather-app/keys/k1")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = DeveloperApp::new(client_for(&server.uri()), "dev@example.com");
        app.load_from_raw_data(&app_json(vec![credential("k1", "approved", 1, -1)]))
            .unwrap();
        app.delete_key("k1").await.unwrap();
        assert_eq!(app.consumer_key(), "");
        assert!(app.credential_api_products().is_none());
    }

    #[tokio::test]
    async fn list_all_org_apps_resolves_developer_mail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/o/acme/apps"))
            .and(query_param("expand", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "app": [app_json(Vec::new())]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/o/acme/developers"))
            .and(query_param("expand", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "developer": [{ "developerId": "dev-1", "email": "dev@example.com" }]
            })))
            .mount(&server)
            .await;

        let app = DeveloperApp::new(client_for(&server.uri()), "");
        let apps = app.list_all_org_apps().await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].developer_mail(), "dev@example.com");
        assert_eq!(apps[0].name(), "weather-app");
    }
}
