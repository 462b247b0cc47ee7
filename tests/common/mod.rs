//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use edgemgmt_client::{ApiClient, Credentials, MemoryCache, NoCache, OrgConfig, RetryConfig};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ORG: &str = "acme";
pub const DEVELOPER: &str = "dev@example.com";

/// Client for `server` with retries disabled and an in-memory cache.
pub fn client_for(server: &MockServer) -> ApiClient {
    let config = OrgConfig::new(server.uri(), ORG, Credentials::new("ops", "secret"))
        .expect("mock server uri is a valid endpoint")
        .with_retry(RetryConfig::disabled())
        .with_cache(Arc::new(MemoryCache::default()));
    ApiClient::new(config).expect("client builds")
}

/// Same as [`client_for`] but every cached GET goes to the server.
pub fn uncached_client_for(server: &MockServer) -> ApiClient {
    let config = OrgConfig::new(server.uri(), ORG, Credentials::new("ops", "secret"))
        .expect("mock server uri is a valid endpoint")
        .with_retry(RetryConfig::disabled())
        .with_cache(Arc::new(NoCache));
    ApiClient::new(config).expect("client builds")
}

/// A mint organization payload as returned by `GET /mint/organizations/{id}`.
pub fn organization_body(id: &str) -> Value {
    json!({
        "address": [{
            "address1": "1 Main St",
            "city": "Springfield",
            "country": "US",
            "state": "IL",
            "zip": "62701",
            "isPrimary": true
        }],
        "approveTrusted": false,
        "approveUntrusted": false,
        "billingCycle": "CALENDAR_MONTH",
        "country": "US",
        "currency": "USD",
        "description": format!("{id} organization"),
        "groupOrganization": false,
        "hasBroker": false,
        "hasSelfBilling": false,
        "hasSeparateInvoiceForProduct": false,
        "id": id,
        "issueNettingStmt": false,
        "logoUrl": format!("https://cdn.example/{id}.png"),
        "name": id,
        "nettingStmtPerCurrency": false,
        "regNo": "REG-1",
        "selfBillingAsExchOrg": false,
        "selfBillingForAllDev": false,
        "separateInvoiceForFees": false,
        "status": "ACTIVE",
        "supportedBillingType": "PREPAID",
        "taxModel": "UNDISCLOSED",
        "taxNexus": "US",
        "timezone": "America/Chicago"
    })
}

/// A developer app payload with one approved credential.
pub fn app_body(name: &str, consumer_key: &str, products: &[&str]) -> Value {
    let products: Vec<Value> = products
        .iter()
        .map(|p| json!({ "apiproduct": p, "status": "approved" }))
        .collect();
    json!({
        "appId": format!("{name}-id"),
        "name": name,
        "callbackUrl": "https://cb.example/return",
        "status": "approved",
        "developerId": "dev-1",
        "appFamily": "default",
        "scopes": [],
        "attributes": [
            { "name": "description", "value": format!("{name} app") },
            { "name": "DisplayName", "value": name }
        ],
        "createdAt": 1_700_000_000_000_i64,
        "createdBy": "ops",
        "lastModifiedAt": 1_700_000_100_000_i64,
        "lastModifiedBy": "ops",
        "credentials": [{
            "consumerKey": consumer_key,
            "consumerSecret": format!("{consumer_key}-secret"),
            "apiProducts": products,
            "scopes": [],
            "status": "approved",
            "attributes": [],
            "issuedAt": 1_700_000_000_000_i64,
            "expiresAt": -1
        }]
    })
}

/// Mount `GET {route}` answering `body`.
pub async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
