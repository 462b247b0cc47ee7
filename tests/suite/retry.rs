//! Retry behaviour seen through entity operations

use std::sync::Arc;
use std::time::Duration;

use edgemgmt_api::{ApiError, Organization};
use edgemgmt_client::{ApiClient, Credentials, NoCache, OrgConfig, RetryConfig};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{ORG, organization_body};

fn fast_retry_client(server: &MockServer) -> ApiClient {
    let config = OrgConfig::new(server.uri(), ORG, Credentials::new("ops", "secret"))
        .unwrap()
        .with_retry(RetryConfig {
            max_retries: 2,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            jitter_factor: 0.0,
        })
        .with_cache(Arc::new(NoCache));
    ApiClient::new(config).unwrap()
}

#[tokio::test]
async fn transient_failure_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mint/organizations/acme"))
        .and(header("x-retry-count", "0"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mint/organizations/acme"))
        .and(header("x-retry-count", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(organization_body("acme")))
        .expect(1)
        .mount(&server)
        .await;

    let mut org = Organization::new(fast_retry_client(&server));
    org.load(None).await.unwrap();
    assert_eq!(org.id(), "acme");
}

#[tokio::test]
async fn conflict_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mint/organizations/acme/prepaid-balance-reports"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "code": "conflict" })))
        .expect(1)
        .mount(&server)
        .await;

    let org = Organization::new(fast_retry_client(&server));
    let err = org
        .get_prepaid_balance_report("june", 2024, "dev-1", "usd")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Response { .. }));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(409));
}

#[tokio::test]
async fn exhausted_retries_report_last_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/organizations"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let org = Organization::new(fast_retry_client(&server));
    let err = org.list_organization_identifiers().await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(502));
}
