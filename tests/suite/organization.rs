//! Mint organization flows against a mock management API

use edgemgmt_api::Organization;
use edgemgmt_types::{BillingType, TaxModelType};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{client_for, mount_get, organization_body, uncached_client_for};

#[tokio::test]
async fn load_falls_back_to_configured_org() {
    let server = MockServer::start().await;
    mount_get(&server, "/mint/organizations/acme", organization_body("acme")).await;

    let mut org = Organization::new(client_for(&server));
    org.load(None).await.unwrap();

    assert_eq!(org.id(), "acme");
    assert_eq!(org.timezone(), "America/Chicago");
    assert_eq!(org.tax_model(), TaxModelType::Undisclosed);
    assert_eq!(org.supported_billing_type(), Some(BillingType::Prepaid));
    assert_eq!(org.addresses()[0].state.as_deref(), Some("IL"));
    assert_eq!(org.reg_no(), Some("REG-1"));
    assert_eq!(org.tax_reg_no(), None);
}

#[tokio::test]
async fn load_prefers_own_name_over_config() {
    let server = MockServer::start().await;
    mount_get(&server, "/mint/organizations/globex", organization_body("globex")).await;

    let mut org = Organization::new(uncached_client_for(&server));
    org.set_name("globex");
    org.load(None).await.unwrap();
    assert_eq!(org.id(), "globex");
}

#[tokio::test]
async fn cache_is_shared_between_entities() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mint/organizations/acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(organization_body("acme")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut first = Organization::new(client.clone());
    first.load(Some("acme")).await.unwrap();
    let mut second = Organization::new(client);
    second.load(Some("acme")).await.unwrap();
    assert_eq!(first.to_json(), second.to_json());
}

#[tokio::test]
async fn missing_organization_surfaces_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mint/organizations/ghost"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "mint.resourceDoesNotExist",
            "message": "Organization ghost does not exist"
        })))
        .mount(&server)
        .await;

    let mut org = Organization::new(client_for(&server));
    let err = org.load(Some("ghost")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn family_members_are_fully_hydrated() {
    let server = MockServer::start().await;
    let mut child = organization_body("acme-eu");
    child["parent"] = organization_body("acme");
    mount_get(
        &server,
        "/mint/organizations/acme/organization-family",
        json!({ "organization": [organization_body("acme"), child] }),
    )
    .await;

    let org = Organization::new(client_for(&server));
    let family = org.get_organization_family(Some("acme")).await.unwrap();
    assert_eq!(family.len(), 2);
    let child = &family["acme-eu"];
    assert_eq!(child.parent().map(Organization::id), Some("acme"));
    assert_eq!(child.description(), "acme-eu organization");
}

#[tokio::test]
async fn supported_currencies_cache_key_includes_children_flag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mint/organizations/acme/supported-currencies"))
        .and(query_param("include_children", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "supportedCurrency": [
                { "id": "usd", "name": "USD" },
                { "id": "eur", "name": "EUR", "organization": "acme-eu" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mint/organizations/acme/supported-currencies"))
        .and(query_param("include_children", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "supportedCurrency": [{ "id": "usd", "name": "USD" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let org = Organization::new(client_for(&server));
    let with_children = org.list_supported_currencies(None, true).await.unwrap();
    let without = org.list_supported_currencies(None, false).await.unwrap();
    let again = org.list_supported_currencies(None, true).await.unwrap();

    assert_eq!(with_children.len(), 2);
    assert_eq!(with_children[1].organization.as_deref(), Some("acme-eu"));
    assert_eq!(without.len(), 1);
    assert_eq!(again, with_children);
}

#[tokio::test]
async fn round_trips_through_json_representation() {
    let server = MockServer::start().await;
    mount_get(&server, "/mint/organizations/acme", organization_body("acme")).await;

    let mut org = Organization::new(client_for(&server));
    org.load(None).await.unwrap();

    let mut copy = Organization::new(client_for(&server));
    copy.load_from_raw_data(&org.to_json(), true).unwrap();
    assert_eq!(copy.to_json(), org.to_json());
}
