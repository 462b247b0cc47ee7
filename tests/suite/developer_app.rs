//! Developer app lifecycle against a mock management API

use edgemgmt_api::{DeveloperApp, OrganizationAware};
use edgemgmt_types::KeyAction;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{DEVELOPER, app_body, client_for, mount_get};

const APPS: &str = "/o/acme/developers/dev@example.com/apps";

#[tokio::test]
async fn load_and_inspect() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        &format!("{APPS}/weather"),
        app_body("weather", "key-1", &["forecast", "alerts"]),
    )
    .await;

    let mut app = DeveloperApp::new(client_for(&server), DEVELOPER);
    app.load(Some("weather")).await.unwrap();

    assert_eq!(app.app_id(), "weather-id");
    assert_eq!(app.description(), Some("weather app"));
    assert_eq!(app.get_attribute("DisplayName"), Some("weather"));
    assert_eq!(app.api_products(), ["forecast", "alerts"]);
    assert_eq!(app.consumer_key(), "key-1");
    assert!(app.has_credential_info());
    assert_eq!(app.organisation(), "acme");
}

#[tokio::test]
async fn list_and_detail() {
    let server = MockServer::start().await;
    mount_get(&server, APPS, json!(["weather", "traffic"])).await;
    Mock::given(method("GET"))
        .and(path(APPS))
        .and(query_param("expand", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "app": [
                app_body("weather", "key-1", &["forecast"]),
                app_body("traffic", "key-2", &[])
            ]
        })))
        .with_priority(1)
        .mount(&server)
        .await;

    let app = DeveloperApp::new(client_for(&server), DEVELOPER);
    assert_eq!(app.get_list().await.unwrap(), ["weather", "traffic"]);

    let detail = app.get_list_detail(None).await.unwrap();
    assert_eq!(detail.len(), 2);
    assert_eq!(detail[1].consumer_key(), "key-2");
    assert_eq!(detail[1].developer_mail(), DEVELOPER);
}

#[tokio::test]
async fn update_reconciles_key_products() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        &format!("{APPS}/weather"),
        app_body("weather", "key-1", &["forecast", "alerts"]),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path(format!("{APPS}/weather")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(app_body("weather", "key-1", &["forecast", "alerts"])),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{APPS}/weather/keys/key-1")))
        .and(body_json(json!({ "apiProducts": ["radar"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{APPS}/weather/keys/key-1/apiproducts/alerts")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = DeveloperApp::new(client_for(&server), DEVELOPER);
    app.load(Some("weather")).await.unwrap();
    app.set_api_products(vec!["forecast".to_string(), "radar".to_string()]);
    app.set_callback_url("https://cb.example/new");
    app.save(false).await.unwrap();
}

#[tokio::test]
async fn update_without_product_changes_uses_put_response() {
    let server = MockServer::start().await;
    let mut updated = app_body("weather", "key-1", &["forecast"]);
    updated["callbackUrl"] = json!("https://cb.example/new");
    Mock::given(method("PUT"))
        .and(path(format!("{APPS}/weather")))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = DeveloperApp::new(client_for(&server), DEVELOPER);
    app.load_from_raw_data(&app_body("weather", "key-1", &["forecast"]))
        .unwrap();
    app.set_callback_url("https://cb.example/new");
    app.save(true).await.unwrap();
    assert_eq!(app.callback_url(), "https://cb.example/new");
    assert_eq!(app.consumer_key(), "key-1");
}

#[tokio::test]
async fn create_key_then_reload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{APPS}/weather/keys/create")))
        .and(body_json(json!({ "consumerKey": "key-2", "consumerSecret": "shh" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{APPS}/weather/keys/key-2")))
        .and(body_json(json!({ "apiProducts": ["forecast"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    let mut reloaded = app_body("weather", "key-2", &["forecast"]);
    reloaded["credentials"][0]["issuedAt"] = json!(1_800_000_000_000_i64);
    mount_get(&server, &format!("{APPS}/weather"), reloaded).await;

    let mut app = DeveloperApp::new(client_for(&server), DEVELOPER);
    app.load_from_raw_data(&app_body("weather", "key-1", &["forecast"]))
        .unwrap();
    app.create_key("key-2", "shh").await.unwrap();
    assert_eq!(app.consumer_key(), "key-2");
}

#[tokio::test]
async fn approve_key_only() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{APPS}/weather/keys/key-1")))
        .and(query_param("action", "approve"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = DeveloperApp::new(client_for(&server), DEVELOPER);
    let mut body = app_body("weather", "key-1", &["forecast"]);
    body["credentials"][0]["status"] = json!("revoked");
    app.load_from_raw_data(&body).unwrap();
    app.set_key_status(KeyAction::from_int(1).unwrap(), false)
        .await
        .unwrap();
    assert_eq!(app.credential_status(), "approved");
}

#[tokio::test]
async fn delete_blanks_current_app() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{APPS}/weather")))
        .respond_with(ResponseTemplate::new(200).set_body_json(app_body("weather", "k", &[])))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = DeveloperApp::new(client_for(&server), DEVELOPER);
    app.load_from_raw_data(&app_body("weather", "k", &[])).unwrap();
    app.delete(None).await.unwrap();
    assert_eq!(app.name(), "");
    assert_eq!(app.app_id(), "");
}
