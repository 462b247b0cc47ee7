//! Configuration file to working client

use std::fs;

use edgemgmt_api::Organization;
use edgemgmt_client::ApiClient;
use edgemgmt_config::{ConfigError, EdgeConfig};
use wiremock::MockServer;

use crate::common::{mount_get, organization_body};

fn write_config(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn config_file_drives_requests() {
    let server = MockServer::start().await;
    mount_get(&server, "/mint/organizations/acme", organization_body("acme")).await;

    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        &format!(
            r#"
            [connection]
            endpoint = "{}"
            organization = "acme"
            username = "ops"
            password = "secret"

            [cache]
            enabled = false

            [retry]
            max_retries = 0
            "#,
            server.uri()
        ),
    );

    let config = EdgeConfig::load_from(&path).unwrap().unwrap();
    let org_config = config.to_org_config_with(|_| None).unwrap();
    let mut org = Organization::new(ApiClient::new(org_config).unwrap());
    org.load(None).await.unwrap();
    assert_eq!(org.name(), Some("acme"));
}

#[test]
fn persisted_organization_is_used_next_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "[connection]\nendpoint = \"https://mgmt.example\"\norganization = \"acme\"\n",
    );

    EdgeConfig::persist_organization_to(&path, "globex").unwrap();

    let config = EdgeConfig::load_from(&path).unwrap().unwrap();
    let org_config = config
        .to_org_config_with(|name| match name {
            "EDGE_USERNAME" => Some("ops".to_string()),
            "EDGE_PASSWORD" => Some("secret".to_string()),
            _ => None,
        })
        .unwrap();
    assert_eq!(org_config.org_name(), "globex");
}

#[test]
fn invalid_endpoint_is_a_client_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "[connection]\nendpoint = \"ftp://mgmt.example\"\norganization = \"acme\"\nusername = \"u\"\npassword = \"p\"\n",
    );
    let config = EdgeConfig::load_from(&path).unwrap().unwrap();
    let err = config.to_org_config_with(|_| None).unwrap_err();
    assert!(matches!(err, ConfigError::Client(_)));
}
