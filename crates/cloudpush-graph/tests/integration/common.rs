//! Shared test helpers for Graph API integration tests
//!
//! Provides wiremock-based mock server setup for the Graph drive endpoints
//! and the identity platform's device-code and token endpoints.

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cloudpush_core::config::AuthSettings;
use cloudpush_graph::client::GraphClient;

pub const TENANT: &str = "tenant-test-001";
pub const CLIENT: &str = "client-test-001";

/// Starts a mock server and returns a GraphClient pointing at it
pub async fn setup_graph_mock() -> (MockServer, GraphClient) {
    let server = MockServer::start().await;
    let client = GraphClient::with_base_url("test-access-token", server.uri());
    (server, client)
}

/// Auth settings matching the mounted identity endpoints
pub fn auth_settings() -> AuthSettings {
    AuthSettings {
        client_id: CLIENT.to_string(),
        tenant_id: TENANT.to_string(),
        scopes: vec!["Files.ReadWrite".to_string(), "offline_access".to_string()],
    }
}

/// Mounts `GET /me/drive/root:/{remote_path}` returning a file item whose
/// download URL points back at the mock server, plus the download itself.
pub async fn mount_drive_file(server: &MockServer, remote_path: &str, name: &str, content: &[u8]) {
    let item_path = format!("/me/drive/root:/{}", remote_path);
    let download_path = format!("/download/{}", name);

    Mock::given(method("GET"))
        .and(path(item_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "item-001",
            "name": name,
            "size": content.len(),
            "@microsoft.graph.downloadUrl": format!("{}{}", server.uri(), download_path),
            "file": {}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(download_path.as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(content.to_vec())
                .append_header("Content-Type", "application/octet-stream"),
        )
        .mount(server)
        .await;
}

/// Mounts the device authorization endpoint
pub async fn mount_device_code(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/{}/oauth2/v2.0/devicecode", TENANT).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "device_code": "device-code-xyz",
            "user_code": "ABCD-EFGH",
            "verification_uri": "https://microsoft.com/devicelogin",
            "expires_in": 900,
            "interval": 1,
            "message": "To sign in, use a web browser to open the page https://microsoft.com/devicelogin and enter the code ABCD-EFGH to authenticate."
        })))
        .mount(server)
        .await;
}

/// Mounts the token endpoint for a given grant type
pub async fn mount_token(server: &MockServer, grant_type: &str, access_token: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/{}/oauth2/v2.0/token", TENANT).as_str()))
        .and(body_string_contains(grant_type))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "scope": "Files.ReadWrite",
            "expires_in": 3600,
            "access_token": access_token,
            "refresh_token": "refresh-from-server"
        })))
        .mount(server)
        .await;
}
