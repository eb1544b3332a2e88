//! Integration tests for OneDrive downloads
//!
//! Verifies path resolution, content retrieval and status error mapping
//! against a wiremock-based Graph API mock server.

use cloudpush_graph::{client::GraphClient, GraphError};
use tempfile::TempDir;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use crate::common;

// ============================================================================
// Download tests
// ============================================================================

#[tokio::test]
async fn test_download_file_writes_named_file() {
    let (server, client) = common::setup_graph_mock().await;
    let dest = TempDir::new().unwrap();

    let content = b"Hello, OneDrive! This is test content.";
    common::mount_drive_file(&server, "onedrive_test/Test.docx", "Test.docx", content).await;

    let saved = client
        .download_file("onedrive_test/Test.docx", dest.path())
        .await
        .expect("Download failed");

    assert_eq!(saved, dest.path().join("Test.docx"));
    assert_eq!(std::fs::read(&saved).unwrap(), content);
}

#[tokio::test]
async fn test_download_sends_bearer_token() {
    let server = MockServer::start().await;
    let dest = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/me/drive/root:/secret.txt"))
        .and(header("authorization", "Bearer scoped-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "secret.txt",
            "@microsoft.graph.downloadUrl": format!("{}/dl/secret", server.uri())
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/dl/secret"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"42".to_vec()))
        .mount(&server)
        .await;

    let client = GraphClient::with_base_url("scoped-token", server.uri());
    let saved = client.download_file("/secret.txt", dest.path()).await.unwrap();
    assert_eq!(std::fs::read(saved).unwrap(), b"42");
}

#[tokio::test]
async fn test_download_empty_file() {
    let (server, client) = common::setup_graph_mock().await;
    let dest = TempDir::new().unwrap();

    common::mount_drive_file(&server, "empty.bin", "empty.bin", &[]).await;

    let saved = client.download_file("empty.bin", dest.path()).await.unwrap();
    assert!(std::fs::read(saved).unwrap().is_empty());
}

// ============================================================================
// Error handling tests
// ============================================================================

#[tokio::test]
async fn test_download_returns_not_found_on_404() {
    let (server, client) = common::setup_graph_mock().await;
    let dest = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/me/drive/root:/nonexistent.txt"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {
                "code": "itemNotFound",
                "message": "Item not found"
            }
        })))
        .mount(&server)
        .await;

    let err = client
        .download_file("nonexistent.txt", dest.path())
        .await
        .unwrap_err();

    match err {
        GraphError::NotFound(body) => assert!(body.contains("itemNotFound")),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(std::fs::read_dir(dest.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_download_returns_unauthorized_on_401() {
    let (server, client) = common::setup_graph_mock().await;
    let dest = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/me/drive/root:/a.txt"))
        .respond_with(ResponseTemplate::new(401).set_body_string("expired"))
        .mount(&server)
        .await;

    let err = client.download_file("a.txt", dest.path()).await.unwrap_err();
    assert!(matches!(err, GraphError::Unauthorized(_)));
}

#[tokio::test]
async fn test_download_folder_is_invalid_response() {
    let (server, client) = common::setup_graph_mock().await;
    let dest = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/me/drive/root:/Documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Documents",
            "folder": { "childCount": 2 }
        })))
        .mount(&server)
        .await;

    let err = client
        .download_file("Documents", dest.path())
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_download_into_missing_destination_is_io_error() {
    let (server, client) = common::setup_graph_mock().await;
    let dest = TempDir::new().unwrap();

    common::mount_drive_file(&server, "b.txt", "b.txt", b"data").await;

    let err = client
        .download_file("b.txt", &dest.path().join("does-not-exist"))
        .await
        .unwrap_err();
    assert!(matches!(err, GraphError::Io(_)));
}
