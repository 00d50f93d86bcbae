//! Shared test helpers for Yandex Disk API integration tests
//!
//! Provides wiremock-based mock server setup for the `/v1/disk` endpoints.
//! Each helper mounts the necessary mock endpoints; [`setup_disk_mock`]
//! returns a DiskClient pointing at the mock server.

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ydsync_core::domain::RemoteDir;
use ydsync_disk::client::DiskClient;

/// Token every mock expects in the `Authorization` header
pub const TEST_TOKEN: &str = "test-oauth-token";

/// Remote directory used by every test client
pub const TEST_DIR: &str = "disk:/Backup/";

/// Starts a mock server and returns a (MockServer, DiskClient) tuple.
///
/// Pre-configured endpoints:
/// - GET /v1/disk/ → account quota (requires the OAuth header)
pub async fn setup_disk_mock() -> (MockServer, DiskClient) {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/disk/"))
        .and(header("Authorization", format!("OAuth {TEST_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "total_space": 10737418240_u64,
            "used_space": 1073741824_u64,
            "trash_size": 0,
            "is_paid": false
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    (server, client)
}

/// Builds a client for `server` without mounting anything
pub fn client_for(server: &MockServer) -> DiskClient {
    let dir = RemoteDir::new(TEST_DIR).expect("valid remote dir");
    DiskClient::with_base_url(TEST_TOKEN, &server.uri(), dir).expect("valid client")
}

/// Mounts a directory listing for [`TEST_DIR`] returning `items`.
pub async fn mount_listing(server: &MockServer, items: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/disk/resources"))
        .and(query_param("path", TEST_DIR))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Backup",
            "_embedded": { "items": items }
        })))
        .mount(server)
        .await;
}

/// Mounts the upload link endpoint for `name` pointing at `/upload/<name>`
/// on the same server.
pub async fn mount_upload_link(server: &MockServer, name: &str) {
    Mock::given(method("GET"))
        .and(path("/v1/disk/resources/upload"))
        .and(query_param("path", format!("{TEST_DIR}{name}").as_str()))
        .and(query_param("overwrite", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "href": format!("{}/upload/{}", server.uri(), name),
            "method": "PUT",
            "templated": false
        })))
        .mount(server)
        .await;
}

/// Mounts the upload target for `name` answering with `status`.
pub async fn mount_upload_target(server: &MockServer, name: &str, status: u16, body: &str) {
    Mock::given(method("PUT"))
        .and(path(format!("/upload/{name}").as_str()))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Writes a file into a fresh temp dir and returns (dir guard, file path).
pub fn local_file(name: &str, content: &[u8]) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let file = dir.path().join(name);
    std::fs::write(&file, content).expect("write local file");
    (dir, file)
}
