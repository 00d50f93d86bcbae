//! Integration tests for remote directory listings

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ydsync_core::ports::{IRemoteStorage, StorageError};
use ydsync_disk::provider::DiskStorageProvider;
use ydsync_disk::resources;

use crate::common;

#[tokio::test]
async fn test_list_files_returns_files_only() {
    let server = MockServer::start().await;
    common::mount_listing(
        &server,
        serde_json::json!([
            {"name": "notes.txt", "type": "file", "modified": "2024-03-01T12:00:00+00:00"},
            {"name": "report.pdf", "type": "file", "modified": "2024-03-02T08:30:15+03:00"},
            {"name": "Photos", "type": "dir", "modified": "2024-03-01T12:00:00+00:00"}
        ]),
    )
    .await;

    let client = common::client_for(&server);
    let listing = resources::list_files(&client).await.expect("list failed");

    assert_eq!(listing.len(), 2);
    assert_eq!(listing["notes.txt"].to_string(), "2024-03-01 12:00:00");
    assert_eq!(listing["report.pdf"].to_string(), "2024-03-02 05:30:15");
    assert!(!listing.contains_key("Photos"));
}

#[tokio::test]
async fn test_list_files_sends_fields_limit_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/disk/resources"))
        .and(query_param("path", common::TEST_DIR))
        .and(query_param(
            "fields",
            "name,_embedded.items.name,_embedded.items.modified,_embedded.items.type",
        ))
        .and(query_param("limit", "25"))
        .and(header(
            "Authorization",
            format!("OAuth {}", common::TEST_TOKEN).as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_embedded": { "items": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::client_for(&server).with_list_limit(25);
    let listing = resources::list_files(&client).await.expect("list failed");
    assert!(listing.is_empty());
}

#[tokio::test]
async fn test_list_files_skips_unparseable_entries() {
    let server = MockServer::start().await;
    common::mount_listing(
        &server,
        serde_json::json!([
            {"name": "ok.txt", "type": "file", "modified": "2024-03-01T12:00:00+00:00"},
            {"name": "odd.txt", "type": "file", "modified": "sometime"}
        ]),
    )
    .await;

    let client = common::client_for(&server);
    let listing = resources::list_files(&client).await.expect("list failed");
    assert_eq!(listing.len(), 1);
    assert!(listing.contains_key("ok.txt"));
}

#[tokio::test]
async fn test_list_files_missing_directory_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/disk/resources"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Не удалось найти запрошенный ресурс.",
            "description": "Resource not found.",
            "error": "DiskNotFoundError"
        })))
        .mount(&server)
        .await;

    let provider = DiskStorageProvider::new(common::client_for(&server));
    let err = provider.list_files().await.unwrap_err();
    assert_eq!(
        err,
        StorageError::Api {
            status: 404,
            message: "Не удалось найти запрошенный ресурс.".to_string()
        }
    );
}

#[tokio::test]
async fn test_list_files_on_a_file_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/disk/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Backup"
        })))
        .mount(&server)
        .await;

    let provider = DiskStorageProvider::new(common::client_for(&server));
    let err = provider.list_files().await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidResponse(_)));
}
