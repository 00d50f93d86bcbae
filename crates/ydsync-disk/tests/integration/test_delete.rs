//! Integration tests for remote deletion

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ydsync_core::ports::{IRemoteStorage, OperationOutcome, StorageError};
use ydsync_disk::provider::DiskStorageProvider;

use crate::common;

#[tokio::test]
async fn test_delete_file_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/disk/resources"))
        .and(query_param("path", "disk:/Backup/old.txt"))
        .and(header(
            "Authorization",
            format!("OAuth {}", common::TEST_TOKEN).as_str(),
        ))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let provider = DiskStorageProvider::new(common::client_for(&server));
    let outcome = provider.delete("old.txt").await.expect("delete failed");
    assert_eq!(outcome, OperationOutcome::Deleted);
}

#[tokio::test]
async fn test_delete_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/disk/resources"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "message": "Ресурс не найден.",
            "description": "Resource not found.",
            "error": "DiskNotFoundError"
        })))
        .mount(&server)
        .await;

    let provider = DiskStorageProvider::new(common::client_for(&server));
    let err = provider.delete("gone.txt").await.unwrap_err();
    assert_eq!(
        err,
        StorageError::Api {
            status: 404,
            message: "Ресурс не найден.".to_string()
        }
    );
}

#[tokio::test]
async fn test_delete_async_operation_is_not_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/disk/resources"))
        .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
            "href": "https://cloud-api.yandex.net/v1/disk/operations/abc",
            "method": "GET",
            "templated": false
        })))
        .mount(&server)
        .await;

    let provider = DiskStorageProvider::new(common::client_for(&server));
    let err = provider.delete("big-folder-file.bin").await.unwrap_err();
    assert!(matches!(err, StorageError::Api { status: 202, .. }));
}

#[tokio::test]
async fn test_delete_rejects_nested_name() {
    let server = MockServer::start().await;
    let provider = DiskStorageProvider::new(common::client_for(&server));

    let err = provider.delete("sub/file.txt").await.unwrap_err();
    assert!(matches!(err, StorageError::Io(_)));
}
