//! Integration tests for the two-phase upload

use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ydsync_core::ports::{IRemoteStorage, OperationOutcome, StorageError};
use ydsync_disk::provider::DiskStorageProvider;
use ydsync_disk::{upload, DiskError};

use crate::common;

#[tokio::test]
async fn test_upload_streams_file_to_link() {
    let server = MockServer::start().await;
    common::mount_upload_link(&server, "notes.txt").await;

    Mock::given(method("PUT"))
        .and(path("/upload/notes.txt"))
        .and(header("Content-Type", "application/octet-stream"))
        .and(body_bytes(b"hello yandex".to_vec()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, file) = common::local_file("notes.txt", b"hello yandex");
    let provider = DiskStorageProvider::new(common::client_for(&server));

    let outcome = provider.upload(&file).await.expect("upload failed");
    assert_eq!(outcome, OperationOutcome::Uploaded);
}

#[tokio::test]
async fn test_upload_target_does_not_receive_oauth_header() {
    let server = MockServer::start().await;
    common::mount_upload_link(&server, "a.txt").await;
    common::mount_upload_target(&server, "a.txt", 201, "").await;

    let (_dir, file) = common::local_file("a.txt", b"x");
    let client = common::client_for(&server);
    upload::upload_file(&client, &file).await.expect("upload failed");

    let requests = server.received_requests().await.expect("recording enabled");
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .expect("PUT request sent");
    assert!(put.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_upload_payload_too_large() {
    let server = MockServer::start().await;
    common::mount_upload_link(&server, "movie.mkv").await;
    common::mount_upload_target(&server, "movie.mkv", 413, "").await;

    let (_dir, file) = common::local_file("movie.mkv", b"frames");
    let provider = DiskStorageProvider::new(common::client_for(&server));

    let err = provider.upload(&file).await.unwrap_err();
    assert_eq!(
        err,
        StorageError::FileTooLarge {
            name: "movie.mkv".to_string()
        }
    );
    assert!(err.to_string().contains("50 GB"));
}

#[tokio::test]
async fn test_upload_insufficient_storage() {
    let server = MockServer::start().await;
    common::mount_upload_link(&server, "a.bin").await;
    common::mount_upload_target(&server, "a.bin", 507, "").await;

    let (_dir, file) = common::local_file("a.bin", b"x");
    let provider = DiskStorageProvider::new(common::client_for(&server));

    let err = provider.upload(&file).await.unwrap_err();
    assert_eq!(
        err,
        StorageError::QuotaExceeded {
            name: "a.bin".to_string()
        }
    );
}

#[tokio::test]
async fn test_upload_server_error_is_transient() {
    let server = MockServer::start().await;
    common::mount_upload_link(&server, "a.bin").await;
    common::mount_upload_target(&server, "a.bin", 503, "try later").await;

    let (_dir, file) = common::local_file("a.bin", b"x");
    let provider = DiskStorageProvider::new(common::client_for(&server));

    let err = provider.upload(&file).await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(
        err,
        StorageError::ServerError {
            status: 503,
            message: "try later".to_string()
        }
    );
}

#[tokio::test]
async fn test_upload_unexpected_status() {
    let server = MockServer::start().await;
    common::mount_upload_link(&server, "a.bin").await;
    common::mount_upload_target(&server, "a.bin", 412, "precondition").await;

    let (_dir, file) = common::local_file("a.bin", b"x");
    let client = common::client_for(&server);

    let err = upload::upload_file(&client, &file).await.unwrap_err();
    assert!(matches!(
        err,
        DiskError::Unknown { status: 412, ref body } if body == "precondition"
    ));
}

#[tokio::test]
async fn test_upload_link_refused() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/disk/resources/upload"))
        .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
            "description": "Specified path \"disk:/Backup/a.bin\" points to existent directory.",
            "error": "DiskResourceAlreadyExistsError"
        })))
        .mount(&server)
        .await;

    let (_dir, file) = common::local_file("a.bin", b"x");
    let provider = DiskStorageProvider::new(common::client_for(&server));

    let err = provider.upload(&file).await.unwrap_err();
    match err {
        StorageError::Api { status, message } => {
            assert_eq!(status, 409);
            assert!(message.contains("existent directory"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_upload_missing_local_file_makes_no_requests() {
    let server = MockServer::start().await;
    let provider = DiskStorageProvider::new(common::client_for(&server));
    let dir = tempfile::tempdir().unwrap();

    let err = provider
        .upload(&dir.path().join("vanished.txt"))
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::Io(_)));

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());
}
