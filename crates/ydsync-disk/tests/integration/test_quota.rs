//! Integration tests for the account quota endpoint

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ydsync_core::config::ErrorMessageField;
use ydsync_core::ports::{IRemoteStorage, StorageError};
use ydsync_disk::provider::DiskStorageProvider;
use ydsync_disk::DiskError;

use crate::common;

#[tokio::test]
async fn test_get_quota_returns_usage() {
    let (_server, client) = common::setup_disk_mock().await;

    let quota = client.get_quota().await.expect("get_quota failed");

    assert_eq!(quota.total_space, 10_737_418_240);
    assert_eq!(quota.used_space, 1_073_741_824);
    assert_eq!(quota.free_space(), 9_663_676_416);
}

#[tokio::test]
async fn test_get_quota_through_provider() {
    let (_server, client) = common::setup_disk_mock().await;
    let provider = DiskStorageProvider::new(client);

    let quota = provider.get_quota().await.expect("get_quota failed");
    assert_eq!(quota.total_space, 10_737_418_240);
}

#[tokio::test]
async fn test_get_quota_unauthorized_uses_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/disk/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Не авторизован.",
            "description": "Unauthorized",
            "error": "UnauthorizedError"
        })))
        .mount(&server)
        .await;

    let client = common::client_for(&server);
    let err = client.get_quota().await.unwrap_err();
    match err {
        DiskError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Не авторизован.");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let client = common::client_for(&server).with_error_message_field(ErrorMessageField::Description);
    let provider = DiskStorageProvider::new(client);
    let err = provider.get_quota().await.unwrap_err();
    assert_eq!(
        err,
        StorageError::Api {
            status: 401,
            message: "Unauthorized".to_string()
        }
    );
}

#[tokio::test]
async fn test_get_quota_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/disk/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = common::client_for(&server);
    let err = client.get_quota().await.unwrap_err();
    assert!(matches!(err, DiskError::InvalidResponse(_)));
}
