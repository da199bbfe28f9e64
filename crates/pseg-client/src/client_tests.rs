//! Tests for the prediction client against a mock service.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::client::PredictionClient;
use crate::config::{PredictionClientConfig, StatusPolicy};
use crate::error::PredictionError;
use crate::segmentation::SegmentationOutcome;
use crate::types::SelectedFile;

// =============================================================================
// Test Helpers
// =============================================================================

fn client_for(server: &MockServer, policy: StatusPolicy) -> PredictionClient {
    let config = PredictionClientConfig::new(server.uri())
        .with_timeout(Duration::from_secs(5))
        .with_status_policy(policy);
    PredictionClient::new(config).unwrap()
}

fn road_jpg() -> SelectedFile {
    SelectedFile::new("road.jpg", b"0123456789ab".to_vec())
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

async fn mount_predict(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

// =============================================================================
// Success Path
// =============================================================================

#[tokio::test]
async fn test_submit_returns_json_body() {
    let server = MockServer::start().await;
    let body = json!({ "mask_url": "https://cdn.example.com/mask123.png" });
    mount_predict(&server, ResponseTemplate::new(200).set_body_json(body.clone())).await;

    let client = client_for(&server, StatusPolicy::Strict);
    let value = client.submit(road_jpg()).await.unwrap();

    assert_eq!(value, body);
    assert_eq!(value["mask_url"], "https://cdn.example.com/mask123.png");
}

#[tokio::test]
async fn test_submit_sends_single_file_part() {
    let server = MockServer::start().await;
    mount_predict(&server, ResponseTemplate::new(200).set_body_json(json!({}))).await;

    let client = client_for(&server, StatusPolicy::Strict);
    client.submit(road_jpg()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body = &requests[0].body;
    assert!(contains(
        body,
        br#"Content-Disposition: form-data; name="file"; filename="road.jpg""#
    ));
    assert!(contains(body, b"Content-Type: image/jpeg"));
    assert!(contains(body, b"0123456789ab"));
    assert_eq!(
        body.windows(b"Content-Disposition".len())
            .filter(|w| *w == b"Content-Disposition")
            .count(),
        1
    );
}

#[tokio::test]
async fn test_empty_file_is_still_sent() {
    let server = MockServer::start().await;
    mount_predict(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "detail": "Invalid image file" })),
    )
    .await;

    let client = client_for(&server, StatusPolicy::Strict);
    let value = client
        .submit(SelectedFile::new("empty.png", Vec::new()))
        .await
        .unwrap();
    assert_eq!(value["detail"], "Invalid image file");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(contains(
        &requests[0].body,
        b"filename=\"empty.png\"\r\nContent-Type: image/png\r\n\r\n\r\n"
    ));
}

#[tokio::test]
async fn test_non_object_json_is_returned_as_is() {
    let server = MockServer::start().await;
    mount_predict(&server, ResponseTemplate::new(200).set_body_string("[1, 2.5, null]")).await;

    let client = client_for(&server, StatusPolicy::Strict);
    let value = client.submit(road_jpg()).await.unwrap();
    assert_eq!(value, json!([1, 2.5, null]));
}

// =============================================================================
// Failure Kinds
// =============================================================================

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // Reserve a port, then release it so nothing is listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = PredictionClientConfig::new(format!("http://127.0.0.1:{}", port))
        .with_timeout(Duration::from_secs(5));
    let client = PredictionClient::new(config).unwrap();

    let err = client.submit(road_jpg()).await.unwrap_err();
    assert!(err.is_transport(), "expected transport error, got {:?}", err);
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = PredictionClientConfig::new(server.uri())
        .with_timeout(Duration::from_millis(200));
    let client = PredictionClient::new(config).unwrap();

    match client.submit(road_jpg()).await {
        Err(PredictionError::Transport(e)) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let server = MockServer::start().await;
    mount_predict(&server, ResponseTemplate::new(200).set_body_string("not json")).await;

    let client = client_for(&server, StatusPolicy::Strict);
    let err = client.submit(road_jpg()).await.unwrap_err();
    assert!(err.is_decode(), "expected decode error, got {:?}", err);
}

// =============================================================================
// Status Policy
// =============================================================================

#[tokio::test]
async fn test_lenient_returns_error_json_as_success() {
    let server = MockServer::start().await;
    let body = json!({ "error": "server error" });
    mount_predict(&server, ResponseTemplate::new(500).set_body_json(body.clone())).await;

    let client = client_for(&server, StatusPolicy::Lenient);
    let value = client.submit(road_jpg()).await.unwrap();
    assert_eq!(value, body);
}

#[tokio::test]
async fn test_lenient_non_json_error_is_decode_error() {
    let server = MockServer::start().await;
    mount_predict(&server, ResponseTemplate::new(502).set_body_string("Bad Gateway")).await;

    let client = client_for(&server, StatusPolicy::Lenient);
    let err = client.submit(road_jpg()).await.unwrap_err();
    assert!(err.is_decode());
}

#[tokio::test]
async fn test_strict_rejects_error_status() {
    let server = MockServer::start().await;
    mount_predict(
        &server,
        ResponseTemplate::new(500).set_body_json(json!({ "error": "server error" })),
    )
    .await;

    let client = client_for(&server, StatusPolicy::Strict);
    let err = client.submit(road_jpg()).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    match err {
        PredictionError::Status { detail, .. } => {
            assert_eq!(detail, r#"{"error":"server error"}"#)
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_strict_surfaces_fastapi_detail() {
    let server = MockServer::start().await;
    mount_predict(
        &server,
        ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Unsupported file type. Allowed: ['image/jpeg', 'image/png', 'image/jpg']"
        })),
    )
    .await;

    let client = client_for(&server, StatusPolicy::Strict);
    let err = client
        .submit(SelectedFile::new("notes.txt", b"hello".to_vec()))
        .await
        .unwrap_err();

    match err {
        PredictionError::Status { status, detail } => {
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(detail.starts_with("Unsupported file type"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

// =============================================================================
// Segmentation View
// =============================================================================

#[tokio::test]
async fn test_submit_segmentation_decodes_images() {
    let server = MockServer::start().await;
    let png = format!("data:image/png;base64,{}", STANDARD.encode(b"\x89PNG"));
    mount_predict(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({
            "original_image": png,
            "segmentation_image": png,
            "predicted_labels": "Pothole"
        })),
    )
    .await;

    let client = client_for(&server, StatusPolicy::Strict);
    let outcome = client.submit_segmentation(road_jpg()).await.unwrap();

    match outcome {
        SegmentationOutcome::Segmented(result) => {
            assert_eq!(result.predicted_labels, "Pothole");
            assert_eq!(result.segmentation_image.bytes, b"\x89PNG");
        }
        other => panic!("expected segmentation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_submit_segmentation_no_detection() {
    let server = MockServer::start().await;
    mount_predict(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({ "detail": "No potholes detected" })),
    )
    .await;

    let client = client_for(&server, StatusPolicy::Strict);
    let outcome = client.submit_segmentation(road_jpg()).await.unwrap();
    assert_eq!(
        outcome,
        SegmentationOutcome::Detail("No potholes detected".to_string())
    );
    assert!(!outcome.is_segmented());
}
