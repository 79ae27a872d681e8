//! Document Upload API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{body_bytes, body_json, png, Part, TestApp};

fn file_part(file_name: &'static str, content_type: &'static str, bytes: Vec<u8>) -> Part<'static> {
    Part::File {
        name: "file",
        file_name,
        content_type,
        bytes,
    }
}

#[tokio::test]
async fn test_upload_stores_file_and_serves_it() {
    let app = TestApp::new();
    let id = app.create_draft(&json!({})).await;
    let bytes = png(400, 500);

    let response = app
        .post_multipart(
            "/api/v1/uploads",
            &[
                file_part("photo.png", "image/png", bytes.clone()),
                Part::Text("application_id", &id),
                Part::Text("slot", "portrait_photo"),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let url = body["url"].as_str().unwrap().to_string();
    assert!(url.starts_with(&format!("/uploads/{}/", id)));
    assert_eq!(body["file_size"], bytes.len() as u64);

    let served = app.get(&url).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(body_bytes(served).await, bytes);
}

#[tokio::test]
async fn test_upload_rejects_unsupported_type() {
    let app = TestApp::new();

    let response = app
        .post_multipart(
            "/api/v1/uploads",
            &[file_part("scan.pdf", "application/pdf", b"%PDF-1.4".to_vec())],
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(
        body_json(response).await["message"],
        "Only JPG, JPEG, and PNG files are allowed"
    );
}

#[tokio::test]
async fn test_portrait_checks_only_apply_to_photo_slot() {
    let app = TestApp::new();

    let wide = || file_part("wide.png", "image/png", png(600, 300));

    let as_scan = app
        .post_multipart(
            "/api/v1/uploads",
            &[wide(), Part::Text("slot", "passport_scan")],
        )
        .await;
    assert_eq!(as_scan.status(), StatusCode::OK);

    let as_photo = app
        .post_multipart(
            "/api/v1/uploads",
            &[wide(), Part::Text("slot", "portrait_photo")],
        )
        .await;
    assert_eq!(as_photo.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(as_photo).await["message"],
        "Photo should be square (1:1) or portrait (4:5) format for passport photos"
    );
}

#[tokio::test]
async fn test_upload_without_file_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .post_multipart("/api/v1/uploads", &[Part::Text("slot", "passport_scan")])
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No file provided");
}

#[tokio::test]
async fn test_upload_with_unknown_slot_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .post_multipart(
            "/api/v1/uploads",
            &[
                Part::Text("slot", "selfie"),
                file_part("a.png", "image/png", png(300, 300)),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_local_file() {
    let app = TestApp::new();
    let upload = app
        .post_multipart(
            "/api/v1/uploads",
            &[file_part("scan.png", "image/png", png(300, 300))],
        )
        .await;
    let url = body_json(upload).await["url"].as_str().unwrap().to_string();

    let first = app
        .post_json("/api/v1/uploads/delete", &json!({ "url": url }))
        .await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(body_json(first).await["deleted"], true);

    let second = app
        .post_json("/api/v1/uploads/delete", &json!({ "url": url }))
        .await;
    assert_eq!(body_json(second).await["deleted"], false);
}

#[tokio::test]
async fn test_delete_external_url_is_a_no_op() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/v1/uploads/delete",
            &json!({ "url": "https://cdn.example.com/uploads/a.png" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["deleted"], true);
}

#[tokio::test]
async fn test_delete_requires_url() {
    let app = TestApp::new();

    let response = app
        .post_json("/api/v1/uploads/delete", &json!({ "url": "" }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
