//! Application Record API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{body_json, complete_draft, TestApp};

#[tokio::test]
async fn test_create_draft_applies_defaults() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/v1/applications",
            &json!({ "personal_info": { "full_name": "Jane Doe" } }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["status"], "DRAFT");
    assert_eq!(body["fields"]["service_type"]["number_of_applicants"], 1);
    assert_eq!(body["fields"]["service_type"]["visa_type"], "tourist");
    assert_eq!(body["fields"]["personal_info"]["full_name"], "Jane Doe");
    assert!(body["submitted_at"].is_null());
}

#[tokio::test]
async fn test_create_draft_rejects_malformed_present_field() {
    let app = TestApp::new();

    let response = app
        .post_json(
            "/api/v1/applications",
            &json!({ "personal_info": { "contact_info": { "email_address": "not-an-email" } } }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(
        body["errors"][0]["field"],
        "personal_info.contact_info.email_address"
    );
}

#[tokio::test]
async fn test_get_returns_created_record() {
    let app = TestApp::new();
    let id = app.create_draft(&json!({})).await;

    let response = app.get(&format!("/api/v1/applications/{}", id)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], id.as_str());
}

#[tokio::test]
async fn test_get_unknown_id_is_not_found() {
    let app = TestApp::new();

    let response = app
        .get(&format!("/api/v1/applications/{}", uuid::Uuid::new_v4()))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_id_is_rejected() {
    let app = TestApp::new();

    let response = app.get("/api/v1/applications/not-a-uuid").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_merges_and_clears_fields() {
    let app = TestApp::new();
    let id = app
        .create_draft(&json!({
            "service_type": { "visa_duration": "single", "purpose_of_visit": "Holiday" }
        }))
        .await;

    let response = app
        .patch_json(
            &format!("/api/v1/applications/{}", id),
            &json!({ "service_type": { "visa_duration": null, "number_of_applicants": 3 } }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let fields = &body_json(response).await["fields"]["service_type"];
    assert!(fields["visa_duration"].is_null());
    assert_eq!(fields["number_of_applicants"], 3);
    assert_eq!(fields["purpose_of_visit"], "Holiday");
}

#[tokio::test]
async fn test_submit_moves_draft_to_submitted() {
    let app = TestApp::new();
    let id = app.create_draft(&json!({})).await;
    let fields = serde_json::to_value(complete_draft()).unwrap();

    let response = app
        .post_json(&format!("/api/v1/applications/{}/submit", id), &fields)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "SUBMITTED");
    assert!(body["submitted_at"].is_string());
    assert_eq!(body["fields"], fields);
}

#[tokio::test]
async fn test_second_submit_conflicts() {
    let app = TestApp::new();
    let id = app.create_draft(&json!({})).await;
    let fields = serde_json::to_value(complete_draft()).unwrap();
    let uri = format!("/api/v1/applications/{}/submit", id);

    assert_eq!(app.post_json(&uri, &fields).await.status(), StatusCode::OK);
    let response = app.post_json(&uri, &fields).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_patch_after_submit_conflicts() {
    let app = TestApp::new();
    let id = app.create_draft(&json!({})).await;
    let fields = serde_json::to_value(complete_draft()).unwrap();
    app.post_json(&format!("/api/v1/applications/{}/submit", id), &fields)
        .await;

    let response = app
        .patch_json(
            &format!("/api/v1/applications/{}", id),
            &json!({ "personal_info": { "full_name": "Changed" } }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let record = body_json(app.get(&format!("/api/v1/applications/{}", id)).await).await;
    assert_eq!(record["fields"]["personal_info"]["full_name"], "Jane Doe");
}

#[tokio::test]
async fn test_submit_with_incomplete_fields_reports_each_field() {
    let app = TestApp::new();
    let id = app.create_draft(&json!({})).await;
    let mut draft = complete_draft();
    draft.personal_info.agreements.terms_and_conditions = false;
    draft.personal_info.file_uploads.portrait_photo = None;

    let response = app
        .post_json(
            &format!("/api/v1/applications/{}/submit", id),
            &serde_json::to_value(draft).unwrap(),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"personal_info.agreements.terms_and_conditions"));
    assert!(fields.contains(&"personal_info.file_uploads.portrait_photo"));

    let record = body_json(app.get(&format!("/api/v1/applications/{}", id)).await).await;
    assert_eq!(record["status"], "DRAFT");
}
