//! Pricing and Catalog API Tests

use axum::http::StatusCode;
use chrono::Days;
use pretty_assertions::assert_eq;

use crate::common::{body_json, today, TestApp};

#[tokio::test]
async fn test_quote_for_complete_selection() {
    let app = TestApp::new();

    let response = app
        .get("/api/v1/pricing/quote?visa_type=business&visa_duration=multiple-1year&processing_time=emergency&number_of_applicants=2")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["formatted_total"], "$560.00");
    assert_eq!(body["number_of_applicants"], 2);

    let delivery = (today() + Days::new(1)).format("%Y-%m-%d").to_string();
    assert_eq!(body["estimated_delivery_date"], delivery);
}

#[tokio::test]
async fn test_quote_for_unfinished_selection_is_zero() {
    let app = TestApp::new();

    let response = app.get("/api/v1/pricing/quote?visa_type=tourist").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["formatted_total"], "$0.00");
    assert_eq!(body["number_of_applicants"], 1);
}

#[tokio::test]
async fn test_quote_for_duration_not_offered_is_zero() {
    let app = TestApp::new();

    let response = app
        .get("/api/v1/pricing/quote?visa_type=transit&visa_duration=multiple-1year&processing_time=normal")
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["formatted_total"], "$0.00");
}

#[tokio::test]
async fn test_quote_rejects_unknown_codes() {
    let app = TestApp::new();

    let visa = app.get("/api/v1/pricing/quote?visa_type=cruise").await;
    assert_eq!(visa.status(), StatusCode::BAD_REQUEST);

    let tier = app
        .get("/api/v1/pricing/quote?visa_type=tourist&processing_time=overnight")
        .await;
    assert_eq!(tier.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quote_rejects_applicant_count_out_of_range() {
    let app = TestApp::new();

    let response = app
        .get("/api/v1/pricing/quote?visa_type=tourist&number_of_applicants=11")
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"][0]["field"], "number_of_applicants");
}

#[tokio::test]
async fn test_catalog_lists_options() {
    let app = TestApp::new();

    let response = app.get("/api/v1/catalog").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["visa_options"].as_array().unwrap().len(), 4);
    assert_eq!(body["processing_times"].as_array().unwrap().len(), 6);
}
