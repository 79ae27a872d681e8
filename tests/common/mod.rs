//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

#![allow(dead_code)]

use std::io::Cursor;

use axum::{
    body::{to_bytes, Body},
    http::Request,
    response::Response,
    Router,
};
use chrono::{Datelike, Days, NaiveDate, Utc};
use image::{ImageBuffer, ImageFormat, Rgb};
use tempfile::TempDir;
use tower::ServiceExt;

use visa_intake::config::Settings;
use visa_intake::domain::{
    FileSlot, ProcessingTime, VisaApplicationDraft, VisaDuration, VisaType,
};
use visa_intake::startup::{build_router, AppState};

pub const BOUNDARY: &str = "visa-intake-test-boundary";

/// Test application on the in-memory record store, with local storage in a
/// temporary directory.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub root: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();

        let mut settings = Settings::defaults().unwrap();
        settings.storage.local_root = root.path().join("public");
        settings.autosave.local_store_dir = root.path().join("local-store");
        settings.autosave.debounce_ms = 20;

        let state = AppState::in_memory(settings).unwrap();
        Self {
            router: build_router(state.clone()),
            state,
            root,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: &serde_json::Value) -> Response {
        self.send(json_request("POST", uri, body)).await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch_json(&self, uri: &str, body: &serde_json::Value) -> Response {
        self.send(json_request("PATCH", uri, body)).await
    }

    /// Make a multipart POST request
    pub async fn post_multipart(&self, uri: &str, parts: &[Part<'_>]) -> Response {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(
                    "Content-Type",
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(multipart_body(parts)))
                .unwrap(),
        )
        .await
    }

    /// Create a draft and return its id
    pub async fn create_draft(&self, body: &serde_json::Value) -> String {
        let response = self.post_json("/api/v1/applications", body).await;
        assert_eq!(response.status(), 201);
        body_json(response).await["id"].as_str().unwrap().to_string()
    }
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Read a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as raw bytes
pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

/// One part of a multipart body
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: Vec<u8>,
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Encode a blank PNG of the given size
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(width, height);
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// A draft that passes every rule, with both documents already uploaded
pub fn complete_draft() -> VisaApplicationDraft {
    let today = today();
    let entry = today + Days::new(30);
    let mut draft = VisaApplicationDraft::default();

    let st = &mut draft.service_type;
    st.visa_type = VisaType::Tourist;
    st.visa_duration = Some(VisaDuration::MultipleThreeMonths);
    st.purpose_of_visit = "Holiday".into();
    st.entry_date = Some(entry);
    st.exit_date = Some(entry + Days::new(14));
    st.processing_time = Some(ProcessingTime::Normal);

    let pi = &mut draft.personal_info;
    pi.full_name = "Jane Doe".into();
    pi.date_of_birth = NaiveDate::from_ymd_opt(today.year() - 30, 3, 1);
    pi.nationality = "Canada".into();
    pi.passport_number = "AB1234567".into();
    pi.passport_issue_date = Some(today - Days::new(365));
    pi.passport_expiry_date = Some(today + Days::new(3650));
    pi.passport_issuing_country = "Canada".into();
    pi.contact_info.full_name = "Jane Doe".into();
    pi.contact_info.phone_number = "+1 555 123 4567".into();
    pi.contact_info.email_address = "jane@example.com".into();
    pi.contact_info.current_address = "1 Main St, Toronto".into();
    pi.contact_info.vietnam_address = "2 Le Loi, Hanoi".into();
    pi.emergency_contact.full_name = "John Doe".into();
    pi.emergency_contact.phone_number = "+1 555 765 4321".into();
    pi.emergency_contact.email_address = "john@example.com".into();
    pi.emergency_contact.relationship = "Brother".into();
    pi.file_uploads.passport_scan = Some(FileSlot::Uploaded("/uploads/scan.png".into()));
    pi.file_uploads.portrait_photo = Some(FileSlot::Uploaded("/uploads/photo.png".into()));
    pi.agreements.information_confirmation = true;
    pi.agreements.terms_and_conditions = true;
    draft
}
