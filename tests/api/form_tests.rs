//! Form wizard tests over the same services the HTTP API uses

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use visa_intake::application::form::{ApplicationForm, FormError, FormStep};
use visa_intake::domain::{ApplicationStatus, DocumentSlot, LocalFile};

use crate::common::{body_json, complete_draft, png, TestApp};

#[tokio::test]
async fn test_saved_draft_is_visible_over_http() {
    let app = TestApp::new();
    let mut form = ApplicationForm::new(app.state.form_dependencies("applicant-1").unwrap(), None);
    form.update(|draft| draft.personal_info.full_name = "Jane Doe".into());

    let record = form.save_as_draft().await.unwrap();

    assert_eq!(form.application_id().unwrap(), Some(record.id));
    let response = app
        .get(&format!("/api/v1/applications/{}", record.id))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["fields"]["personal_info"]["full_name"],
        "Jane Doe"
    );
}

#[tokio::test]
async fn test_wizard_uploads_pending_files_and_submits() {
    let app = TestApp::new();
    let mut form = ApplicationForm::new(app.state.form_dependencies("applicant-1").unwrap(), None);
    form.update(|draft| *draft = complete_draft());
    form.set_file(
        DocumentSlot::PassportScan,
        Some(LocalFile::new("scan.png", "image/png", png(300, 300))),
    );
    form.set_file(
        DocumentSlot::PortraitPhoto,
        Some(LocalFile::new("photo.png", "image/png", png(400, 500))),
    );

    assert_eq!(form.next().unwrap(), FormStep::PersonalInfo);
    let record = form.submit().await.unwrap();

    assert_eq!(record.status, ApplicationStatus::Submitted);
    for slot in DocumentSlot::ALL {
        let url = record
            .fields
            .personal_info
            .file_uploads
            .get(slot)
            .and_then(|s| s.url())
            .unwrap();
        assert!(url.starts_with(&format!("/uploads/{}/", record.id)));
        assert_eq!(app.get(url).await.status(), StatusCode::OK);
    }
    assert_eq!(form.application_id().unwrap(), None);
}

#[tokio::test]
async fn test_wizard_blocks_invalid_first_step() {
    let app = TestApp::new();
    let mut form = ApplicationForm::new(app.state.form_dependencies("applicant-1").unwrap(), None);

    assert!(matches!(form.next(), Err(FormError::Validation(_))));
    assert_eq!(form.step(), FormStep::ServiceType);
}

#[tokio::test]
async fn test_wizard_restores_local_snapshot() {
    let app = TestApp::new();
    {
        let mut form = ApplicationForm::new(app.state.form_dependencies("applicant-1").unwrap(), None);
        form.update(|draft| draft.service_type.purpose_of_visit = "Conference".into());
        form.flush().await;
    }

    let restored = ApplicationForm::new(app.state.form_dependencies("applicant-1").unwrap(), None);

    assert_eq!(restored.draft().service_type.purpose_of_visit, "Conference");
}

#[tokio::test]
async fn test_sessions_edit_separate_records() {
    let app = TestApp::new();
    let mut alice = ApplicationForm::new(app.state.form_dependencies("alice").unwrap(), None);
    let mut bob = ApplicationForm::new(app.state.form_dependencies("bob").unwrap(), None);

    alice.update(|draft| draft.personal_info.full_name = "Alice".into());
    let alice_record = alice.save_as_draft().await.unwrap();
    bob.update(|draft| draft.personal_info.full_name = "Bob".into());
    let bob_record = bob.save_as_draft().await.unwrap();

    assert_ne!(alice_record.id, bob_record.id);
    assert_eq!(alice.application_id().unwrap(), Some(alice_record.id));
    assert_eq!(bob.application_id().unwrap(), Some(bob_record.id));

    let response = app
        .get(&format!("/api/v1/applications/{}", alice_record.id))
        .await;
    assert_eq!(
        body_json(response).await["fields"]["personal_info"]["full_name"],
        "Alice"
    );
}

#[tokio::test]
async fn test_path_like_session_is_rejected() {
    let app = TestApp::new();
    assert!(app.state.form_dependencies("../shared").is_err());
}
