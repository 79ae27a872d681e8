//! Application Form Wizard
//!
//! The applicant-side state machine over a [`VisaApplicationDraft`]:
//!
//! - **state_machine**: steps, gating, save-draft and submit orchestration
//! - **autosave**: debounced background writes of the draft snapshot
//! - **session**: local key-value persistence of the snapshot and record id
//!
//! [`VisaApplicationDraft`]: crate::domain::VisaApplicationDraft

pub mod autosave;
pub mod session;
pub mod state_machine;

pub use autosave::{Autosaver, DEFAULT_AUTOSAVE_DELAY};
pub use session::{FormSession, LocalStore, LocalStoreError, APPLICATION_ID_KEY, DRAFT_KEY};
pub use state_machine::{ApplicationForm, FormDependencies, FormError, FormStep};
