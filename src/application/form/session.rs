//! Local persistence for the wizard.
//!
//! A [`LocalStore`] is a small string key-value store on the applicant's
//! side. [`FormSession`] keeps the draft snapshot and the id of the server
//! record being edited in it, under fixed keys.

use std::sync::Arc;

use uuid::Uuid;

/// Key of the serialized draft snapshot.
pub const DRAFT_KEY: &str = "visa-application-draft";
/// Key of the server record id the wizard is editing.
pub const APPLICATION_ID_KEY: &str = "current-application-id";

/// Local store errors
#[derive(Debug, thiserror::Error)]
pub enum LocalStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// String key-value persistence.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

    fn set(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), LocalStoreError>;
}

/// The wizard's view of local persistence.
#[derive(Clone)]
pub struct FormSession {
    store: Arc<dyn LocalStore>,
}

impl FormSession {
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Id of the record being edited. An unparseable stored value is
    /// treated as absent.
    pub fn application_id(&self) -> Result<Option<Uuid>, LocalStoreError> {
        let Some(raw) = self.store.get(APPLICATION_ID_KEY)? else {
            return Ok(None);
        };

        match Uuid::parse_str(raw.trim()) {
            Ok(id) => Ok(Some(id)),
            Err(_) => {
                tracing::warn!(value = %raw, "Ignoring malformed stored application id");
                Ok(None)
            }
        }
    }

    pub fn set_application_id(&self, id: Uuid) -> Result<(), LocalStoreError> {
        self.store.set(APPLICATION_ID_KEY, &id.to_string())
    }

    pub fn forget_application_id(&self) -> Result<(), LocalStoreError> {
        self.store.remove(APPLICATION_ID_KEY)
    }

    pub fn load_draft(&self) -> Result<Option<String>, LocalStoreError> {
        self.store.get(DRAFT_KEY)
    }

    pub fn save_draft(&self, snapshot: &str) -> Result<(), LocalStoreError> {
        self.store.set(DRAFT_KEY, snapshot)
    }

    /// Drop both the snapshot and the record id.
    pub fn clear(&self) -> Result<(), LocalStoreError> {
        self.store.remove(DRAFT_KEY)?;
        self.store.remove(APPLICATION_ID_KEY)
    }
}
