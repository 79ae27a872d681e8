//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::application::form::{FormDependencies, FormSession, LocalStoreError};
use crate::application::services::{ApplicationService, ApplicationServiceImpl, FileUploadClient};
use crate::config::Settings;
use crate::infrastructure::local_store::FileLocalStore;
use crate::infrastructure::repositories::{InMemoryApplicationRepository, PgApplicationRepository};
use crate::infrastructure::{database, storage};
use crate::presentation::http::{handlers, routes};
use crate::presentation::middleware::{create_cors_layer, create_trace_layer};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub applications: Arc<dyn ApplicationService>,
    pub uploader: FileUploadClient,
    /// Set when records live in PostgreSQL
    pub db: Option<PgPool>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// State backed by the in-memory record store and the configured storage.
    pub fn in_memory(settings: Settings) -> Result<Self> {
        let storage = storage::build_storage(&settings.storage)?;
        let repo = Arc::new(InMemoryApplicationRepository::new());

        Ok(Self {
            applications: Arc::new(ApplicationServiceImpl::new(repo)),
            uploader: FileUploadClient::new(storage),
            db: None,
            settings: Arc::new(settings),
        })
    }

    /// Wizard collaborators sharing this state's services. Each session
    /// persists in its own subdirectory of `autosave.local_store_dir`, so
    /// wizards of different sessions never edit the same record.
    pub fn form_dependencies(&self, session: &str) -> Result<FormDependencies, LocalStoreError> {
        let store = FileLocalStore::for_session(&self.settings.autosave.local_store_dir, session)?;
        Ok(FormDependencies {
            records: self.applications.clone(),
            uploader: self.uploader.clone(),
            session: FormSession::new(Arc::new(store)),
            autosave_delay: self.settings.autosave.debounce(),
        })
    }

    async fn from_settings(settings: Settings) -> Result<Self> {
        let Some(url) = settings.database.url.clone() else {
            tracing::warn!("No database configured, records are kept in memory");
            return Self::in_memory(settings);
        };

        let db = database::create_pool(&settings.database, &url).await?;
        tracing::info!("Database connection pool created");
        database::run_migrations(&db).await?;
        tracing::info!("Database migrations applied");

        let storage = storage::build_storage(&settings.storage)?;
        let repo = Arc::new(PgApplicationRepository::new(db.clone()));

        Ok(Self {
            applications: Arc::new(ApplicationServiceImpl::new(repo)),
            uploader: FileUploadClient::new(storage),
            db: Some(db),
            settings: Arc::new(settings),
        })
    }
}

/// Router with every middleware layer applied
pub fn build_router(state: AppState) -> Router {
    let cors = create_cors_layer(&state.settings.cors);
    routes::create_router(state)
        .layer(CompressionLayer::new())
        .layer(create_trace_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        handlers::health::init_server_start();

        let addr = settings.server_addr();
        let state = AppState::from_settings(settings).await?;
        tracing::info!(
            backend = ?state.settings.storage.backend,
            "Document storage ready"
        );

        let router = build_router(state);

        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
