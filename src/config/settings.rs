//! Application settings and configuration structures.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Database configuration (PostgreSQL)
    pub database: DatabaseSettings,

    /// Where uploaded documents are stored
    pub storage: StorageSettings,

    /// Upload limits
    pub uploads: UploadSettings,

    /// Wizard autosave configuration
    pub autosave: AutosaveSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// PostgreSQL database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Database connection URL. Without one, records are kept in memory.
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,
}

/// Storage backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    #[default]
    Local,
    Blob,
}

/// Document storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub backend: StorageBackendKind,

    /// Root directory of the local backend. Objects under it are served at
    /// their path (`/uploads/...`).
    pub local_root: PathBuf,

    /// Base URL of the blob backend
    pub blob_base_url: Option<String>,

    /// Bearer token for the blob backend
    pub blob_token: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::Local,
            local_root: PathBuf::from("public"),
            blob_base_url: None,
            blob_token: None,
        }
    }
}

/// Upload limits.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    /// Request body limit for the upload endpoint, in bytes. Leaves room for
    /// multipart framing around a maximum-size file.
    pub max_request_bytes: usize,
}

/// Wizard autosave configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AutosaveSettings {
    /// Quiet period before a snapshot is written
    pub debounce_ms: u64,

    /// Directory holding one file-backed local store per wizard session
    pub local_store_dir: PathBuf,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the blob backend is selected without a base URL.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Self::builder(&environment)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=3000 -> server.port = 3000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("storage.backend", std::env::var("STORAGE_BACKEND").ok())?
            .set_override_option("storage.blob_base_url", std::env::var("BLOB_BASE_URL").ok())?
            .set_override_option("storage.blob_token", std::env::var("BLOB_TOKEN").ok())?
            .build()?
            .try_deserialize()
            .and_then(Self::validated)
    }

    /// Defaults only, no files or environment.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder("test")?.build()?.try_deserialize()
    }

    fn builder(
        environment: &str,
    ) -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("environment", environment)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("storage.backend", "local")?
            .set_default("storage.local_root", "public")?
            // 5 MiB file plus multipart overhead
            .set_default("uploads.max_request_bytes", 6 * 1024 * 1024)?
            .set_default("autosave.debounce_ms", 1000)?
            .set_default("autosave.local_store_dir", ".visa-intake")?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])
    }

    fn validated(settings: Self) -> Result<Self, ConfigError> {
        if settings.storage.backend == StorageBackendKind::Blob
            && settings.storage.blob_base_url.is_none()
        {
            return Err(ConfigError::Message(
                "storage.blob_base_url must be set when storage.backend is \"blob\"".into(),
            ));
        }
        Ok(settings)
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl AutosaveSettings {
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}
