//! # Visa Intake
//!
//! HTTP service for visa applications.
//!
//! This is the application entry point that initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Record store (PostgreSQL or in-memory)
//! - Document storage
//! - HTTP server

use anyhow::Result;
use tracing::info;

use visa_intake::config::Settings;
use visa_intake::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment and config files
    let settings = Settings::load()?;

    // Initialize tracing subscriber for structured logging
    visa_intake::telemetry::init_tracing(&settings.environment);

    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    // Build and run the application
    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
