//! # LinkMe
//!
//! Social network API server entry point. Initializes:
//! - Tracing/logging subsystem
//! - Configuration loading
//! - Database connection pool and migrations
//! - Redis event bus and presence
//! - HTTP server

use anyhow::Result;
use tracing::info;

use linkme::config::Settings;
use linkme::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    linkme::telemetry::init_tracing();

    info!("Starting LinkMe...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
