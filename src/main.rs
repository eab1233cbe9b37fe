//! # HiveQueen Main Entry Point
//!
//! This is the main entry point for the HiveQueen lab inventory service.

use hivequeen::{config::ConfigLoader, db::init_pool, seeds::seed_admin_user, server::run_server};
use migration::{Migrator, MigratorTrait};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from layered env files and variables
    let config_loader = ConfigLoader::new();
    let config = config_loader.load()?;

    hivequeen::telemetry::init_tracing(&config)?;

    // Log the loaded configuration with secrets redacted
    tracing::info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::info!("Configuration: {}", redacted_json);
    }

    let db = init_pool(&config).await?;

    // Bring the schema up to date before serving requests
    Migrator::up(&db, None).await?;

    // Bootstrap the initial admin account if configured
    seed_admin_user(&config, &db).await?;

    run_server(config, db).await
}
