//! wayedge console server: application entry point.

mod config;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wayedge_console::{AccountService, WebsiteService};
use wayedge_db::repository::SurrealTenantRepository;
use wayedge_db::{DbManager, SurrealStore};

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("wayedge=info".parse()?))
        .json()
        .init();

    info!("Starting wayedge console server...");

    let config = Config::load()?;

    let manager = DbManager::connect(&config.db).await?;
    let db = manager.client().clone();
    wayedge_db::run_migrations(&db).await?;

    let tenants = match config.console.pepper.clone() {
        Some(pepper) => SurrealTenantRepository::with_pepper(db.clone(), pepper),
        None => SurrealTenantRepository::new(db.clone()),
    };
    // Held until shutdown.
    let _accounts = AccountService::new(tenants, &config.console);
    let _websites = WebsiteService::new(
        SurrealStore::with_pepper(db, config.console.pepper.clone()),
        &config.console,
    );

    info!(
        website_quota = config.console.website_quota,
        "Console services ready"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }

    info!("wayedge console server stopped.");
    Ok(())
}
