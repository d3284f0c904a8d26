//! Portfolio local data service
//!
//! Serves the `student`, `technology` and `available_technology` tables over HTTP
//! with SQLite persistence.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portfolio_sync::config::Config;
use portfolio_sync::db::{self, Repository};
use portfolio_sync::service::{create_router, AppState, REST_PREFIX};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting portfolio data service");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if the API key is not configured
    if config.api_key.is_none() {
        tracing::warn!("No API key configured (PORTFOLIO_API_KEY). Authentication is disabled!");
    }
    if !config.catalog_enabled {
        tracing::info!("Technology catalog disabled; clients will use their fallback list");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path, config.catalog_enabled).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        "Server listening on http://{}{}",
        config.bind_addr,
        REST_PREFIX
    );

    axum::serve(listener, app).await?;

    Ok(())
}
