use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod clients;
mod config;
mod error;
mod middleware;
mod models;
mod proxy;
mod repositories;
mod routes;
mod state;

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use tokio::net::TcpListener;

use crate::{config::ApiConfig, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Recursive Creator API service");

    let config = ApiConfig::from_env().context("Failed to load service configuration")?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool).await?;

    let http = clients::http_client().context("Failed to build HTTP client")?;
    let proxy_http = proxy::proxy_client(config.proxy_allowed_domains.clone())
        .context("Failed to build proxy HTTP client")?;
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::new(pool, config, http, proxy_http);

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("API service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
