// main.rs
// Axum server wiring: loads config, connects to MongoDB, builds the router and serves.
//
// Tenant-scoped endpoints (company resolved from subdomain or x-tenant header):
// - /api/planes[...]        payment plans, editing commands and computed summaries
// - /planes/{id}            server-rendered plan breakdown
// - /api/propuestas[...]    proposals, PURGE score, stage moves
// - /api/tablero            Kanban board
// - /api/preferencias/{u}   view preferences

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use inmocrm::{config::AppConfig, routes, state};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let state = Arc::new(
        state::init_state_with(&config)
            .await
            .context("failed to initialize MongoDB state")?,
    );

    let app = routes::router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
