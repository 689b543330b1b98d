use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod db;
mod domain;
mod error;
mod http;
mod metrics;
mod utils;

use config::AppConfig;
use db::{MemoryStore, PgStore, Store};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();

    // RUST_LOG wins over --log-filter.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    tracing::info!("Starting order fulfillment service");

    // === 1. Metrics registry ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    tracing::info!(
        "Metrics registry created with {} metric families",
        metrics.registry().gather().len()
    );

    // === 2. Store ===
    let store: Arc<dyn Store> = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to Postgres...");
            let store = PgStore::connect(url, &config.pool_settings(), config.retry_config()).await?;
            if config.skip_migrations {
                tracing::info!("Skipping database migrations");
            } else {
                store.migrate().await?;
            }
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; data is kept in memory and lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    // === 3. HTTP server ===
    let state = web::Data::new(http::AppState::new(store, metrics));
    tracing::info!("Listening on http://{}", config.bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(http::configure)
    })
    .bind(config.bind_addr)?
    .run()
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}
