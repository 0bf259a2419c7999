//! Marginalia server entry point

mod analysis;
mod config;
mod error;
mod pdf;
mod routes;
mod state;
mod store;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::analysis::AnthropicClient;
use crate::config::{Config, DatabaseBackend};
use crate::state::AppState;
use crate::store::{PostgresStore, ReadingStore, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marginalia_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()
        .context("Missing required configuration (is ANTHROPIC_API_KEY set?)")?;

    let backend = config
        .database
        .backend()
        .map_err(anyhow::Error::msg)?;
    let store: Arc<dyn ReadingStore> = match backend {
        DatabaseBackend::Sqlite => {
            tracing::info!(url = %config.database.url, "Using embedded SQLite store");
            Arc::new(SqliteStore::connect(&config.database.url).await?)
        }
        DatabaseBackend::Postgres => {
            tracing::info!("Using hosted Postgres store");
            Arc::new(PostgresStore::connect(&config.database.url).await?)
        }
    };

    let analyzer = Arc::new(AnthropicClient::new(&config.analysis));
    let app = routes::router(AppState::new(store, analyzer));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(%addr, "Marginalia server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
