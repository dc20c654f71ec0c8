mod admin;
mod applications;
mod config;
mod db;
mod describe;
mod errors;
mod extract;
mod live;
mod llm_client;
mod models;
mod opportunities;
mod routes;
mod state;
mod store;
mod validation;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::admin::AdminPolicy;
use crate::config::{Config, StoreBackend};
use crate::db::create_pool;
use crate::describe::{DescriptionGenerator, LlmDescriptionGenerator, UnconfiguredGenerator};
use crate::live::ChangeFeed;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, Store};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Volunteer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the store
    let store: Arc<dyn Store> = match &config.store_backend {
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => Arc::new(PgStore::new(create_pool(database_url, *max_connections).await?)),
        StoreBackend::Memory => {
            warn!("Using the in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Initialize the description generator
    let generator: Arc<dyn DescriptionGenerator> = match config.anthropic_api_key.clone() {
        Some(api_key) => {
            let llm = LlmClient::new(api_key, config.llm_max_attempts)?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Arc::new(LlmDescriptionGenerator::new(llm))
        }
        None => {
            warn!("ANTHROPIC_API_KEY is not set; description generation is disabled");
            Arc::new(UnconfiguredGenerator)
        }
    };

    let admin = AdminPolicy::from_token(config.admin_token.clone());
    if admin.is_open() {
        warn!("ADMIN_TOKEN is not set; admin endpoints are open");
    }

    // Build app state
    let state = AppState {
        store,
        feed: ChangeFeed::new(config.feed_capacity),
        generator,
        admin,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
