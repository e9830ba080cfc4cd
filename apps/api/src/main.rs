mod assets;
mod config;
mod errors;
mod llm_client;
mod models;
mod news;
mod persona;
mod routes;
mod state;
mod store;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{GeminiClient, ModelKind};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{KeyValueStore, MemoryStore, RedisStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Folio API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Gemini client
    let gemini = GeminiClient::new(&config)?;
    if gemini.is_configured() {
        info!(
            "Gemini client initialized (text: {}, image: {})",
            gemini.model_name(ModelKind::Text),
            gemini.model_name(ModelKind::Image)
        );
    } else {
        warn!("GEMINI_API_KEY is not set; AI features will return fallback responses");
    }

    // Durable store for the news cache
    let durable: Arc<dyn KeyValueStore> = match &config.redis_url {
        Some(url) => Arc::new(RedisStore::connect(url).await?),
        None => {
            warn!("REDIS_URL is not set; news cache will not survive restarts");
            Arc::new(MemoryStore::new())
        }
    };
    // Ephemeral store for background art and its disable flag
    let ephemeral: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    info!(
        "Persona status: {:?}",
        config.persona.availability_status
    );

    let state = AppState::new(config.clone(), Arc::new(gemini), durable, ephemeral);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the portfolio origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
