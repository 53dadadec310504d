mod cache;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod platforms;
mod proposals;
mod routes;
mod scoring;
mod search;
mod state;
mod store;
mod text;
mod users;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::{Cache, CacheStore, HistoryStore, MemoryCache, RedisCache};
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::platforms::build_platform_clients;
use crate::proposals::ai::TextGenerator;
use crate::proposals::generator::ProposalGenerator;
use crate::proposals::templates::TemplateLibrary;
use crate::routes::build_router;
use crate::search::service::SearchService;
use crate::state::AppState;

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

    info!("Starting Bidwell API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize cache (Redis when configured, in-process otherwise)
    let store: Arc<dyn CacheStore> = match &config.redis_url {
        Some(url) => {
            let redis = RedisCache::connect(url)
                .await
                .context("Failed to connect to Redis")?;
            Arc::new(redis)
        }
        None => {
            warn!("REDIS_URL not set, using in-memory cache");
            Arc::new(MemoryCache::new())
        }
    };
    let cache = Cache::new(store);
    let history = HistoryStore::new(cache.clone(), config.history_ttl_days);

    // Initialize platform clients
    let clients = build_platform_clients(&config)?;
    let search = SearchService::new(clients, cache, config.search_cache_ttl_secs);

    // Initialize LLM client (optional)
    let ai: Option<Arc<dyn TextGenerator>> = match &config.anthropic_api_key {
        Some(key) => {
            let llm: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(key.clone())?);
            info!("LLM client initialized (model: {})", llm.model());
            Some(llm)
        }
        None => {
            info!("ANTHROPIC_API_KEY not set, proposals will use templates only");
            None
        }
    };

    // Load proposal templates
    let templates = match &config.templates_dir {
        Some(dir) => TemplateLibrary::from_dir(Path::new(dir))?,
        None => TemplateLibrary::builtin(),
    };
    if templates.is_empty() {
        warn!("No proposal templates loaded; generation depends on the AI backend");
    }
    info!("{} proposal templates available", templates.len());

    let generator = ProposalGenerator::new(templates, ai, config.proposal_max_length);

    // Build app state
    let state = AppState {
        db,
        history,
        search: Arc::new(search),
        generator: Arc::new(generator),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the bot's host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
