use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::HistoryStore;
use crate::config::Config;
use crate::proposals::generator::ProposalGenerator;
use crate::search::service::SearchService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Per-user search and proposal history, backed by the shared cache.
    pub history: HistoryStore,
    pub search: Arc<SearchService>,
    /// Template library and optional AI backend, fixed at startup.
    pub generator: Arc<ProposalGenerator>,
    pub config: Config,
}
