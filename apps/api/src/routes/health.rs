use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status, version and the enabled integrations.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "bidwell-api",
        "platforms": state.search.platforms(),
        "ai_enabled": state.generator.ai_enabled(),
        "cache": if state.config.redis_url.is_some() { "redis" } else { "memory" },
    }))
}
