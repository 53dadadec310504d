pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::proposals::handlers as proposals;
use crate::search::handlers as search;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Search API
        .route("/api/v1/projects/search", post(search::handle_search))
        // Proposal API
        .route(
            "/api/v1/proposals/generate",
            post(proposals::handle_generate),
        )
        .route(
            "/api/v1/proposals/:id/status",
            patch(proposals::handle_update_status),
        )
        // User API
        .route("/api/v1/users", post(users::handle_create_user))
        .route(
            "/api/v1/users/:id/preferences",
            put(users::handle_update_preferences),
        )
        .route("/api/v1/users/:id/history", get(users::handle_history))
        .with_state(state)
}
