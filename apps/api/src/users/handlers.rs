//! Axum route handlers for the User API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::cache::history::{ProposalHistoryEntry, SearchHistoryEntry};
use crate::errors::AppError;
use crate::models::user::{User, UserPreferences};
use crate::state::AppState;
use crate::store;

const MAX_SEARCH_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub external_id: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub user_id: Uuid,
    pub searches: Vec<SearchHistoryEntry>,
    pub proposals: Vec<ProposalHistoryEntry>,
}

/// POST /api/v1/users
///
/// Returns the user for `external_id`, creating it on first contact.
pub async fn handle_create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<User>, AppError> {
    let external_id = request.external_id.trim();
    if external_id.is_empty() {
        return Err(AppError::Validation("external_id cannot be empty".to_string()));
    }

    let user = store::get_or_create_user(&state.db, external_id).await?;
    Ok(Json(user))
}

/// PUT /api/v1/users/:id/preferences
///
/// Replaces the user's preferences.
pub async fn handle_update_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(preferences): Json<UserPreferences>,
) -> Result<Json<User>, AppError> {
    validate_preferences(&preferences)?;

    let user = store::update_preferences(&state.db, user_id, &preferences)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;

    info!("Updated preferences for user {user_id}");
    Ok(Json(user))
}

/// GET /api/v1/users/:id/history
///
/// Recent searches and proposals, newest first.
pub async fn handle_history(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<HistoryResponse>, AppError> {
    store::get_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;

    let (searches, proposals) = tokio::join!(
        state.history.searches(user_id),
        state.history.proposals(user_id)
    );

    Ok(Json(HistoryResponse {
        user_id,
        searches,
        proposals,
    }))
}

fn validate_preferences(preferences: &UserPreferences) -> Result<(), AppError> {
    let search = &preferences.search;
    if let (Some(min), Some(max)) = (search.min_budget, search.max_budget) {
        if min > max {
            return Err(AppError::Validation(
                "search.min_budget cannot exceed search.max_budget".to_string(),
            ));
        }
    }
    if let Some(limit) = search.limit {
        if limit == 0 || limit > MAX_SEARCH_LIMIT {
            return Err(AppError::Validation(format!(
                "search.limit must be between 1 and {MAX_SEARCH_LIMIT}"
            )));
        }
    }
    if preferences.ai.max_length == Some(0) {
        return Err(AppError::Validation("ai.max_length must be positive".to_string()));
    }
    if preferences.notifications.min_score > 100 {
        return Err(AppError::Validation(
            "notifications.min_score must be at most 100".to_string(),
        ));
    }
    Ok(())
}
