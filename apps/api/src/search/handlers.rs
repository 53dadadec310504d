//! Axum route handlers for the Search API.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::cache::history::SearchHistoryEntry;
use crate::errors::AppError;
use crate::models::project::Project;
use crate::models::user::{NotificationPreferences, SearchPreferences};
use crate::platforms::SearchParams;
use crate::search::service::SearchResponse;
use crate::state::AppState;
use crate::store;

const HISTORY_TOP_PROJECTS: usize = 5;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub params: SearchParams,
    /// Skills to score relevance against.
    #[serde(default)]
    pub skills: Vec<String>,
}

/// POST /api/v1/projects/search
///
/// Searches all enabled platforms. With a `user_id`, the user's saved search
/// preferences fill in whatever the request leaves out, and the search is
/// recorded in their history.
pub async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let mut params = request.params;

    let user = match request.user_id {
        Some(user_id) => Some(
            store::get_user(&state.db, user_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?,
        ),
        None => None,
    };
    if let Some(user) = &user {
        params = apply_preferences(params, &user.preferences.search);
    }
    validate_params(&params)?;

    let mut response = state.search.search(&params, &request.skills).await;

    if !response.cached && !response.projects.is_empty() {
        if let Err(e) = store::save_projects(&state.db, &response.projects).await {
            warn!("Failed to save search results: {e}");
        }
    }

    if let Some(user) = user {
        response.notify = notify_ids(&response.projects, &user.preferences.notifications);

        let entry = SearchHistoryEntry {
            params,
            result_count: response.total,
            top_project_ids: response
                .projects
                .iter()
                .take(HISTORY_TOP_PROJECTS)
                .map(|p| p.id.clone())
                .collect(),
            searched_at: Utc::now(),
        };
        state.history.record_search(user.id, entry).await;

        if let Err(e) =
            store::record_usage(&state.db, user.id, |usage| usage.record_search(Utc::now())).await
        {
            warn!("Failed to update usage for user {}: {e}", user.id);
        }
    }

    Ok(Json(response))
}

fn notify_ids(projects: &[Project], prefs: &NotificationPreferences) -> Vec<String> {
    projects
        .iter()
        .filter(|p| prefs.should_notify(p))
        .map(|p| p.id.clone())
        .collect()
}

/// Fills fields the request left unset from saved preferences.
fn apply_preferences(mut params: SearchParams, prefs: &SearchPreferences) -> SearchParams {
    if params.keywords.is_empty() {
        params.keywords = prefs.keywords.clone();
    }
    params.min_budget = params.min_budget.or(prefs.min_budget);
    params.max_budget = params.max_budget.or(prefs.max_budget);
    params.limit = params.limit.or(prefs.limit);
    if params.platforms.is_none() && !prefs.platforms.is_empty() {
        params.platforms = Some(prefs.platforms.clone());
    }
    params
}

fn validate_params(params: &SearchParams) -> Result<(), AppError> {
    if let (Some(min), Some(max)) = (params.min_budget, params.max_budget) {
        if min > max {
            return Err(AppError::Validation(format!(
                "min_budget ({min}) cannot exceed max_budget ({max})"
            )));
        }
    }
    if [params.min_budget, params.max_budget]
        .into_iter()
        .flatten()
        .any(|b| b < 0.0)
    {
        return Err(AppError::Validation("budgets cannot be negative".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::Platform;

    #[test]
    fn test_preferences_fill_only_missing_fields() {
        let prefs = SearchPreferences {
            keywords: vec!["rust".to_string()],
            min_budget: Some(200.0),
            max_budget: Some(900.0),
            platforms: vec![Platform::Upwork],
            limit: Some(10),
        };
        let params = SearchParams {
            keywords: vec!["react".to_string()],
            max_budget: Some(5000.0),
            ..Default::default()
        };

        let merged = apply_preferences(params, &prefs);

        assert_eq!(merged.keywords, vec!["react".to_string()]);
        assert_eq!(merged.min_budget, Some(200.0));
        assert_eq!(merged.max_budget, Some(5000.0));
        assert_eq!(merged.platforms, Some(vec![Platform::Upwork]));
        assert_eq!(merged.limit, Some(10));
    }

    #[test]
    fn test_notify_lists_projects_over_threshold() {
        let mut strong = Project::new(Platform::Upwork, "a", "Strong");
        strong.scores.overall = 82;
        let mut weak = Project::new(Platform::Upwork, "b", "Weak");
        weak.scores.overall = 40;
        let projects = vec![strong, weak];

        let ids = notify_ids(&projects, &NotificationPreferences::default());
        assert_eq!(ids, vec!["upwork:a".to_string()]);

        let muted = NotificationPreferences {
            enabled: false,
            min_score: 0,
        };
        assert!(notify_ids(&projects, &muted).is_empty());
    }

    #[test]
    fn test_empty_preferences_leave_platforms_unrestricted() {
        let merged = apply_preferences(SearchParams::default(), &SearchPreferences::default());
        assert!(merged.platforms.is_none());
        assert!(merged.keywords.is_empty());
    }

    #[test]
    fn test_inverted_budget_range_is_rejected() {
        let params = SearchParams {
            min_budget: Some(1000.0),
            max_budget: Some(10.0),
            ..Default::default()
        };
        assert!(matches!(
            validate_params(&params),
            Err(AppError::Validation(_))
        ));

        let negative = SearchParams {
            min_budget: Some(-5.0),
            ..Default::default()
        };
        assert!(validate_params(&negative).is_err());
        assert!(validate_params(&SearchParams::default()).is_ok());
    }
}
