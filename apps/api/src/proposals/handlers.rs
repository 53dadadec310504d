//! Axum route handlers for the Proposal API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::history::ProposalHistoryEntry;
use crate::errors::AppError;
use crate::models::profile::FreelancerProfile;
use crate::models::project::Project;
use crate::models::proposal::{
    GenerationMetadata, GenerationMethod, Proposal, ProposalQuality, ProposalStatus,
};
use crate::models::user::AiPreferences;
use crate::proposals::generator::GenerationOptions;
use crate::state::AppState;
use crate::store;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub user_id: Uuid,
    pub project: Project,
    pub profile: FreelancerProfile,
    #[serde(default)]
    pub options: Option<GenerationOptions>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub proposal_id: Uuid,
    pub content: String,
    pub metadata: GenerationMetadata,
    pub quality: ProposalQuality,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/proposals/generate
///
/// Generates a proposal and stores it as a draft. Options the request leaves
/// out come from the user's AI preferences.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    if request.project.title.trim().is_empty() {
        return Err(AppError::Validation("project.title cannot be empty".to_string()));
    }
    if request.profile.name.trim().is_empty() {
        return Err(AppError::Validation("profile.name cannot be empty".to_string()));
    }

    let user = store::get_user(&state.db, request.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", request.user_id)))?;

    let options = resolve_options(request.options, &user.preferences.ai);
    let generated = state
        .generator
        .generate_proposal(&request.project, &request.profile, &options)
        .await?;

    let now = Utc::now();
    let proposal = Proposal {
        id: Uuid::new_v4(),
        user_id: user.id,
        project_id: request.project.id.clone(),
        content: generated.content,
        metadata: generated.metadata,
        quality: generated.quality,
        status: ProposalStatus::Draft,
        created_at: now,
        updated_at: now,
    };
    store::insert_proposal(&state.db, &proposal).await?;

    info!(
        "Proposal {} generated for project {} via {}",
        proposal.id,
        proposal.project_id,
        proposal.metadata.method.as_str()
    );

    state
        .history
        .record_proposal(
            user.id,
            ProposalHistoryEntry {
                proposal_id: proposal.id,
                project_id: proposal.project_id.clone(),
                project_title: request.project.title.clone(),
                method: proposal.metadata.method,
                word_count: proposal.metadata.word_count,
                excerpt: ProposalHistoryEntry::excerpt_of(&proposal.content),
                created_at: now,
            },
        )
        .await;

    let used_ai = proposal.metadata.method == GenerationMethod::Ai;
    if let Err(e) =
        store::record_usage(&state.db, user.id, |usage| usage.record_proposal(used_ai, now)).await
    {
        warn!("Failed to update usage for user {}: {e}", user.id);
    }

    Ok(Json(GenerateResponse {
        proposal_id: proposal.id,
        content: proposal.content,
        metadata: proposal.metadata,
        quality: proposal.quality,
    }))
}

/// PATCH /api/v1/proposals/:id/status
///
/// Moves a proposal along draft → sent → responded.
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(proposal_id): Path<Uuid>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<Proposal>, AppError> {
    let next = ProposalStatus::parse(&request.status).ok_or_else(|| {
        AppError::Validation(format!("Unknown proposal status '{}'", request.status))
    })?;

    let current = store::get_proposal(&state.db, proposal_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Proposal {proposal_id} not found")))?;

    let status = current.status.transition(next)?;

    let updated =
        match store::update_proposal_status(&state.db, proposal_id, current.status, status).await? {
            Some(updated) => updated,
            None => {
                let latest = store::get_proposal(&state.db, proposal_id).await?;
                return Err(stale_update_error(proposal_id, current.status, latest.as_ref()));
            }
        };

    info!("Proposal {proposal_id} moved to {}", status.as_str());
    Ok(Json(updated))
}

/// The conditional update matched nothing: the proposal was deleted, or
/// another request changed its status after it was read.
fn stale_update_error(
    proposal_id: Uuid,
    expected: ProposalStatus,
    latest: Option<&Proposal>,
) -> AppError {
    match latest {
        None => AppError::NotFound(format!("Proposal {proposal_id} not found")),
        Some(proposal) => AppError::Validation(format!(
            "Proposal {proposal_id} is now '{}', not '{}'; reload and retry",
            proposal.status.as_str(),
            expected.as_str()
        )),
    }
}

/// Request options win; preferences fill the gaps.
fn resolve_options(options: Option<GenerationOptions>, prefs: &AiPreferences) -> GenerationOptions {
    match options {
        Some(options) => GenerationOptions {
            use_ai: options.use_ai && prefs.enabled,
            max_length: options.max_length.or(prefs.max_length),
            tone: options.tone.or_else(|| prefs.tone.clone()),
        },
        None => GenerationOptions {
            use_ai: prefs.enabled,
            max_length: prefs.max_length,
            tone: prefs.tone.clone(),
        },
    }
}
