//! PostgreSQL persistence for users, projects and proposals.
//!
//! Every record is a document save: nested structures live in JSONB columns
//! and each write stands alone (last write wins).

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::models::project::Project;
use crate::models::proposal::{GenerationMetadata, Proposal, ProposalQuality, ProposalStatus};
use crate::models::user::{UsageCounters, User, UserPreferences};

// ────────────────────────────────────────────────────────────────────────────
// Rows
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    external_id: String,
    preferences: Json<UserPreferences>,
    usage: Json<UsageCounters>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            external_id: row.external_id,
            preferences: row.preferences.0,
            usage: row.usage.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProposalRow {
    id: Uuid,
    user_id: Uuid,
    project_id: String,
    content: String,
    metadata: Json<GenerationMetadata>,
    quality: Json<ProposalQuality>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProposalRow> for Proposal {
    type Error = sqlx::Error;

    fn try_from(row: ProposalRow) -> Result<Self, Self::Error> {
        let status = ProposalStatus::parse(&row.status).ok_or_else(|| {
            sqlx::Error::Decode(format!("unknown proposal status '{}'", row.status).into())
        })?;
        Ok(Proposal {
            id: row.id,
            user_id: row.user_id,
            project_id: row.project_id,
            content: row.content,
            metadata: row.metadata.0,
            quality: row.quality.0,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Users
// ────────────────────────────────────────────────────────────────────────────

/// Returns the user with `external_id`, creating it with default
/// preferences on first contact.
pub async fn get_or_create_user(pool: &PgPool, external_id: &str) -> Result<User, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, external_id, preferences, usage)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (external_id) DO UPDATE SET external_id = EXCLUDED.external_id
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(external_id)
    .bind(Json(UserPreferences::default()))
    .bind(Json(UsageCounters::default()))
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

pub async fn get_user(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(User::from))
}

/// Replaces the user's preferences wholesale. `None` when the user does not exist.
pub async fn update_preferences(
    pool: &PgPool,
    user_id: Uuid,
    preferences: &UserPreferences,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        "UPDATE users SET preferences = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(user_id)
    .bind(Json(preferences))
    .fetch_optional(pool)
    .await?;
    Ok(row.map(User::from))
}

/// Loads the user's counters, applies `update` and writes them back.
/// A missing user is not an error; nothing is written.
pub async fn record_usage<F>(pool: &PgPool, user_id: Uuid, update: F) -> Result<(), sqlx::Error>
where
    F: FnOnce(&mut UsageCounters),
{
    let Some(user) = get_user(pool, user_id).await? else {
        debug!("Skipping usage update for unknown user {user_id}");
        return Ok(());
    };

    let mut usage = user.usage;
    update(&mut usage);

    sqlx::query("UPDATE users SET usage = $2, updated_at = now() WHERE id = $1")
        .bind(user_id)
        .bind(Json(&usage))
        .execute(pool)
        .await?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Projects
// ────────────────────────────────────────────────────────────────────────────

/// Upserts each project as a JSONB document keyed by its composite id.
pub async fn save_projects(pool: &PgPool, projects: &[Project]) -> Result<(), sqlx::Error> {
    for project in projects {
        sqlx::query(
            r#"
            INSERT INTO projects (id, platform, document, overall_score)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
                SET document = EXCLUDED.document,
                    overall_score = EXCLUDED.overall_score,
                    updated_at = now()
            "#,
        )
        .bind(&project.id)
        .bind(project.platform.as_str())
        .bind(Json(project))
        .bind(project.scores.overall as i32)
        .execute(pool)
        .await?;
    }
    debug!("Saved {} projects", projects.len());
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Proposals
// ────────────────────────────────────────────────────────────────────────────

pub async fn insert_proposal(pool: &PgPool, proposal: &Proposal) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO proposals
            (id, user_id, project_id, content, metadata, quality, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(proposal.id)
    .bind(proposal.user_id)
    .bind(&proposal.project_id)
    .bind(&proposal.content)
    .bind(Json(&proposal.metadata))
    .bind(Json(&proposal.quality))
    .bind(proposal.status.as_str())
    .bind(proposal.created_at)
    .bind(proposal.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_proposal(pool: &PgPool, proposal_id: Uuid) -> Result<Option<Proposal>, sqlx::Error> {
    sqlx::query_as::<_, ProposalRow>("SELECT * FROM proposals WHERE id = $1")
        .bind(proposal_id)
        .fetch_optional(pool)
        .await?
        .map(Proposal::try_from)
        .transpose()
}

/// Writes `to` only while the stored status is still `from`. `None` means the
/// proposal is gone or its status moved on since it was read. Transition
/// rules are checked by the caller.
pub async fn update_proposal_status(
    pool: &PgPool,
    proposal_id: Uuid,
    from: ProposalStatus,
    to: ProposalStatus,
) -> Result<Option<Proposal>, sqlx::Error> {
    sqlx::query_as::<_, ProposalRow>(
        r#"
        UPDATE proposals SET status = $2, updated_at = now()
        WHERE id = $1 AND status = $3
        RETURNING *
        "#,
    )
    .bind(proposal_id)
    .bind(to.as_str())
    .bind(from.as_str())
    .fetch_optional(pool)
    .await?
    .map(Proposal::try_from)
    .transpose()
}
