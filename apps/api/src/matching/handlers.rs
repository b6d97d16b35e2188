use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tokio::time::Instant;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::external::match_external_jobs;
use crate::matching::internal::match_internal_jobs;
use crate::matching::scorer::{ExternalJobListing, InternalJobMatch};
use crate::models::job::JobPostingRow;
use crate::resumes::repo::find_resume_for_matching;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct MatchQuery {
    pub user_id: Uuid,
    pub resume_id: Option<Uuid>,
}

/// GET /api/v1/matches/external
pub async fn handle_external_matches(
    State(state): State<AppState>,
    Query(params): Query<MatchQuery>,
) -> Result<Json<Vec<ExternalJobListing>>, AppError> {
    let deadline = Instant::now() + state.config.match_timeout();
    let resume = find_resume_for_matching(&state.db, params.user_id, params.resume_id).await?;

    let matched = match_external_jobs(
        state.job_source.as_ref(),
        &resume.skills,
        &resume.education,
        deadline,
    )
    .await?;
    Ok(Json(matched))
}

/// GET /api/v1/matches/internal
pub async fn handle_internal_matches(
    State(state): State<AppState>,
    Query(params): Query<MatchQuery>,
) -> Result<Json<Vec<InternalJobMatch>>, AppError> {
    let resume = find_resume_for_matching(&state.db, params.user_id, params.resume_id).await?;

    let postings: Vec<JobPostingRow> =
        sqlx::query_as("SELECT * FROM job_postings ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;

    let matched = match_internal_jobs(&resume.skills, &resume.education, postings)?;
    Ok(Json(matched))
}
