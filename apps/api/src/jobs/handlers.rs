use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::validation::{JobPostingUpdate, NewJobPosting};
use crate::models::job::JobPostingRow;
use crate::routes::UserIdQuery;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct JobListQuery {
    pub employer_id: Option<Uuid>,
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    Json(req): Json<NewJobPosting>,
) -> Result<(StatusCode, Json<JobPostingRow>), AppError> {
    let posting = req.validate()?;

    let row = sqlx::query_as::<_, JobPostingRow>(
        r#"
        INSERT INTO job_postings (posted_by, title, skills, experience, contact)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(params.user_id)
    .bind(&posting.title)
    .bind(&posting.skills)
    .bind(&posting.experience)
    .bind(&posting.contact)
    .fetch_one(&state.db)
    .await?;

    info!(job_id = %row.id, posted_by = %row.posted_by, "Job posting created");
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> Result<Json<Vec<JobPostingRow>>, AppError> {
    let rows: Vec<JobPostingRow> = match params.employer_id {
        Some(employer_id) => {
            sqlx::query_as(
                "SELECT * FROM job_postings WHERE posted_by = $1 ORDER BY created_at DESC",
            )
            .bind(employer_id)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM job_postings ORDER BY created_at DESC")
                .fetch_all(&state.db)
                .await?
        }
    };
    Ok(Json(rows))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobPostingRow>, AppError> {
    Ok(Json(find_job(&state.db, id).await?))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
    Json(req): Json<JobPostingUpdate>,
) -> Result<Json<JobPostingRow>, AppError> {
    let changes = req.validate()?;
    ensure_owner(&find_job(&state.db, id).await?, params.user_id)?;

    let row = sqlx::query_as::<_, JobPostingRow>(
        r#"
        UPDATE job_postings SET
            title = COALESCE($2, title),
            skills = COALESCE($3, skills),
            experience = COALESCE($4, experience),
            contact = COALESCE($5, contact),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&changes.title)
    .bind(&changes.skills)
    .bind(&changes.experience)
    .bind(&changes.contact)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(row))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Value>, AppError> {
    ensure_owner(&find_job(&state.db, id).await?, params.user_id)?;

    sqlx::query("DELETE FROM job_postings WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    info!(job_id = %id, "Job posting deleted");
    Ok(Json(json!({ "message": "Job deleted successfully" })))
}

async fn find_job(pool: &PgPool, id: Uuid) -> Result<JobPostingRow, AppError> {
    let row: Option<JobPostingRow> = sqlx::query_as("SELECT * FROM job_postings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    row.ok_or_else(|| AppError::NotFound("Job not found".to_string()))
}

fn ensure_owner(job: &JobPostingRow, user_id: Uuid) -> Result<(), AppError> {
    if job.posted_by != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_only_poster_owns_job() {
        let owner = Uuid::new_v4();
        let job = JobPostingRow {
            id: Uuid::new_v4(),
            posted_by: owner,
            title: "Rust Engineer".to_string(),
            skills: vec!["Rust".to_string()],
            experience: String::new(),
            contact: "555-0100".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(ensure_owner(&job, owner).is_ok());
        assert!(matches!(
            ensure_owner(&job, Uuid::new_v4()),
            Err(AppError::Forbidden)
        ));
    }
}
