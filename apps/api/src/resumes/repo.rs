use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeFile, ResumeRow};
use crate::resumes::service::ResumeFields;

pub async fn insert_resume(
    pool: &PgPool,
    user_id: Uuid,
    fields: &ResumeFields,
    file: Option<&ResumeFile>,
) -> Result<ResumeRow, AppError> {
    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (user_id, email, profile_summary, skills, education, experience,
             file_name, file_mime_type, file_path, file_storage_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&fields.email)
    .bind(&fields.profile_summary)
    .bind(&fields.skills)
    .bind(&fields.education)
    .bind(&fields.experience)
    .bind(file.map(|f| f.file_name.as_str()))
    .bind(file.map(|f| f.mime_type.as_str()))
    .bind(file.map(|f| f.path.as_str()))
    .bind(file.and_then(|f| f.storage_id.as_deref()))
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn list_resumes(pool: &PgPool, user_id: Uuid) -> Result<Vec<ResumeRow>, AppError> {
    let rows = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Loads a resume for `user_id`. Missing is `NotFound`, someone else's is
/// `Forbidden`.
pub async fn get_owned_resume(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<ResumeRow, AppError> {
    let row: Option<ResumeRow> = sqlx::query_as("SELECT * FROM resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    let row = row.ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;
    if row.user_id != user_id {
        return Err(AppError::Forbidden);
    }
    Ok(row)
}

/// Partial update: `None` keeps the stored value.
#[derive(Debug, Default)]
pub struct ResumeChanges {
    pub email: Option<String>,
    pub profile_summary: Option<String>,
    pub skills: Option<Vec<String>>,
    pub education: Option<Vec<String>>,
    pub experience: Option<String>,
}

pub async fn update_resume(
    pool: &PgPool,
    id: Uuid,
    changes: &ResumeChanges,
) -> Result<ResumeRow, AppError> {
    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes SET
            email = COALESCE($2, email),
            profile_summary = COALESCE($3, profile_summary),
            skills = COALESCE($4, skills),
            education = COALESCE($5, education),
            experience = COALESCE($6, experience),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&changes.email)
    .bind(&changes.profile_summary)
    .bind(&changes.skills)
    .bind(&changes.education)
    .bind(&changes.experience)
    .fetch_optional(pool)
    .await?;

    row.ok_or_else(|| AppError::NotFound("Resume not found".to_string()))
}

pub async fn delete_resume(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM resumes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// The resume a match request runs against: `resume_id` when given (and
/// owned by the caller), otherwise the caller's earliest resume.
pub async fn find_resume_for_matching(
    pool: &PgPool,
    user_id: Uuid,
    resume_id: Option<Uuid>,
) -> Result<ResumeRow, AppError> {
    if let Some(id) = resume_id {
        return get_owned_resume(pool, id, user_id).await;
    }

    let row: Option<ResumeRow> = sqlx::query_as(
        "SELECT * FROM resumes WHERE user_id = $1 ORDER BY created_at ASC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.ok_or_else(|| AppError::NotFound("Resume not found".to_string()))
}
