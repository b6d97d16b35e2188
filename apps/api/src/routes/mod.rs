pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::jobs::handlers as jobs;
use crate::matching::handlers as matching;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

/// Identifies the caller. Every owner-scoped route takes it as a query param.
#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Resumes
        .route(
            "/api/v1/resumes",
            post(resumes::handle_create_resume).get(resumes::handle_list_resumes),
        )
        .route(
            "/api/v1/resumes/preview",
            post(resumes::handle_preview_resume),
        )
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/file",
            get(resumes::handle_download_resume_file),
        )
        // Job postings
        .route(
            "/api/v1/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        .route(
            "/api/v1/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Matching
        .route(
            "/api/v1/matches/internal",
            get(matching::handle_internal_matches),
        )
        .route(
            "/api/v1/matches/external",
            get(matching::handle_external_matches),
        )
        .layer(body_limit)
        .with_state(state)
}
