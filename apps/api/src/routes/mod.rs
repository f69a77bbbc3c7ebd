pub mod health;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::draft::handlers;
use crate::page;
use crate::state::AppState;

/// Largest accepted request body (resume files included).
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Page
        .route("/", get(page::handle_job_details_page))
        .route("/job-details", get(page::handle_job_details_page))
        // Resume table
        .route("/api/upload-resume", post(upload::handle_upload_resume))
        // Draft API
        .route("/api/drafts", post(handlers::handle_create_draft))
        .route(
            "/api/drafts/:id",
            get(handlers::handle_get_draft)
                .patch(handlers::handle_update_draft)
                .delete(handlers::handle_discard_draft),
        )
        .route("/api/drafts/:id/resume", post(handlers::handle_import_resume))
        .route("/api/drafts/:id/job-info", post(handlers::handle_job_info))
        .route(
            "/api/drafts/:id/optimize/:kind",
            post(handlers::handle_optimize),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
