use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadResumeRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResumeResponse {
    pub message: String,
}

/// POST /api/upload-resume
///
/// Pushes `content` verbatim into the first row with an empty resume, or a
/// new row. Any failure, an unreadable body included, is reported as the
/// generic upload failure.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    payload: Result<Json<UploadResumeRequest>, JsonRejection>,
) -> Result<Json<UploadResumeResponse>, AppError> {
    // a bad body is just another failed upload to the caller
    let Json(request) = payload.map_err(|e| AppError::UploadFailed(e.body_text()))?;

    let outcome = state.resume_store.upsert_resume(&request.content).await?;
    info!(
        "Resume uploaded ({} chars) via {}: {outcome:?}",
        request.content.chars().count(),
        state.resume_store.backend()
    );

    Ok(Json(UploadResumeResponse {
        message: "Resume uploaded successfully".to_string(),
    }))
}
