//! Axum route handlers for the job-application draft behind the page.

use axum::{
    body::Bytes,
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::task::JoinError;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::airtable::UpsertOutcome;
use crate::draft::models::{DraftUpdate, JobApplicationDraft};
use crate::errors::AppError;
use crate::extraction::{extract_resume_text, ExtractionError};
use crate::optimize::{canned_output, OptimizeKind};
use crate::state::AppState;

/// Multipart field carrying the resume file.
const FILE_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ImportResumeResponse {
    pub resume: String,
    pub outcome: UpsertOutcome,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct OptimizeRequest {
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub kind: OptimizeKind,
    pub output: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/drafts
///
/// Called on page load.
pub async fn handle_create_draft(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<JobApplicationDraft>), AppError> {
    let draft = state.drafts.create().await?;
    Ok((StatusCode::CREATED, Json(draft)))
}

/// GET /api/drafts/:id
pub async fn handle_get_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobApplicationDraft>, AppError> {
    Ok(Json(state.drafts.get(id).await?))
}

/// PATCH /api/drafts/:id
///
/// Keystroke updates. Values over a field's limit are truncated, not rejected.
pub async fn handle_update_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<DraftUpdate>,
) -> Result<Json<JobApplicationDraft>, AppError> {
    Ok(Json(state.drafts.update(id, update).await?))
}

/// DELETE /api/drafts/:id
///
/// Called when the user navigates away.
pub async fn handle_discard_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.drafts.discard(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/drafts/:id/resume
///
/// Converts the uploaded file to text, stores it on the draft and upserts it
/// into the resume table.
pub async fn handle_import_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ImportResumeResponse>, AppError> {
    // fail fast on unknown drafts before reading the body
    state.drafts.get(id).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read uploaded file: {e}")))?;
        upload = Some((bytes, file_name, content_type));
        break;
    }

    let (bytes, file_name, content_type) = upload
        .ok_or_else(|| AppError::Validation(format!("Missing '{FILE_FIELD}' field")))?;
    info!(
        "Resume upload for draft {id}: {:?} ({} bytes)",
        file_name,
        bytes.len()
    );

    // PDF parsing is CPU-bound
    let extracted = tokio::task::spawn_blocking(move || {
        extract_resume_text(&bytes, file_name.as_deref(), content_type.as_deref())
    })
    .await;
    let text = extraction_result(id, extracted)?;

    let draft = state.drafts.set_resume(id, &text).await?;
    let outcome = state.resume_store.upsert_resume(&draft.resume).await?;

    Ok(Json(ImportResumeResponse {
        resume: draft.resume,
        outcome,
        message: "Resume uploaded successfully".to_string(),
    }))
}

/// POST /api/drafts/:id/job-info
///
/// Acknowledges the job details currently on the draft.
pub async fn handle_job_info(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let draft = state.drafts.get(id).await?;
    info!(
        "Job information uploaded for draft {id}: company={:?} title={:?} description_chars={}",
        draft.company_name,
        draft.job_title,
        draft.job_description.chars().count()
    );
    Ok(Json(MessageResponse {
        message: "Job information uploaded".to_string(),
    }))
}

/// POST /api/drafts/:id/optimize/:kind
///
/// Returns canned text after the configured delay. The body is optional; a
/// prompt in it replaces the one stored for that tab.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Path((id, kind)): Path<(Uuid, String)>,
    body: Bytes,
) -> Result<Json<OptimizeResponse>, AppError> {
    let kind: OptimizeKind = kind.parse()?;
    let request = parse_optimize_body(&body)?;

    let draft = match request.prompt {
        Some(prompt) => state.drafts.update(id, prompt_update(kind, prompt)).await?,
        None => state.drafts.get(id).await?,
    };
    info!("Optimizing {kind} for draft {id}");

    tokio::time::sleep(state.optimize_delay).await;

    let output = canned_output(kind, &draft, stored_prompt(kind, &draft));
    state.drafts.set_output(id, kind, &output).await?;

    Ok(Json(OptimizeResponse { kind, output }))
}

/// Empty body means "use the stored prompt". Anything else must be valid JSON.
fn parse_optimize_body(body: &[u8]) -> Result<OptimizeRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(OptimizeRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid optimize request body: {e}")))
}

/// A panic inside the parser counts as an unreadable file, same as a parse error.
fn extraction_result(
    id: Uuid,
    joined: Result<Result<String, ExtractionError>, JoinError>,
) -> Result<String, AppError> {
    match joined {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            warn!("Resume extraction failed for draft {id}: {e}");
            Err(AppError::from(e))
        }
        Err(e) => {
            error!("Resume extraction task for draft {id} aborted: {e}");
            Err(AppError::UnprocessableEntity(
                "Could not read the uploaded document".to_string(),
            ))
        }
    }
}

fn prompt_update(kind: OptimizeKind, prompt: String) -> DraftUpdate {
    match kind {
        OptimizeKind::Resume => DraftUpdate {
            resume_prompt: Some(prompt),
            ..Default::default()
        },
        OptimizeKind::CoverLetter => DraftUpdate {
            cover_letter_prompt: Some(prompt),
            ..Default::default()
        },
        OptimizeKind::Interview => DraftUpdate {
            interview_prep_prompt: Some(prompt),
            ..Default::default()
        },
    }
}

fn stored_prompt(kind: OptimizeKind, draft: &JobApplicationDraft) -> &str {
    match kind {
        OptimizeKind::Resume => &draft.resume_prompt,
        OptimizeKind::CoverLetter => &draft.cover_letter_prompt,
        OptimizeKind::Interview => &draft.interview_prep_prompt,
    }
}
