use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Multipart, Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::candidates::directory::{delete_candidate, list_candidates, update_candidate_status};
use crate::candidates::intake::submit_candidate;
use crate::candidates::validation::{IntakeForm, ResumeUpload};
use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/candidates
///
/// `multipart/form-data` with `name`, `email`, `phone`, `jobTitle` and an optional `resume` file.
pub async fn handle_submit(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Candidate>), AppError> {
    let multipart = multipart.map_err(|e| AppError::Malformed(e.body_text()))?;
    let max_resume_bytes = state.config.max_resume_bytes;
    let form = read_intake_form(multipart).await?;

    let candidate = submit_candidate(
        state.candidates.as_ref(),
        state.resumes.as_ref(),
        form,
        max_resume_bytes,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(candidate)))
}

/// GET /api/candidates?search=
pub async fn handle_list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    let candidates = list_candidates(state.candidates.as_ref(), params.search.as_deref()).await?;
    Ok(Json(candidates))
}

/// PUT /api/candidates/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<Candidate>, AppError> {
    let id = parse_candidate_id(&id)?;
    let Json(req) = body.map_err(|e| AppError::Malformed(e.body_text()))?;

    let updated =
        update_candidate_status(state.candidates.as_ref(), id, req.status.as_deref()).await?;
    Ok(Json(updated))
}

/// DELETE /api/candidates/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_candidate_id(&id)?;
    delete_candidate(state.candidates.as_ref(), state.resumes.as_ref(), id).await?;
    Ok(Json(MessageResponse {
        message: "Candidate deleted".to_string(),
    }))
}

/// An id that is not a UUID cannot name an existing candidate.
fn parse_candidate_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Candidate not found".to_string()))
}

/// Reads every part into an [`IntakeForm`]. Hitting the body limit stops reading
/// and is reported by validation alongside the other field errors.
async fn read_intake_form(mut multipart: Multipart) -> Result<IntakeForm, AppError> {
    let mut form = IntakeForm::default();
    match read_parts(&mut multipart, &mut form).await {
        Ok(()) => Ok(form),
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            form.resume_too_large = true;
            Ok(form)
        }
        Err(e) => Err(AppError::Malformed(e.body_text())),
    }
}

async fn read_parts(multipart: &mut Multipart, form: &mut IntakeForm) -> Result<(), MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await?;
                form.resumes.push(ResumeUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            "name" => form.fields.name = Some(field.text().await?),
            "email" => form.fields.email = Some(field.text().await?),
            "phone" => form.fields.phone = Some(field.text().await?),
            "jobTitle" => form.fields.job_title = Some(field.text().await?),
            // Unknown parts are drained and ignored.
            _ => {
                field.bytes().await?;
            }
        }
    }
    Ok(())
}
