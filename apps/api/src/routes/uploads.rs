use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::is_safe_name;

/// GET /uploads/:name
///
/// Streams a stored résumé back from whichever backend is configured.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let not_found = || AppError::NotFound(format!("Resume '{name}' not found"));
    if !is_safe_name(&name) {
        return Err(not_found());
    }

    let bytes = state.resumes.get(&name).await?.ok_or_else(not_found)?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{name}\""),
            ),
        ],
        bytes,
    ))
}
