use chrono::Utc;
use tracing::{debug, info, warn};

use crate::candidates::repository::{CandidateRepository, RepositoryError};
use crate::candidates::validation::{validate_submission, IntakeForm, ValidatedSubmission};
use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::storage::{resume_url, stored_name, ResumeStore};

/// Validates, stores the optional résumé, then inserts the candidate as `Pending`.
///
/// Nothing is written when validation fails. A résumé stored ahead of a failed
/// insert (duplicate email, store outage) is removed again before returning.
pub async fn submit_candidate(
    repository: &dyn CandidateRepository,
    resumes: &dyn ResumeStore,
    form: IntakeForm,
    max_resume_bytes: usize,
) -> Result<Candidate, AppError> {
    let ValidatedSubmission {
        mut candidate,
        resume,
    } = validate_submission(form, max_resume_bytes).map_err(|errors| {
        debug!("Candidate submission rejected: {errors:?}");
        AppError::Validation(errors)
    })?;

    let stored = match resume {
        Some(upload) => {
            let name = stored_name(&upload.file_name, Utc::now());
            resumes.put(&name, upload.bytes, "application/pdf").await?;
            candidate.resume_url = Some(resume_url(&name));
            Some(name)
        }
        None => None,
    };

    match repository.insert(candidate).await {
        Ok(created) => {
            info!(
                "Candidate {} submitted for '{}' (resume: {})",
                created.id,
                created.job_title,
                created.resume_url.is_some()
            );
            Ok(created)
        }
        Err(e) => {
            if let Some(name) = stored {
                discard_resume(resumes, &name).await;
            }
            if matches!(e, RepositoryError::Conflict) {
                warn!("Rejected candidate submission with an existing email");
            }
            Err(e.into())
        }
    }
}

/// Best-effort removal of a stored résumé; failures are logged, not returned.
pub(crate) async fn discard_resume(resumes: &dyn ResumeStore, name: &str) {
    if let Err(e) = resumes.remove(name).await {
        warn!(
            "Failed to remove resume '{name}' from {} store: {e}",
            resumes.backend()
        );
    }
}
