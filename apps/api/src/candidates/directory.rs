use tracing::info;
use uuid::Uuid;

use crate::candidates::intake::discard_resume;
use crate::candidates::repository::CandidateRepository;
use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::storage::{name_from_url, ResumeStore};

/// All candidates, newest first. A non-blank `search` keeps candidates whose
/// job title or status contains it, ignoring case.
pub async fn list_candidates(
    repository: &dyn CandidateRepository,
    search: Option<&str>,
) -> Result<Vec<Candidate>, AppError> {
    let candidates = repository.list().await?;

    let term = search.map(str::trim).filter(|t| !t.is_empty());
    Ok(match term {
        Some(term) => {
            let term = term.to_lowercase();
            candidates
                .into_iter()
                .filter(|c| matches_search(c, &term))
                .collect()
        }
        None => candidates,
    })
}

fn matches_search(candidate: &Candidate, term_lower: &str) -> bool {
    candidate.job_title.to_lowercase().contains(term_lower)
        || candidate.status.as_str().to_lowercase().contains(term_lower)
}

/// Moves a candidate to any of the three statuses. Only `status` and `updatedAt` change.
pub async fn update_candidate_status(
    repository: &dyn CandidateRepository,
    id: Uuid,
    requested: Option<&str>,
) -> Result<Candidate, AppError> {
    let status = parse_status(requested)?;
    let updated = repository.update_status(id, status).await?;
    info!("Candidate {id} moved to {status}");
    Ok(updated)
}

pub fn parse_status(requested: Option<&str>) -> Result<CandidateStatus, AppError> {
    match requested.map(str::trim) {
        None | Some("") => Err(AppError::field("status", "Status is required")),
        Some(raw) => raw.parse::<CandidateStatus>().map_err(|_| {
            let allowed: Vec<&str> = CandidateStatus::ALL.iter().map(|s| s.as_str()).collect();
            AppError::field(
                "status",
                format!("Status must be one of {}", allowed.join(", ")),
            )
        }),
    }
}

/// Deletes the record, then its stored résumé. A résumé that cannot be removed is only logged.
pub async fn delete_candidate(
    repository: &dyn CandidateRepository,
    resumes: &dyn ResumeStore,
    id: Uuid,
) -> Result<(), AppError> {
    let removed = repository.delete(id).await?;
    info!("Candidate {id} deleted");

    if let Some(name) = removed.resume_url.as_deref().and_then(name_from_url) {
        discard_resume(resumes, name).await;
    }
    Ok(())
}
