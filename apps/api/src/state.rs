use std::sync::Arc;

use crate::candidates::repository::CandidateRepository;
use crate::config::Config;
use crate::storage::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Candidate store. Default: `PgCandidateRepository` over the startup pool.
    pub candidates: Arc<dyn CandidateRepository>,
    /// Résumé blobs. Local disk or S3, chosen by `RESUME_STORAGE`.
    pub resumes: Arc<dyn ResumeStore>,
    pub config: Config,
}
