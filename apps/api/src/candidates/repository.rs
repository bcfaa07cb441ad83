use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::candidate::{Candidate, CandidateStatus, NewCandidate};

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A candidate with the same normalized email already exists.
    #[error("record already exists")]
    Conflict,

    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Conflict,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                RepositoryError::Unavailable(e.to_string())
            }
            _ => RepositoryError::Database(e),
        }
    }
}

/// Storage for candidate records.
///
/// Implementations must reject a second record with an equal `email` with
/// `RepositoryError::Conflict`, including under concurrent inserts.
#[async_trait]
pub trait CandidateRepository: Send + Sync {
    async fn insert(&self, candidate: NewCandidate) -> Result<Candidate, RepositoryError>;

    /// All candidates, newest first, ties broken by id descending.
    async fn list(&self) -> Result<Vec<Candidate>, RepositoryError>;

    async fn update_status(
        &self,
        id: Uuid,
        status: CandidateStatus,
    ) -> Result<Candidate, RepositoryError>;

    /// Deletes and returns the removed record.
    async fn delete(&self, id: Uuid) -> Result<Candidate, RepositoryError>;
}

/// PostgreSQL-backed repository. Uniqueness comes from `candidates_email_key`.
#[derive(Clone)]
pub struct PgCandidateRepository {
    pool: PgPool,
}

impl PgCandidateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateRepository for PgCandidateRepository {
    async fn insert(&self, candidate: NewCandidate) -> Result<Candidate, RepositoryError> {
        let id = Uuid::new_v4();
        let row = sqlx::query_as::<_, Candidate>(
            r#"
            INSERT INTO candidates (id, name, email, phone, job_title, status, resume_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(&candidate.phone)
        .bind(&candidate.job_title)
        .bind(CandidateStatus::Pending)
        .bind(&candidate.resume_url)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted candidate {id}");
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Ok(sqlx::query_as::<_, Candidate>(
            "SELECT * FROM candidates ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: CandidateStatus,
    ) -> Result<Candidate, RepositoryError> {
        sqlx::query_as::<_, Candidate>(
            r#"
            UPDATE candidates
            SET status = $1, updated_at = now()
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: Uuid) -> Result<Candidate, RepositoryError> {
        sqlx::query_as::<_, Candidate>("DELETE FROM candidates WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}
