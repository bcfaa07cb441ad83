//! In-memory doubles for `CandidateRepository` and `ResumeStore`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::candidates::repository::{CandidateRepository, RepositoryError};
use crate::config::{Config, ResumeBackend, DEFAULT_MAX_RESUME_BYTES};
use crate::models::candidate::{Candidate, CandidateStatus, NewCandidate};
use crate::state::AppState;
use crate::storage::{ResumeStore, StorageError};

#[derive(Default, Clone)]
pub struct MemoryRepository {
    records: Arc<Mutex<Vec<Candidate>>>,
}

impl MemoryRepository {
    pub fn snapshot(&self) -> Vec<Candidate> {
        self.records.lock().expect("repository mutex poisoned").clone()
    }
}

#[async_trait]
impl CandidateRepository for MemoryRepository {
    async fn insert(&self, candidate: NewCandidate) -> Result<Candidate, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|c| c.email == candidate.email) {
            return Err(RepositoryError::Conflict);
        }
        // Strictly increasing timestamps keep "newest first" deterministic in tests.
        let created_at = guard
            .iter()
            .map(|c| c.created_at)
            .max()
            .map(|latest| latest.max(Utc::now()) + Duration::milliseconds(1))
            .unwrap_or_else(Utc::now);
        let record = Candidate {
            id: Uuid::new_v4(),
            name: candidate.name,
            email: candidate.email,
            phone: candidate.phone,
            job_title: candidate.job_title,
            status: CandidateStatus::Pending,
            resume_url: candidate.resume_url,
            created_at,
            updated_at: created_at,
        };
        guard.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<Candidate>, RepositoryError> {
        let mut records = self.snapshot();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: CandidateStatus,
    ) -> Result<Candidate, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        record.status = status;
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Candidate, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let index = guard
            .iter()
            .position(|c| c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(guard.remove(index))
    }
}

/// Repository whose every call fails, for surfacing store outages.
pub struct UnavailableRepository;

#[async_trait]
impl CandidateRepository for UnavailableRepository {
    async fn insert(&self, _candidate: NewCandidate) -> Result<Candidate, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    async fn list(&self) -> Result<Vec<Candidate>, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    async fn update_status(
        &self,
        _id: Uuid,
        _status: CandidateStatus,
    ) -> Result<Candidate, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }

    async fn delete(&self, _id: Uuid) -> Result<Candidate, RepositoryError> {
        Err(RepositoryError::Unavailable("offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub struct MemoryResumeStore {
    files: Arc<Mutex<HashMap<String, (Bytes, String)>>>,
}

impl MemoryResumeStore {
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .files
            .lock()
            .expect("store mutex poisoned")
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn put(&self, name: &str, bytes: Bytes, content_type: &str) -> Result<(), StorageError> {
        self.files
            .lock()
            .expect("store mutex poisoned")
            .insert(name.to_string(), (bytes, content_type.to_string()));
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<Bytes>, StorageError> {
        Ok(self
            .files
            .lock()
            .expect("store mutex poisoned")
            .get(name)
            .map(|(bytes, _)| bytes.clone()))
    }

    async fn remove(&self, name: &str) -> Result<(), StorageError> {
        self.files.lock().expect("store mutex poisoned").remove(name);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/referrals_test".to_string(),
        db_max_connections: 1,
        port: 0,
        rust_log: "debug".to_string(),
        max_resume_bytes: DEFAULT_MAX_RESUME_BYTES,
        resume_backend: ResumeBackend::Local {
            upload_dir: PathBuf::from("uploads"),
        },
    }
}

pub fn test_state() -> (AppState, MemoryRepository, MemoryResumeStore) {
    let repository = MemoryRepository::default();
    let resumes = MemoryResumeStore::default();
    let state = AppState {
        candidates: Arc::new(repository.clone()),
        resumes: Arc::new(resumes.clone()),
        config: test_config(),
    };
    (state, repository, resumes)
}
