//! Résumé storage — pluggable, trait-based blob store for uploaded documents.
//!
//! `LocalResumeStore` writes under the upload directory, `S3ResumeStore` writes
//! to an S3/MinIO bucket. Both are served back through `GET /uploads/:name`, so
//! the path recorded on a candidate resolves whichever backend is active.
//!
//! `AppState` holds an `Arc<dyn ResumeStore>`, chosen at startup via config.

pub mod local;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

pub use local::LocalResumeStore;
pub use s3::S3ResumeStore;

/// Route prefix under which stored résumés are retrievable.
pub const UPLOADS_PREFIX: &str = "/uploads/";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 error: {0}")]
    S3(String),

    #[error("Invalid stored name '{0}'")]
    InvalidName(String),
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Stores `bytes` under `name`, replacing nothing: names are unique per upload.
    async fn put(&self, name: &str, bytes: Bytes, content_type: &str) -> Result<(), StorageError>;

    /// Returns the stored bytes, or `None` if nothing is stored under `name`.
    async fn get(&self, name: &str) -> Result<Option<Bytes>, StorageError>;

    /// Removes `name`. Removing a missing name is not an error.
    async fn remove(&self, name: &str) -> Result<(), StorageError>;

    fn backend(&self) -> &'static str;
}

/// Builds a collision-resistant stored name: `<unix-millis>-<8 hex>-<sanitized original>`.
pub fn stored_name(original: &str, now: DateTime<Utc>) -> String {
    let nonce = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        now.timestamp_millis(),
        &nonce[..8],
        sanitize_file_name(original)
    )
}

/// Keeps only the last path component, replaces anything outside `[A-Za-z0-9._-]`
/// and collapses runs of `.`, so the result always passes [`is_safe_name`].
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let mut cleaned = String::with_capacity(base.len());
    for c in base.chars() {
        let c = if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
            c
        } else {
            '_'
        };
        if c == '.' && cleaned.ends_with('.') {
            continue;
        }
        cleaned.push(c);
    }

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "resume.pdf".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Retrieval path recorded on the candidate.
pub fn resume_url(name: &str) -> String {
    format!("{UPLOADS_PREFIX}{name}")
}

/// Inverse of [`resume_url`]. Returns `None` for paths outside the uploads namespace.
pub fn name_from_url(url: &str) -> Option<&str> {
    url.strip_prefix(UPLOADS_PREFIX)
        .filter(|name| is_safe_name(name))
}

/// A stored name must be a single, non-hidden path component.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}
