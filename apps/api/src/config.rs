use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Default résumé ceiling: 5 MB.
pub const DEFAULT_MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

/// Where uploaded résumés are kept.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeBackend {
    /// Files on local disk under `upload_dir`.
    Local { upload_dir: PathBuf },
    /// Objects in an S3-compatible bucket (AWS or MinIO).
    S3 {
        bucket: String,
        endpoint: String,
        access_key_id: String,
        secret_access_key: String,
    },
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub port: u16,
    pub rust_log: String,
    pub max_resume_bytes: usize,
    pub resume_backend: ResumeBackend,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let resume_backend = match lookup("RESUME_STORAGE")
            .unwrap_or_else(|| "local".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "local" => ResumeBackend::Local {
                upload_dir: PathBuf::from(
                    lookup("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()),
                ),
            },
            "s3" => ResumeBackend::S3 {
                bucket: require("S3_BUCKET")?,
                endpoint: require("S3_ENDPOINT")?,
                access_key_id: require("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
            },
            other => bail!("RESUME_STORAGE must be 'local' or 's3', got '{other}'"),
        };

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse::<u32>()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_resume_bytes: match lookup("MAX_RESUME_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_RESUME_BYTES must be a byte count")?,
                None => DEFAULT_MAX_RESUME_BYTES,
            },
            resume_backend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_with_only_database_url() {
        let config =
            Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/referrals")]))
                .unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.max_resume_bytes, DEFAULT_MAX_RESUME_BYTES);
        assert_eq!(
            config.resume_backend,
            ResumeBackend::Local {
                upload_dir: PathBuf::from("uploads")
            }
        );
    }

    #[test]
    fn test_missing_database_url_fails() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_s3_backend_requires_bucket() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/referrals"),
            ("RESUME_STORAGE", "s3"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET"));
    }

    #[test]
    fn test_s3_backend_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/referrals"),
            ("RESUME_STORAGE", "S3"),
            ("S3_BUCKET", "resumes"),
            ("S3_ENDPOINT", "http://localhost:9000"),
            ("AWS_ACCESS_KEY_ID", "minio"),
            ("AWS_SECRET_ACCESS_KEY", "minio123"),
        ]))
        .unwrap();
        match config.resume_backend {
            ResumeBackend::S3 { bucket, .. } => assert_eq!(bucket, "resumes"),
            other => panic!("expected S3 backend, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/referrals"),
            ("RESUME_STORAGE", "ftp"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("RESUME_STORAGE"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/referrals"),
            ("PORT", "not-a-port"),
        ]))
        .is_err());
    }

    #[test]
    fn test_custom_resume_ceiling() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/referrals"),
            ("MAX_RESUME_BYTES", "1024"),
        ]))
        .unwrap();
        assert_eq!(config.max_resume_bytes, 1024);
    }
}
