use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;

use super::{is_safe_name, ResumeStore, StorageError};

const KEY_PREFIX: &str = "resumes";

/// Résumés as objects under `resumes/` in an S3 or MinIO bucket.
pub struct S3ResumeStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ResumeStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    fn key_for(name: &str) -> Result<String, StorageError> {
        if !is_safe_name(name) {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(format!("{KEY_PREFIX}/{name}"))
    }
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
pub async fn build_s3_client(
    endpoint: &str,
    access_key_id: &str,
    secret_access_key: &str,
) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        "referral-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(endpoint)
        .load()
        .await;

    // MinIO needs path-style addressing.
    let config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(config)
}

#[async_trait]
impl ResumeStore for S3ResumeStore {
    async fn put(&self, name: &str, bytes: Bytes, content_type: &str) -> Result<(), StorageError> {
        let key = Self::key_for(name)?;
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::S3(format!("S3 upload failed: {e}")))?;

        info!("Uploaded resume to s3://{}/{} ({size} bytes)", self.bucket, key);
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Option<Bytes>, StorageError> {
        let key = Self::key_for(name)?;
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e) if e.as_service_error().is_some_and(|se| se.is_no_such_key()) => {
                return Ok(None)
            }
            Err(e) => return Err(StorageError::S3(format!("S3 download failed: {e}"))),
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::S3(format!("S3 body read failed: {e}")))?;
        Ok(Some(data.into_bytes()))
    }

    async fn remove(&self, name: &str) -> Result<(), StorageError> {
        let key = Self::key_for(name)?;
        // DeleteObject succeeds for missing keys.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| StorageError::S3(format!("S3 delete failed: {e}")))?;

        info!("Removed resume s3://{}/{}", self.bucket, key);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "s3"
    }
}
