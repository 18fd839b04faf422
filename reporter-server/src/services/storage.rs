//! Document storage — rendered artifacts go to S3
//!
//! Objects are named `{request_id}.{ext}` by the dispatcher; same request id
//! always lands on the same key.

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Storage error: {0}")]
pub struct StorageError(pub String);

/// Where an uploaded artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocation {
    pub bucket: String,
    pub key: String,
    pub url: String,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn put(&self, object_name: &str, bytes: &[u8]) -> Result<FileLocation, StorageError>;
}

pub struct S3Storage {
    s3: S3Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(s3: S3Client, bucket: String) -> Self {
        Self { s3, bucket }
    }
}

#[async_trait]
impl FileStorage for S3Storage {
    async fn put(&self, object_name: &str, bytes: &[u8]) -> Result<FileLocation, StorageError> {
        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(object_name)
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await
            .map_err(|e| StorageError(e.to_string()))?;

        Ok(FileLocation {
            bucket: self.bucket.clone(),
            key: object_name.to_string(),
            url: format!("s3://{}/{}", self.bucket, object_name),
        })
    }
}
