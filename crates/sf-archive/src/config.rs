//! S3-compatible storage configuration.

use serde::{Deserialize, Serialize};
use std::env;

/// Connection settings for an S3-compatible bucket.
///
/// The secret key is skipped by `Debug`.
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Custom endpoint (MinIO, localstack); `None` uses AWS.
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub path_style: bool,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .field("path_style", &self.path_style)
            .finish()
    }
}

impl StorageConfig {
    /// Read `S3_ENDPOINT`, `S3_REGION`, `S3_BUCKET`, `S3_ACCESS_KEY` (or
    /// `AWS_ACCESS_KEY_ID`), `S3_SECRET_KEY` (or `AWS_SECRET_ACCESS_KEY`) and
    /// `S3_PATH_STYLE`.
    pub fn from_env() -> crate::Result<Self> {
        let bucket = env::var("S3_BUCKET").map_err(|_| {
            crate::Error::new(crate::ErrorKind::Config("S3_BUCKET is not set".to_string()))
        })?;
        let access_key = env::var("S3_ACCESS_KEY")
            .or_else(|_| env::var("AWS_ACCESS_KEY_ID"))
            .map_err(|_| {
                crate::Error::new(crate::ErrorKind::Config(
                    "S3_ACCESS_KEY or AWS_ACCESS_KEY_ID must be set".to_string(),
                ))
            })?;
        let secret_key = env::var("S3_SECRET_KEY")
            .or_else(|_| env::var("AWS_SECRET_ACCESS_KEY"))
            .map_err(|_| {
                crate::Error::new(crate::ErrorKind::Config(
                    "S3_SECRET_KEY or AWS_SECRET_ACCESS_KEY must be set".to_string(),
                ))
            })?;

        Ok(Self {
            endpoint: env::var("S3_ENDPOINT").ok(),
            region: env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            bucket,
            access_key,
            secret_key,
            path_style: env::var("S3_PATH_STYLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        })
    }

    /// Settings for a local MinIO with its default credentials.
    pub fn for_minio(endpoint: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            region: "us-east-1".to_string(),
            bucket: bucket.into(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            path_style: true,
        }
    }
}
