use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    Upload(String),
}

/// Bucket holding the resume PDFs.
#[async_trait]
pub trait ResumeBucket: Send + Sync {
    /// Stores `body` under `key`, replacing any existing object. Returns the
    /// object's public URL.
    async fn upload(&self, key: &str, body: Bytes) -> Result<String, StorageError>;
}

/// Resume bucket reached through the hosted storage's S3-compatible endpoint.
pub struct S3ResumeBucket {
    client: aws_sdk_s3::Client,
    config: Config,
}

impl S3ResumeBucket {
    pub async fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            &config.storage_access_key_id,
            &config.storage_secret_access_key,
            None,
            None,
            "portfolio-static",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.storage_region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&config.storage_s3_endpoint)
            .load()
            .await;

        // Storage gateways of this kind only understand path-style addressing.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            config: config.clone(),
        }
    }
}

#[async_trait]
impl ResumeBucket for S3ResumeBucket {
    async fn upload(&self, key: &str, body: Bytes) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.config.resume_bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type("application/pdf")
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        info!(
            "Uploaded resume to s3://{}/{}",
            self.config.resume_bucket, key
        );
        Ok(self.config.public_resume_url(key))
    }
}
