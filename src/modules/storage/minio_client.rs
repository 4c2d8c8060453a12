//! MinIO/S3-compatible photo storage
//!
//! Uses rust-s3 crate for lightweight S3 operations.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use super::{BlobStore, StoredBlob};
use crate::core::config::MinIOConfig;
use crate::core::error::{AppError, Result};

pub struct MinIOBlobStore {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    public_endpoint: String,
    public_prefix: String,
}

impl MinIOBlobStore {
    /// Create the client and make sure the bucket exists
    pub async fn new(config: MinIOConfig) -> Result<Self> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // Path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        let store = Self {
            bucket,
            region,
            credentials,
            public_endpoint: config.public_endpoint.trim_end_matches('/').to_string(),
            public_prefix: config.public_prefix.trim_matches('/').to_string(),
        };

        store.ensure_bucket_exists().await;

        info!(
            "MinIO photo store ready: endpoint={}, bucket={}, public_prefix={}",
            config.endpoint,
            store.bucket.name(),
            store.public_prefix
        );

        Ok(store)
    }

    /// Create the bucket unless it is already there. Never fails startup.
    async fn ensure_bucket_exists(&self) {
        match self.create_bucket().await {
            Ok(()) => info!("Bucket '{}' created successfully", self.bucket.name()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists. \
                        Public read may need: mc anonymous set download minio/{}/{}",
                        self.bucket.name(),
                        e,
                        self.bucket.name(),
                        self.public_prefix
                    );
                }
            }
        }
    }

    async fn create_bucket(&self) -> Result<()> {
        Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await
        .map_err(|e| {
            AppError::Internal(format!(
                "Failed to create bucket '{}': {}",
                self.bucket.name(),
                e
            ))
        })?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.public_endpoint, self.bucket.name(), key)
    }
}

#[async_trait]
impl BlobStore for MinIOBlobStore {
    fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<StoredBlob> {
        let size = data.len();
        self.bucket
            .put_object_with_content_type(key, &data, content_type)
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to upload photo '{}': {}", key, e))
            })?;

        debug!(
            "Uploaded '{}' ({} bytes) to bucket '{}'",
            key,
            size,
            self.bucket.name()
        );

        Ok(StoredBlob {
            key: key.to_string(),
            public_url: self.public_url(key),
        })
    }
}
