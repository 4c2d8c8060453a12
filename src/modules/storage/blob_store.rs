use async_trait::async_trait;

use crate::core::error::Result;

/// Location of an uploaded object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Object key inside the bucket
    pub key: String,
    /// URL the photo can be fetched from without credentials
    pub public_url: String,
}

/// Write-once object storage used for report photos
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Key prefix for publicly readable objects, without trailing slash
    fn public_prefix(&self) -> &str;

    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<StoredBlob>;
}
