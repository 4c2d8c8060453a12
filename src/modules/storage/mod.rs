//! Storage module for report photos
//!
//! Photos are written once under a public prefix and served by direct URL.

mod blob_store;
mod minio_client;

pub use blob_store::{BlobStore, StoredBlob};
pub use minio_client::MinIOBlobStore;
