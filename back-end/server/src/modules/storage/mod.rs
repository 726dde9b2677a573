//! Object storage for uploaded note files.

mod bucket;
mod memory;

pub use bucket::BucketStorage;
pub use memory::{MemoryObjectStorage, StoredObject};

use async_trait::async_trait;
use sea_orm::prelude::Uuid;

use crate::modules::error::ServiceError;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `bytes` at `path` and returns the public URL of the object.
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<String, ServiceError>;
}

/// `{user_id}/{random uuid}.{ext}`, with the extension taken from the
/// uploaded file name (`bin` when it has none).
pub fn object_path(user_id: Uuid, file_name: &str) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("bin");

    format!("{}/{}.{}", user_id, Uuid::new_v4(), ext.to_ascii_lowercase())
}
