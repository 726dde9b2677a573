use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::ObjectStorage;
use crate::modules::error::ServiceError;

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// In-process object store for local development and tests.
#[derive(Debug)]
pub struct MemoryObjectStorage {
    bucket: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryObjectStorage {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub fn public_url(&self, path: &str) -> String {
        format!("memory://{}/{}", self.bucket, path)
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ServiceError> {
        let object = StoredObject {
            bytes,
            content_type: content_type.to_string(),
        };
        self.objects.write().await.insert(path.to_string(), object);
        Ok(self.public_url(path))
    }
}
