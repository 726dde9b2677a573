use async_trait::async_trait;
use tracing::{error, info};

use super::ObjectStorage;
use crate::modules::error::ServiceError;

/// Bucket-style HTTP object store.
///
/// Uploads go to `POST {base}/storage/v1/object/{bucket}/{path}` and objects
/// are served from `{base}/storage/v1/object/public/{bucket}/{path}`.
pub struct BucketStorage {
    client: reqwest::Client,
    base_url: Option<String>,
    api_key: Option<String>,
    bucket: String,
}

impl BucketStorage {
    pub fn new(base_url: Option<String>, api_key: Option<String>, bucket: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            api_key,
            bucket: bucket.to_string(),
        }
    }

    fn credentials(&self) -> Result<(&str, &str), ServiceError> {
        match (&self.base_url, &self.api_key) {
            (Some(url), Some(key)) => Ok((url.as_str(), key.as_str())),
            _ => Err(ServiceError::unavailable(
                "Object storage credentials not configured",
            )),
        }
    }

    pub fn public_url(base_url: &str, bucket: &str, path: &str) -> String {
        format!("{base_url}/storage/v1/object/public/{bucket}/{path}")
    }
}

#[async_trait]
impl ObjectStorage for BucketStorage {
    async fn put(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, ServiceError> {
        let (base_url, api_key) = self.credentials()?;
        let url = format!("{}/storage/v1/object/{}/{}", base_url, self.bucket, path);
        let size = bytes.len();

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .header("apikey", api_key)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| {
                error!("Object upload failed: {}", e);
                ServiceError::unavailable("Failed to upload file to storage")
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "Object store rejected upload");
            return Err(ServiceError::unavailable("Failed to upload file to storage"));
        }

        info!(path = %path, size, "Object stored");
        Ok(Self::public_url(base_url, &self.bucket, path))
    }
}
