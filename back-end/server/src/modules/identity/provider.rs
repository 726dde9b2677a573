//! Identity providers: turn a bearer credential into a verified email.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::jwt::JwtIssuer;
use crate::modules::error::ServiceError;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns the email the credential was issued for.
    ///
    /// Every failure is reported as `Unauthorized` and is not retried.
    async fn verify(&self, token: &str) -> Result<String, ServiceError>;
}

fn rejected() -> ServiceError {
    ServiceError::Unauthorized("Could not validate credentials".to_string())
}

/// Verifies tokens issued by this server's `/auth/login`.
pub struct LocalJwtProvider {
    issuer: JwtIssuer,
}

impl LocalJwtProvider {
    pub fn new(issuer: JwtIssuer) -> Self {
        Self { issuer }
    }
}

#[async_trait]
impl IdentityProvider for LocalJwtProvider {
    async fn verify(&self, token: &str) -> Result<String, ServiceError> {
        let data = self.issuer.validate(token).map_err(|e| {
            debug!("Local token rejected: {}", e);
            rejected()
        })?;
        Ok(data.claims.sub)
    }
}

/// Hosted auth service (`GET {base}/auth/v1/user`).
pub struct RemoteIdentityProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct RemoteUser {
    email: Option<String>,
}

impl RemoteIdentityProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    async fn verify(&self, token: &str) -> Result<String, ServiceError> {
        let url = format!("{}/auth/v1/user", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| {
                warn!("Identity provider unreachable: {}", e);
                rejected()
            })?;

        if !response.status().is_success() {
            debug!(status = %response.status(), "Identity provider rejected credential");
            return Err(rejected());
        }

        let user: RemoteUser = response.json().await.map_err(|e| {
            warn!("Malformed identity provider response: {}", e);
            rejected()
        })?;

        user.email.filter(|e| !e.is_empty()).ok_or_else(rejected)
    }
}
