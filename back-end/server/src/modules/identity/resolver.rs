use std::sync::{Arc, Mutex};

use tracing::debug;

use super::cache::{Clock, TokenCache};
use super::provider::IdentityProvider;
use crate::modules::error::ServiceError;

/// Verifies credentials through an [`IdentityProvider`], memoising successes
/// in a [`TokenCache`]. Failures are never cached.
pub struct IdentityResolver {
    provider: Arc<dyn IdentityProvider>,
    cache: Mutex<TokenCache>,
    clock: Arc<dyn Clock>,
}

impl IdentityResolver {
    pub fn new(provider: Arc<dyn IdentityProvider>, cache: TokenCache, clock: Arc<dyn Clock>) -> Self {
        Self {
            provider,
            cache: Mutex::new(cache),
            clock,
        }
    }

    pub async fn resolve(&self, token: &str) -> Result<String, ServiceError> {
        let cached = self.lock_cache().get(token, self.clock.now());
        if let Some(email) = cached {
            return Ok(email);
        }

        let email = self.provider.verify(token).await?;

        let mut cache = self.lock_cache();
        cache.insert(token, email.clone(), self.clock.now());
        debug!(
            cached = cache.len(),
            hits = cache.hits(),
            misses = cache.misses(),
            "Credential verified by provider"
        );
        Ok(email)
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, TokenCache> {
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }
}
