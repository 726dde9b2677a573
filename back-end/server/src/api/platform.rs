//! The running platform: database handle plus external collaborators.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::modules::accounts::{AccountService, Actor};
use crate::modules::identity::{IdentityResolver, JwtIssuer};
use crate::modules::payments::PaymentGateway;
use crate::modules::storage::ObjectStorage;
use crate::modules::ServiceResult;

pub struct Platform {
    pub db: DatabaseConnection,
    pub identity: IdentityResolver,
    pub jwt: JwtIssuer,
    pub storage: Arc<dyn ObjectStorage>,
    pub payments: Arc<dyn PaymentGateway>,
}

impl Platform {
    pub fn new(
        db: DatabaseConnection,
        identity: IdentityResolver,
        jwt: JwtIssuer,
        storage: Arc<dyn ObjectStorage>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            db,
            identity,
            jwt,
            storage,
            payments,
        }
    }

    /// Verifies a bearer credential and loads (or provisions) its account.
    pub async fn authenticate(&self, token: &str) -> ServiceResult<Actor> {
        let email = self.identity.resolve(token).await?;
        let user = AccountService::new(&self.db).find_or_provision(&email).await?;
        Ok(Actor::from(&user))
    }

    /// Verifies a bearer credential and loads its account if one exists.
    /// Never provisions.
    pub async fn identify(&self, token: &str) -> ServiceResult<Option<Actor>> {
        let email = self.identity.resolve(token).await?;
        let user = AccountService::new(&self.db).find_existing(&email).await?;
        Ok(user.as_ref().map(Actor::from))
    }
}
