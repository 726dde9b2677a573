//! Subscription purchase flow.

use chrono::Utc;
use entity::{subscription, user};
use sea_orm::prelude::Uuid;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use super::gateway::{Order, PaymentGateway};
use super::plan::SubscriptionPlan;
use crate::modules::accounts::{Actor, Capability};
use crate::modules::error::{ServiceError, ServiceResult};

// ============================================================================
// Domain Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
    pub plan: SubscriptionPlan,
}

// ============================================================================
// Subscription Service
// ============================================================================

pub struct SubscriptionService<'a> {
    db: &'a DatabaseConnection,
    gateway: &'a dyn PaymentGateway,
}

impl<'a> SubscriptionService<'a> {
    pub fn new(db: &'a DatabaseConnection, gateway: &'a dyn PaymentGateway) -> Self {
        Self { db, gateway }
    }

    pub fn create_order(&self, actor: &Actor, plan: SubscriptionPlan) -> ServiceResult<Order> {
        actor.require(Capability::Contribute)?;

        let order = self.gateway.create_order(plan)?;
        info!(user_id = %actor.id, order_id = %order.order_id, plan = %plan, "Order created");
        Ok(order)
    }

    /// Verifies the payment and, in one transaction, records the
    /// subscription and marks the caller premium.
    pub async fn verify_payment(
        &self,
        actor: &Actor,
        confirmation: PaymentConfirmation,
    ) -> ServiceResult<subscription::Model> {
        actor.require(Capability::Contribute)?;

        self.gateway.verify(
            &confirmation.order_id,
            &confirmation.payment_id,
            &confirmation.signature,
        )?;

        let txn = self.db.begin().await?;

        let account = user::Entity::find_by_id(actor.id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))?;

        let now = Utc::now();
        let subscription = subscription::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(actor.id),
            plan_type: Set(confirmation.plan.as_str().to_string()),
            start_date: Set(now.into()),
            end_date: Set((now + confirmation.plan.duration()).into()),
            order_id: Set(Some(confirmation.order_id.clone())),
            payment_id: Set(Some(confirmation.payment_id.clone())),
            is_active: Set(true),
        }
        .insert(&txn)
        .await?;

        let mut account = account.into_active_model();
        account.is_premium = Set(true);
        account.update(&txn).await?;

        txn.commit().await?;

        info!(
            user_id = %actor.id,
            order_id = %confirmation.order_id,
            plan = %confirmation.plan,
            "Premium activated"
        );
        Ok(subscription)
    }

    pub async fn my_subscriptions(&self, actor: &Actor) -> ServiceResult<Vec<subscription::Model>> {
        Ok(subscription::Entity::find()
            .filter(subscription::Column::UserId.eq(actor.id))
            .order_by_desc(subscription::Column::StartDate)
            .all(self.db)
            .await?)
    }
}
