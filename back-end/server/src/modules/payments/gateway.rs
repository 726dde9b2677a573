//! Payment gateway: order creation and payment signature checks.

use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use tracing::warn;

use super::plan::{SubscriptionPlan, CURRENCY};
use crate::modules::error::ServiceError;
use sea_orm::prelude::Uuid;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
    pub plan: SubscriptionPlan,
}

pub trait PaymentGateway: Send + Sync {
    fn create_order(&self, plan: SubscriptionPlan) -> Result<Order, ServiceError>;

    /// Checks the gateway signature over `"{order_id}|{payment_id}"`.
    fn verify(&self, order_id: &str, payment_id: &str, signature: &str)
        -> Result<(), ServiceError>;
}

/// Razorpay-compatible gateway. Orders are minted locally; checkout
/// signatures are HMAC-SHA256 with the key secret.
pub struct RazorpayGateway {
    key_id: Option<String>,
    key_secret: Option<String>,
}

impl RazorpayGateway {
    pub fn new(key_id: Option<String>, key_secret: Option<String>) -> Self {
        Self { key_id, key_secret }
    }

    fn key_id(&self) -> Result<&str, ServiceError> {
        self.key_id
            .as_deref()
            .ok_or_else(|| ServiceError::unavailable("Payment gateway not configured"))
    }

    fn key_secret(&self) -> Result<&str, ServiceError> {
        self.key_secret
            .as_deref()
            .ok_or_else(|| ServiceError::unavailable("Payment gateway not configured"))
    }
}

impl PaymentGateway for RazorpayGateway {
    fn create_order(&self, plan: SubscriptionPlan) -> Result<Order, ServiceError> {
        let key_id = self.key_id()?;
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(10).collect();

        Ok(Order {
            order_id: format!("order_{suffix}"),
            amount: plan.amount(),
            currency: CURRENCY.to_string(),
            key_id: key_id.to_string(),
            plan,
        })
    }

    fn verify(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), ServiceError> {
        let secret = self.key_secret()?;
        let rejected = || ServiceError::Forbidden("Payment verification failed".to_string());

        let expected = hex::decode(signature.trim()).map_err(|_| {
            warn!(order_id = %order_id, "Payment signature is not hex");
            rejected()
        })?;

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|e| ServiceError::internal(format!("Invalid HMAC key: {e}")))?;
        mac.update(payment_message(order_id, payment_id).as_bytes());

        mac.verify_slice(&expected).map_err(|_| {
            warn!(order_id = %order_id, "Payment signature mismatch");
            rejected()
        })
    }
}

fn payment_message(order_id: &str, payment_id: &str) -> String {
    format!("{order_id}|{payment_id}")
}

/// Signature the gateway's checkout attaches to a successful payment.
pub fn sign_payment(
    secret: &str,
    order_id: &str,
    payment_id: &str,
) -> Result<String, ServiceError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| ServiceError::internal(format!("Invalid HMAC key: {e}")))?;
    mac.update(payment_message(order_id, payment_id).as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
