//! Premium subscription checkout handlers.

use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};

use crate::api::dto::{ApiError, CreateOrderRequest, SubscriptionResponse, VerifyPaymentRequest};
use crate::api::servers::app_state::AppState;
use crate::api::servers::auth_extractor::CurrentUser;
use crate::api::servers::extract::ApiJson;
use crate::modules::payments::{Order, PaymentConfirmation, SubscriptionPlan, SubscriptionService};

/// POST /api/v1/subscription/create-order
pub async fn create_order(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiJson(payload): ApiJson<CreateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    let plan: SubscriptionPlan = payload.plan_type.parse()?;
    let platform = &app_state.platform;
    let order = SubscriptionService::new(&platform.db, platform.payments.as_ref())
        .create_order(&actor, plan)?;
    Ok(Json(order))
}

/// POST /api/v1/subscription/verify-payment
pub async fn verify_payment(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiJson(payload): ApiJson<VerifyPaymentRequest>,
) -> Result<Json<Value>, ApiError> {
    let confirmation = PaymentConfirmation {
        order_id: payload.razorpay_order_id,
        payment_id: payload.razorpay_payment_id,
        signature: payload.razorpay_signature,
        plan: payload.plan_type.parse()?,
    };

    let platform = &app_state.platform;
    let subscription = SubscriptionService::new(&platform.db, platform.payments.as_ref())
        .verify_payment(&actor, confirmation)
        .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Premium activated",
        "subscription": SubscriptionResponse::from(subscription),
    })))
}

/// GET /api/v1/subscription/me
pub async fn my_subscriptions(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<SubscriptionResponse>>, ApiError> {
    let platform = &app_state.platform;
    let subscriptions = SubscriptionService::new(&platform.db, platform.payments.as_ref())
        .my_subscriptions(&actor)
        .await?;
    Ok(Json(subscriptions.into_iter().map(SubscriptionResponse::from).collect()))
}
