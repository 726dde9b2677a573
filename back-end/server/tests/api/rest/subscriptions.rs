use super::helpers::*;
use crate::bootstrap::init::{setup_test_server, TEST_PAYMENT_KEY_ID, TEST_PAYMENT_SECRET};
use axum::http::StatusCode;
use chrono::DateTime;
use serde_json::json;
use server::modules::payments::sign_payment;

#[tokio::test]
async fn test_create_order_uses_plan_price() {
    let server = setup_test_server().await;
    let (_, token) = server.student("asha@example.com").await;

    let (status, order) = post_json(
        &server.router,
        "/api/v1/subscription/create-order",
        Some(&token),
        json!({"plan_type": "SEMESTER"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["amount"], 49900);
    assert_eq!(order["currency"], "INR");
    assert_eq!(order["key_id"], TEST_PAYMENT_KEY_ID);
    assert_eq!(order["plan"], "SEMESTER");
    assert!(order["order_id"].as_str().unwrap().starts_with("order_"));
}

#[tokio::test]
async fn test_unknown_plan_is_unprocessable() {
    let server = setup_test_server().await;
    let (_, token) = server.student("asha@example.com").await;

    let (status, body) = post_json(
        &server.router,
        "/api/v1/subscription/create-order",
        Some(&token),
        json!({"plan_type": "LIFETIME"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["category"], "unprocessable");
}

#[tokio::test]
async fn test_verified_payment_activates_premium() {
    let server = setup_test_server().await;
    let (_, token) = server.student("asha@example.com").await;

    let signature = sign_payment(TEST_PAYMENT_SECRET, "order_abc123", "pay_xyz789").unwrap();
    let (status, body) = post_json(
        &server.router,
        "/api/v1/subscription/verify-payment",
        Some(&token),
        json!({
            "razorpay_order_id": "order_abc123",
            "razorpay_payment_id": "pay_xyz789",
            "razorpay_signature": signature,
            "plan_type": "YEARLY",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let subscription = &body["subscription"];
    assert_eq!(subscription["plan_type"], "YEARLY");
    assert_eq!(subscription["payment_id"], "pay_xyz789");
    assert_eq!(subscription["is_active"], true);

    let start = DateTime::parse_from_rfc3339(subscription["start_date"].as_str().unwrap()).unwrap();
    let end = DateTime::parse_from_rfc3339(subscription["end_date"].as_str().unwrap()).unwrap();
    assert_eq!((end - start).num_days(), 365);

    let (_, me) = get_authed(&server.router, "/api/v1/auth/me", &token).await;
    assert_eq!(me["is_premium"], true);

    let (status, subs) = get_authed(&server.router, "/api/v1/subscription/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_semester_plan_lasts_180_days() {
    let server = setup_test_server().await;
    let (_, token) = server.student("asha@example.com").await;

    let signature = sign_payment(TEST_PAYMENT_SECRET, "order_s", "pay_s").unwrap();
    let (status, body) = post_json(
        &server.router,
        "/api/v1/subscription/verify-payment",
        Some(&token),
        json!({
            "razorpay_order_id": "order_s",
            "razorpay_payment_id": "pay_s",
            "razorpay_signature": signature,
            "plan_type": "SEMESTER",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let subscription = &body["subscription"];
    let start = DateTime::parse_from_rfc3339(subscription["start_date"].as_str().unwrap()).unwrap();
    let end = DateTime::parse_from_rfc3339(subscription["end_date"].as_str().unwrap()).unwrap();
    assert_eq!((end - start).num_days(), 180);
}

#[tokio::test]
async fn test_bad_signature_is_forbidden_and_changes_nothing() {
    let server = setup_test_server().await;
    let (_, token) = server.student("asha@example.com").await;

    let forged = sign_payment("some-other-secret", "order_abc123", "pay_xyz789").unwrap();
    for signature in [forged.as_str(), "zz-not-hex"] {
        let (status, body) = post_json(
            &server.router,
            "/api/v1/subscription/verify-payment",
            Some(&token),
            json!({
                "razorpay_order_id": "order_abc123",
                "razorpay_payment_id": "pay_xyz789",
                "razorpay_signature": signature,
                "plan_type": "MONTHLY",
            }),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["category"], "forbidden");
    }

    let (_, me) = get_authed(&server.router, "/api/v1/auth/me", &token).await;
    assert_eq!(me["is_premium"], false);
    let (_, subs) = get_authed(&server.router, "/api/v1/subscription/me", &token).await;
    assert!(subs.as_array().unwrap().is_empty());
}
