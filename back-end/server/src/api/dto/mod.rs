//! Request/response bodies and the API error type.

mod error;

pub use error::ApiError;

use entity::{circular, note, subscription, system_setting, user};
use sea_orm::prelude::{DateTimeWithTimeZone, Uuid};
use serde::{Deserialize, Serialize};

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub is_premium: bool,
    pub created_at: DateTimeWithTimeZone,
    pub full_name: Option<String>,
    pub mobile_number: Option<String>,
    pub semester: Option<i32>,
    pub cgpa: Option<f64>,
    pub sgpa: Option<f64>,
    pub target_cgpa: Option<f64>,
    pub study_hours: f64,
}

impl From<user::Model> for UserResponse {
    fn from(u: user::Model) -> Self {
        Self {
            id: u.id,
            email: u.email,
            role: u.role,
            is_premium: u.is_premium,
            created_at: u.created_at,
            full_name: u.full_name,
            mobile_number: u.mobile_number,
            semester: u.semester,
            cgpa: u.cgpa,
            sgpa: u.sgpa,
            target_cgpa: u.target_cgpa,
            study_hours: u.study_hours,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct PremiumRequest {
    pub is_premium: bool,
}

// ============================================================================
// Notes
// ============================================================================

/// Note as returned by every listing. `file_url` is whatever the producing
/// service chose to expose: gated for listings, real for the uploader's own.
#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: Uuid,
    pub title: String,
    pub file_url: String,
    pub uploaded_by: Option<Uuid>,
    pub status: String,
    pub university: String,
    pub branch: String,
    pub semester: i32,
    pub subject: String,
    pub is_premium: bool,
    pub category: String,
    pub year: Option<i32>,
    pub vote_count: i32,
    pub rating: f64,
    pub rating_count: i32,
    pub created_at: DateTimeWithTimeZone,
}

impl From<note::Model> for NoteResponse {
    fn from(n: note::Model) -> Self {
        Self {
            id: n.id,
            title: n.title,
            file_url: n.file_url,
            uploaded_by: n.uploaded_by,
            status: n.status,
            university: n.university,
            branch: n.branch,
            semester: n.semester,
            subject: n.subject,
            is_premium: n.is_premium,
            category: n.category,
            year: n.year,
            vote_count: n.vote_count,
            rating: n.rating,
            rating_count: n.rating_count,
            created_at: n.created_at,
        }
    }
}

pub fn notes_response(notes: Vec<note::Model>) -> Vec<NoteResponse> {
    notes.into_iter().map(NoteResponse::from).collect()
}

#[derive(Debug, Default, Deserialize)]
pub struct ListNotesParams {
    pub branch: Option<String>,
    pub semester: Option<i32>,
    pub subject: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub limit: Option<u64>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitParams {
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    pub action: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NoteUpdateRequest {
    pub title: Option<String>,
    pub status: Option<String>,
    pub is_premium: Option<bool>,
}

// ============================================================================
// Interactions
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub vote_type: i32,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i32,
    pub comment: Option<String>,
}

// ============================================================================
// Subscriptions
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub plan_type: String,
}

/// Field names follow the gateway's checkout callback.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    pub plan_type: String,
}

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub plan_type: String,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub is_active: bool,
}

impl From<subscription::Model> for SubscriptionResponse {
    fn from(s: subscription::Model) -> Self {
        Self {
            id: s.id,
            plan_type: s.plan_type,
            start_date: s.start_date,
            end_date: s.end_date,
            order_id: s.order_id,
            payment_id: s.payment_id,
            is_active: s.is_active,
        }
    }
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SettingResponse {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<system_setting::Model> for SettingResponse {
    fn from(s: system_setting::Model) -> Self {
        Self {
            key: s.key,
            value: s.value,
            description: s.description,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CircularResponse {
    pub id: Uuid,
    pub title: String,
    pub message: Option<String>,
    pub link: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

impl From<circular::Model> for CircularResponse {
    fn from(c: circular::Model) -> Self {
        Self {
            id: c.id,
            title: c.title,
            message: c.message,
            link: c.link,
            created_at: c.created_at,
        }
    }
}
