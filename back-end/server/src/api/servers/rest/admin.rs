//! Settings and user management handlers.

use axum::extract::State;
use axum::response::Json;
use uuid::Uuid;

use crate::api::dto::{ApiError, PremiumRequest, RoleRequest, SettingResponse, UserResponse};
use crate::api::servers::app_state::AppState;
use crate::api::servers::auth_extractor::CurrentUser;
use crate::api::servers::extract::{ApiJson, ApiPath};
use crate::modules::accounts::{AccountService, Role};
use crate::modules::settings::{PublicConfig, SettingService, SettingUpsert};

// ============================================================================
// Settings
// ============================================================================

/// GET /api/v1/admin/settings
pub async fn list_settings(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<SettingResponse>>, ApiError> {
    let settings = SettingService::new(&app_state.platform.db)
        .list(&actor)
        .await?;
    Ok(Json(settings.into_iter().map(SettingResponse::from).collect()))
}

/// POST /api/v1/admin/settings
pub async fn upsert_setting(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiJson(payload): ApiJson<SettingUpsert>,
) -> Result<Json<SettingResponse>, ApiError> {
    let setting = SettingService::new(&app_state.platform.db)
        .upsert(&actor, payload)
        .await?;
    Ok(Json(setting.into()))
}

/// GET /api/v1/admin/public-config
pub async fn public_config(
    State(app_state): State<AppState>,
) -> Result<Json<PublicConfig>, ApiError> {
    let config = SettingService::new(&app_state.platform.db)
        .public_config()
        .await?;
    Ok(Json(config))
}

// ============================================================================
// Users
// ============================================================================

/// GET /api/v1/admin/users
pub async fn list_users(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = AccountService::new(&app_state.platform.db)
        .list_users(&actor)
        .await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// PUT /api/v1/admin/users/{id}/role
pub async fn set_role(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<RoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let role: Role = payload.role.parse()?;
    let user = AccountService::new(&app_state.platform.db)
        .set_role(&actor, user_id, role)
        .await?;
    Ok(Json(user.into()))
}

/// PUT /api/v1/admin/users/{id}/premium
pub async fn set_premium(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(user_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<PremiumRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = AccountService::new(&app_state.platform.db)
        .set_premium(&actor, user_id, payload.is_premium)
        .await?;
    Ok(Json(user.into()))
}
