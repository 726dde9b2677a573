//! Registration, login and profile handlers.

use axum::extract::State;
use axum::response::Json;
use tracing::{error, info};

use crate::api::dto::{
    notes_response, ApiError, CredentialsRequest, NoteResponse, TokenResponse, UserResponse,
};
use crate::api::servers::app_state::AppState;
use crate::api::servers::auth_extractor::CurrentUser;
use crate::api::servers::extract::ApiJson;
use crate::modules::accounts::{AccountService, ProfileUpdate};

/// POST /api/v1/auth/register
pub async fn register(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let service = AccountService::new(&app_state.platform.db);
    let user = service.register(&payload.email, &payload.password).await?;
    Ok(Json(user.into()))
}

/// POST /api/v1/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let platform = &app_state.platform;
    let user = AccountService::new(&platform.db)
        .authenticate(&payload.email, &payload.password)
        .await?;

    let token = platform.jwt.issue(&user.email, &user.role).map_err(|e| {
        error!("Failed to issue token: {}", e);
        ApiError::internal("Failed to issue token")
    })?;

    info!(user_id = %user.id, "User logged in");
    Ok(Json(TokenResponse::bearer(token)))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = AccountService::new(&app_state.platform.db).get(actor.id).await?;
    Ok(Json(user.into()))
}

/// PUT /api/v1/auth/me
pub async fn update_me(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = AccountService::new(&app_state.platform.db)
        .update_profile(&actor, update)
        .await?;
    Ok(Json(user.into()))
}

/// GET /api/v1/auth/me/uploads
pub async fn my_uploads(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let notes = AccountService::new(&app_state.platform.db)
        .my_uploads(&actor)
        .await?;
    Ok(Json(notes_response(notes)))
}

/// GET /api/v1/auth/me/downloads
pub async fn my_downloads(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let notes = AccountService::new(&app_state.platform.db)
        .my_downloads(&actor)
        .await?;
    Ok(Json(notes_response(notes)))
}
