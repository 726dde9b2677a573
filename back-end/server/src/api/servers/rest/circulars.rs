//! Circular (announcement) handlers.

use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::dto::{ApiError, CircularResponse};
use crate::api::servers::app_state::AppState;
use crate::api::servers::auth_extractor::CurrentUser;
use crate::api::servers::extract::{ApiJson, ApiPath};
use crate::modules::circulars::{CircularService, NewCircular};

/// GET /api/v1/circulars
pub async fn list(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<CircularResponse>>, ApiError> {
    let circulars = CircularService::new(&app_state.platform.db).list().await?;
    Ok(Json(circulars.into_iter().map(CircularResponse::from).collect()))
}

/// POST /api/v1/circulars
pub async fn create(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiJson(payload): ApiJson<NewCircular>,
) -> Result<Json<CircularResponse>, ApiError> {
    let circular = CircularService::new(&app_state.platform.db)
        .create(&actor, payload)
        .await?;
    Ok(Json(circular.into()))
}

/// DELETE /api/v1/circulars/{id}
pub async fn delete(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(circular_id): ApiPath<Uuid>,
) -> Result<Json<Value>, ApiError> {
    CircularService::new(&app_state.platform.db)
        .delete(&actor, circular_id)
        .await?;
    Ok(Json(json!({"message": "Circular deleted"})))
}
