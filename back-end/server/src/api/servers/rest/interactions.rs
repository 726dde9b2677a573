//! Vote, review and download handlers.

use axum::extract::State;
use axum::response::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::api::dto::{ApiError, ReviewRequest, VoteRequest};
use crate::api::servers::app_state::AppState;
use crate::api::servers::auth_extractor::CurrentUser;
use crate::api::servers::extract::{ApiJson, ApiPath};
use crate::modules::interaction::{
    DownloadService, RatingAggregator, ReviewView, VoteLedger, VoteOutcome,
};

/// POST /api/v1/notes/{id}/vote
pub async fn cast_vote(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(note_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<VoteRequest>,
) -> Result<Json<VoteOutcome>, ApiError> {
    let outcome = VoteLedger::new(&app_state.platform.db)
        .cast_vote(&actor, note_id, payload.vote_type)
        .await?;
    Ok(Json(outcome))
}

/// GET /api/v1/notes/{id}/vote
pub async fn vote_state(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(note_id): ApiPath<Uuid>,
) -> Result<Json<VoteOutcome>, ApiError> {
    let outcome = VoteLedger::new(&app_state.platform.db)
        .vote_state(&actor, note_id)
        .await?;
    Ok(Json(outcome))
}

/// POST /api/v1/notes/{id}/review
pub async fn add_review(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(note_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ReviewRequest>,
) -> Result<Json<ReviewView>, ApiError> {
    let review = RatingAggregator::new(&app_state.platform.db)
        .add_review(&actor, note_id, payload.rating, payload.comment)
        .await?;
    Ok(Json(review))
}

/// GET /api/v1/notes/{id}/reviews
pub async fn list_reviews(
    State(app_state): State<AppState>,
    ApiPath(note_id): ApiPath<Uuid>,
) -> Result<Json<Vec<ReviewView>>, ApiError> {
    let reviews = RatingAggregator::new(&app_state.platform.db)
        .list_reviews(note_id)
        .await?;
    Ok(Json(reviews))
}

/// POST /api/v1/notes/{id}/download
pub async fn record_download(
    State(app_state): State<AppState>,
    CurrentUser(actor): CurrentUser,
    ApiPath(note_id): ApiPath<Uuid>,
) -> Result<Json<Value>, ApiError> {
    DownloadService::new(&app_state.platform.db)
        .record_download(&actor, note_id)
        .await?;
    Ok(Json(json!({"message": "Download recorded"})))
}
