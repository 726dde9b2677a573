use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use crate::api::dto::ApiError;
use crate::api::servers::app_state::AppState;
use crate::modules::accounts::Actor;

/// Signed-in caller. Rejects the request when the credential is missing or
/// fails verification.
pub struct CurrentUser(pub Actor);

/// Caller if a valid credential for an existing account was presented,
/// anonymous otherwise.
pub struct MaybeUser(pub Option<Actor>);

pub enum AuthError {
    MissingAuthHeader,
    InvalidAuthHeaderFormat,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingAuthHeader => ApiError::unauthorized("Missing Authorization header"),
            AuthError::InvalidAuthHeaderFormat => ApiError::unauthorized(
                "Invalid Authorization header format. Expected: Bearer <token>",
            ),
        }
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidAuthHeaderFormat)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let actor = state.platform.authenticate(token).await?;
        Ok(CurrentUser(actor))
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(parts) {
            Ok(token) => token,
            Err(AuthError::MissingAuthHeader) => return Ok(MaybeUser(None)),
            Err(AuthError::InvalidAuthHeaderFormat) => {
                debug!("Ignoring malformed Authorization header");
                return Ok(MaybeUser(None));
            }
        };

        match state.platform.identify(token).await {
            Ok(Some(actor)) => Ok(MaybeUser(Some(actor))),
            Ok(None) => {
                debug!("Optional credential has no account");
                Ok(MaybeUser(None))
            }
            Err(e) => {
                debug!("Optional credential rejected: {}", e);
                Ok(MaybeUser(None))
            }
        }
    }
}
