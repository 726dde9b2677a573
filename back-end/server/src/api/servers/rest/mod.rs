//! REST API router configuration.
//!
//! This module contains route definitions and server startup logic.
//! All handler implementations are in their respective submodules.

mod accounts;
mod admin;
mod circulars;
mod health;
mod interactions;
mod notes;
mod subscriptions;

use std::any::Any;

use axum::extract::DefaultBodyLimit;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;
use errors::AppError;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, ORIGIN};
use http::{HeaderValue, Method};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::api::dto::ApiError;
use crate::api::servers::app_state::AppState;
use crate::bootstrap::config::Config;

/// Build the REST API router with all routes.
pub fn build_router(app_state: AppState, config: &Config) -> Router {
    let cors = build_cors_layer(config);
    let api = "/api/v1";

    Router::new()
        // Health
        .route(&format!("{api}/health"), get(health::check))
        // Accounts
        .route(&format!("{api}/auth/register"), post(accounts::register))
        .route(&format!("{api}/auth/login"), post(accounts::login))
        .route(
            &format!("{api}/auth/me"),
            get(accounts::me).put(accounts::update_me),
        )
        .route(&format!("{api}/auth/me/uploads"), get(accounts::my_uploads))
        .route(
            &format!("{api}/auth/me/downloads"),
            get(accounts::my_downloads),
        )
        // Notes
        .route(&format!("{api}/notes"), get(notes::list))
        .route(&format!("{api}/notes/upload"), post(notes::upload))
        .route(&format!("{api}/notes/pending"), get(notes::pending))
        .route(&format!("{api}/notes/admin/all"), get(notes::admin_all))
        .route(&format!("{api}/notes/leaderboard"), get(notes::leaderboard))
        .route(
            &format!("{api}/notes/{{id}}"),
            put(notes::update).delete(notes::delete),
        )
        .route(&format!("{api}/notes/{{id}}/verify"), put(notes::verify))
        // Votes, reviews, downloads
        .route(
            &format!("{api}/notes/{{id}}/vote"),
            get(interactions::vote_state).post(interactions::cast_vote),
        )
        .route(
            &format!("{api}/notes/{{id}}/review"),
            post(interactions::add_review),
        )
        .route(
            &format!("{api}/notes/{{id}}/reviews"),
            get(interactions::list_reviews),
        )
        .route(
            &format!("{api}/notes/{{id}}/download"),
            post(interactions::record_download),
        )
        // Subscriptions
        .route(
            &format!("{api}/subscription/create-order"),
            post(subscriptions::create_order),
        )
        .route(
            &format!("{api}/subscription/verify-payment"),
            post(subscriptions::verify_payment),
        )
        .route(
            &format!("{api}/subscription/me"),
            get(subscriptions::my_subscriptions),
        )
        // Admin
        .route(
            &format!("{api}/admin/settings"),
            get(admin::list_settings).post(admin::upsert_setting),
        )
        .route(
            &format!("{api}/admin/public-config"),
            get(admin::public_config),
        )
        .route(&format!("{api}/admin/users"), get(admin::list_users))
        .route(
            &format!("{api}/admin/users/{{id}}/role"),
            put(admin::set_role),
        )
        .route(
            &format!("{api}/admin/users/{{id}}/premium"),
            put(admin::set_premium),
        )
        // Circulars
        .route(
            &format!("{api}/circulars"),
            get(circulars::list).post(circulars::create),
        )
        .route(
            &format!("{api}/circulars/{{id}}"),
            axum::routing::delete(circulars::delete),
        )
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(config.server.max_upload_bytes))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let allow_origin = if config.cors.allows_any_origin() {
        // A literal `*` cannot be combined with credentials
        if config.cors.allow_credentials {
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::any()
        }
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse::<HeaderValue>().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, ACCEPT, CONTENT_TYPE, AUTHORIZATION])
        .max_age(std::time::Duration::from_secs(3600));

    if config.cors.allow_credentials {
        cors = cors.allow_credentials(true);
    }

    cors
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    error!(panic = %detail, "Request handler panicked");
    ApiError::internal("Internal server error").into_response()
}

/// Start the REST server. Returns after a ctrl-c triggered graceful shutdown.
pub async fn start(app_state: &AppState, config: &Config) -> Result<(), AppError> {
    let app = build_router(app_state.clone(), config);
    let bind_addr = format!("{}:{}", config.server.host, config.server.rest_port);

    info!("Starting REST server on {}", &bind_addr);
    info!("CORS allowed origins: {:?}", config.cors.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
