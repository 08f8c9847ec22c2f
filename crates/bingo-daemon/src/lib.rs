//! # bingo-daemon
//!
//! HTTP API for Bingo Boards.
//!
//! Users sign in through an external OAuth front end, which posts the
//! verified identity to `/api/auth/callback` and receives a session token.
//! Every other route is JSON in, JSON out, with a `success` flag on every
//! response.

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::DaemonConfig;
pub use error::ApiError;
pub use state::{AppState, SharedState};

/// Build the full router.
pub fn build_router(state: SharedState) -> Router {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));
    match HeaderValue::from_str(state.config.server.base_url.trim_end_matches('/')) {
        Ok(origin) => cors = cors.allow_origin(origin).allow_credentials(true),
        Err(e) => tracing::warn!(error = %e, "base_url is not a valid origin; CORS disabled"),
    }

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/auth/callback", post(routes::auth::callback))
        .route("/api/logout", post(routes::auth::logout))
        .route("/api/me", get(routes::auth::me))
        .route("/api/boards", get(routes::boards::list))
        .route("/api/boards/{id}", get(routes::boards::show))
        .route("/api/boards/create", post(routes::boards::create))
        .route("/api/boards/update", post(routes::boards::update))
        .route("/api/boards/delete", post(routes::boards::delete))
        .route("/api/boards/toggle-lock", post(routes::boards::toggle_lock))
        .route("/api/boards/toggle-share", post(routes::boards::toggle_share))
        .route("/api/goals/create", post(routes::goals::create))
        .route("/api/goals/update", post(routes::goals::update))
        .route("/api/goals/delete", post(routes::goals::delete))
        .route("/api/invitations/create", post(routes::invitations::create))
        .route("/api/invitations/accept", post(routes::invitations::accept))
        .route("/api/groups/members", get(routes::groups::members))
        .route("/api/groups/my-groups", get(routes::groups::my_groups))
        .route("/api/groups/leave", post(routes::groups::leave))
        .route("/api/groups/remove-member", post(routes::groups::remove_member))
        .route("/api/friends/{user_id}/boards", get(routes::boards::friend_boards))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
