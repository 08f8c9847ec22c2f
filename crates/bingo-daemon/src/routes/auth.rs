// auth.rs - Sign-in callback, logout and the current user.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use bingo_board::{token, BoardEvent};
use bingo_social::Identity;
use bingo_store::RedeemOutcome;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{session_token, AuthUser, Payload, SESSION_COOKIE};
use crate::error::ApiError;
use crate::routes::ok;
use crate::state::SharedState;

/// Header carrying the shared secret of the OAuth front end.
pub const AUTH_SECRET_HEADER: &str = "x-bingo-auth-secret";

#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(default)]
    pub invite_token: Option<String>,
}

/// `Set-Cookie` value for the session cookie. `Secure` is added when the
/// daemon is published over https.
fn session_cookie(state: &SharedState, value: &str, max_age: i64) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
    if state.config.is_https() {
        cookie.push_str("; Secure");
    }
    cookie
}

fn redemption_json(outcome: &RedeemOutcome) -> Value {
    match outcome {
        RedeemOutcome::Joined { membership, .. } => json!({
            "status": "joined",
            "group_id": membership.group_id,
        }),
        RedeemOutcome::AlreadyMember => json!({ "status": "already_member" }),
        RedeemOutcome::Rejected(e) => json!({ "status": "rejected", "error": e.to_string() }),
    }
}

/// Exchange a verified identity for a session.
pub async fn callback(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Payload(req): Payload<CallbackRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let presented = headers
        .get(AUTH_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let authorized = state
        .config
        .auth
        .callback_secret
        .as_deref()
        .is_some_and(|secret| token::tokens_match(secret, presented));
    if !authorized {
        tracing::warn!("auth callback with missing or wrong secret");
        return Err(ApiError::Unauthorized);
    }

    let identity = req.identity.validated()?;
    let invite_token = req
        .invite_token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let now = Utc::now();
    let ttl = state.config.session_ttl();

    let (signin, session) = {
        let store = state.store();
        let signin = store.sign_in(&identity, invite_token, now)?;
        let session = store.create_session(signin.user.id, ttl, now)?;
        (signin, session)
    };

    if let Some(RedeemOutcome::Joined { invitation, .. }) = &signin.redemption {
        state.events.dispatch(&BoardEvent::invitation_redeemed(
            invitation.id,
            invitation.inviter_id,
            signin.user.id,
        ));
    }
    tracing::info!(user_id = %signin.user.id, created = signin.created, "signed in");

    let cookie = session_cookie(&state, &session, ttl.num_seconds());
    let body = json!({
        "success": true,
        "token": session,
        "user": signin.user,
        "created": signin.created,
        "invitation": signin.redemption.as_ref().map(redemption_json),
    });
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(body)))
}

/// End the current session. Succeeds even without one.
pub async fn logout(State(state): State<SharedState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(raw) = session_token(&headers) {
        if let Err(e) = state.store().delete_session(&raw) {
            tracing::warn!(error = %e, "failed to delete session");
        }
    }
    let clear = session_cookie(&state, "", 0);
    (AppendHeaders([(SET_COOKIE, clear)]), ok())
}

pub async fn me(AuthUser(user): AuthUser) -> Json<Value> {
    Json(json!({ "success": true, "user": user }))
}
