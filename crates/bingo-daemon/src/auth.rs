// auth.rs - Session extraction.
//
// A session token arrives as `Authorization: Bearer <token>` or as the
// `session` cookie. Only its hash is looked up.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::Json;
use bingo_social::User;
use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::state::SharedState;

pub const SESSION_COOKIE: &str = "session";

/// The raw session token carried by a request, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(bearer) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        let bearer = bearer.trim();
        if !bearer.is_empty() {
            return Some(bearer.to_string());
        }
    }
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

fn resolve_user(parts: &Parts, state: &SharedState) -> Result<Option<User>, ApiError> {
    let Some(token) = session_token(&parts.headers) else {
        return Ok(None);
    };
    let store = state.store();
    match store.resolve_session(&token, Utc::now())? {
        Some(user_id) => Ok(store.get_user(user_id)?),
        None => Ok(None),
    }
}

/// A signed-in user. Rejects with 401 otherwise.
pub struct AuthUser(pub User);

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        resolve_user(parts, state)?
            .map(AuthUser)
            .ok_or(ApiError::Unauthorized)
    }
}

/// The signed-in user, or `None` for anonymous requests.
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<SharedState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolve_user(parts, state)?))
    }
}

/// JSON body whose parse failures use the API error envelope.
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(format!("Malformed payload: {}", e.body_text())))?;
        Ok(Payload(value))
    }
}
