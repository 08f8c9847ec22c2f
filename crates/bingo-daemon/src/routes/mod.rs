//! HTTP handlers, one module per resource.

pub mod auth;
pub mod boards;
pub mod goals;
pub mod groups;
pub mod invitations;

use axum::Json;
use bingo_board::Board;
use bingo_store::Store;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;

/// Load a board and require that `user_id` owns it.
pub(crate) fn owned_board(
    store: &Store,
    board_id: Uuid,
    user_id: Uuid,
) -> Result<Board, ApiError> {
    let board = store
        .get_board(board_id)?
        .ok_or_else(|| ApiError::not_found("Board"))?;
    if !board.is_owned_by(user_id) {
        return Err(ApiError::Forbidden("Unauthorized to modify this board".into()));
    }
    Ok(board)
}

pub(crate) fn ok() -> Json<Value> {
    Json(json!({ "success": true }))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
