// boards.rs - Board handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use bingo_board::{all_bingos, is_board_complete, Board, BoardEvent, Goal, LockTransition};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{AuthUser, MaybeUser, Payload};
use crate::error::ApiError;
use crate::routes::{ok, owned_board};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    pub title: String,
    pub year: i64,
    #[serde(default)]
    pub include_free_space: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBoardRequest {
    pub board_id: Uuid,
    pub title: String,
    pub year: i64,
}

#[derive(Debug, Deserialize)]
pub struct BoardIdRequest {
    pub board_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ToggleLockRequest {
    pub board_id: Uuid,
    pub locked: bool,
}

#[derive(Debug, Deserialize)]
pub struct ToggleShareRequest {
    pub board_id: Uuid,
    pub is_public: bool,
}

#[derive(Debug, Deserialize)]
pub struct ShareQuery {
    pub share: Option<String>,
}

pub async fn list(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let boards = state.store().list_boards_for_user(user.id)?;
    Ok(Json(json!({ "success": true, "boards": boards })))
}

/// Read a board with its goals.
///
/// Owners and friends need a session. Anyone holding the share token may
/// read a public board.
pub async fn show(
    State(state): State<SharedState>,
    MaybeUser(viewer): MaybeUser,
    Path(board_id): Path<Uuid>,
    Query(query): Query<ShareQuery>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store();
    let board = store
        .get_board(board_id)?
        .ok_or_else(|| ApiError::not_found("Board"))?;

    let is_owner = viewer.as_ref().is_some_and(|u| board.is_owned_by(u.id));
    let shared = query
        .share
        .as_deref()
        .is_some_and(|t| board.grants_share_access(t));
    let allowed = is_owner
        || shared
        || match &viewer {
            Some(u) => store.are_friends(u.id, board.user_id)?,
            None => false,
        };
    if !allowed {
        return Err(match viewer {
            Some(_) => ApiError::Forbidden("Access denied".into()),
            None => ApiError::Unauthorized,
        });
    }

    let goals = store.list_goals(board.id)?;
    let owner = store.get_user(board.user_id)?.map(|u| u.summary());
    Ok(Json(json!({
        "success": true,
        "board": board,
        "goals": goals,
        "owner": owner,
        "is_owner": is_owner,
        "bingos": all_bingos(&goals),
        "board_complete": is_board_complete(&goals),
    })))
}

pub async fn create(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Payload(req): Payload<CreateBoardRequest>,
) -> Result<Json<Value>, ApiError> {
    let board = Board::new(user.id, &req.title, req.year)?;
    let free_space = req.include_free_space.then(|| Goal::free_space(board.id));
    state.store().insert_board(&board, free_space.as_ref())?;

    state.events.dispatch(&BoardEvent::board_created(
        board.id,
        user.id,
        &board.title,
        board.year,
    ));
    Ok(Json(json!({ "success": true, "board": board })))
}

/// Rename a board or change its year. Allowed on locked boards.
pub async fn update(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Payload(req): Payload<UpdateBoardRequest>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store();
    let mut board = owned_board(&store, req.board_id, user.id)?;
    board.rename(&req.title, req.year)?;
    store.update_board(&board)?;
    Ok(Json(json!({ "success": true, "board": board })))
}

pub async fn delete(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Payload(req): Payload<BoardIdRequest>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store();
    let board = owned_board(&store, req.board_id, user.id)?;
    store.delete_board(board.id)?;
    tracing::info!(board_id = %board.id, "board deleted");
    Ok(ok())
}

/// Lock a full board. Unlocking is refused; repeating the current state is
/// a no-op.
pub async fn toggle_lock(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Payload(req): Payload<ToggleLockRequest>,
) -> Result<Json<Value>, ApiError> {
    let transition = {
        let store = state.store();
        let mut board = owned_board(&store, req.board_id, user.id)?;
        let filled = store.count_goals(board.id)?;
        let transition = board.request_lock(req.locked, filled)?;
        if transition == LockTransition::Locked {
            store.set_board_locked(&board)?;
        }
        transition
    };
    if transition == LockTransition::Locked {
        state.events.dispatch(&BoardEvent::board_locked(req.board_id));
    }
    Ok(Json(json!({ "success": true, "locked": req.locked })))
}

pub async fn toggle_share(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Payload(req): Payload<ToggleShareRequest>,
) -> Result<Json<Value>, ApiError> {
    let (board, changed) = {
        let store = state.store();
        let mut board = owned_board(&store, req.board_id, user.id)?;
        let changed = board.set_public(req.is_public);
        if changed {
            store.set_board_public(&board)?;
        }
        (board, changed)
    };
    if changed {
        state
            .events
            .dispatch(&BoardEvent::visibility_changed(board.id, board.is_public));
    }

    let share_url = board
        .is_public
        .then(|| state.config.public_url(&board.share_path()));
    Ok(Json(json!({
        "success": true,
        "is_public": board.is_public,
        "share_token": board.share_token,
        "share_url": share_url,
    })))
}

/// A friend's boards. Users outside every group of the viewer are refused.
pub async fn friend_boards(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Path(friend_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store();
    let friend = store
        .get_user(friend_id)?
        .ok_or_else(|| ApiError::not_found("User"))?;
    if friend.id != user.id && !store.are_friends(user.id, friend.id)? {
        return Err(ApiError::Forbidden("Not in a shared group".into()));
    }
    let boards = store.list_boards_for_user(friend.id)?;
    Ok(Json(json!({
        "success": true,
        "user": friend.summary(),
        "boards": boards,
    })))
}
