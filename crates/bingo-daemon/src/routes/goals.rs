// goals.rs - Goal handlers, including bingo detection on completion.

use axum::extract::State;
use axum::Json;
use bingo_board::{
    celebration_sequence, BoardError, BoardEvent, CompletionOutcome, Goal, GoalEdit,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{AuthUser, Payload};
use crate::error::ApiError;
use crate::routes::{ok, owned_board};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub board_id: Uuid,
    pub position: i64,
    pub text: String,
    #[serde(default)]
    pub is_free_space: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    pub goal_id: Uuid,
    #[serde(flatten)]
    pub edit: GoalEdit,
}

#[derive(Debug, Deserialize)]
pub struct GoalIdRequest {
    pub goal_id: Uuid,
}

pub async fn create(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Payload(req): Payload<CreateGoalRequest>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store();
    let board = owned_board(&store, req.board_id, user.id)?;
    if board.locked {
        return Err(BoardError::Locked.into());
    }
    let goal = Goal::create(board.id, req.position, &req.text, req.is_free_space)?;
    store.insert_goal(&goal)?;
    Ok(Json(json!({ "success": true, "goal": goal })))
}

/// Edit a goal. A completion also reports any new bingo, whether the
/// board is now complete, and the celebration cues to play.
pub async fn update(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Payload(req): Payload<UpdateGoalRequest>,
) -> Result<Json<Value>, ApiError> {
    let (goal, outcome) = {
        let store = state.store();
        let (mut goal, board) = store
            .get_goal_with_board(req.goal_id)?
            .ok_or_else(|| ApiError::not_found("Goal"))?;
        if !board.is_owned_by(user.id) {
            return Err(ApiError::Forbidden("Access denied".into()));
        }

        let completion = goal.apply(&req.edit, board.locked)?;
        store.update_goal(&goal)?;

        let outcome = if completion {
            let goals = store.list_goals(board.id)?;
            Some(CompletionOutcome::evaluate(&goals, goal.position))
        } else {
            None
        };
        (goal, outcome)
    };

    if let Some(outcome) = &outcome {
        state
            .events
            .dispatch(&BoardEvent::goal_completed(goal.board_id, goal.id, goal.position));
        if let Some(kind) = outcome.bingo {
            state
                .events
                .dispatch(&BoardEvent::bingo_achieved(goal.board_id, kind, goal.position));
        }
        if outcome.board_complete {
            state
                .events
                .dispatch(&BoardEvent::board_completed(goal.board_id));
        }
    }

    let celebrations = outcome.as_ref().map(celebration_sequence).unwrap_or_default();
    let outcome = outcome.unwrap_or_default();
    Ok(Json(json!({
        "success": true,
        "goal": goal,
        "bingoType": outcome.bingo,
        "boardComplete": outcome.board_complete,
        "celebrations": celebrations,
    })))
}

pub async fn delete(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Payload(req): Payload<GoalIdRequest>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store();
    let (goal, board) = store
        .get_goal_with_board(req.goal_id)?
        .ok_or_else(|| ApiError::not_found("Goal"))?;
    if !board.is_owned_by(user.id) {
        return Err(ApiError::Forbidden("Access denied".into()));
    }
    goal.ensure_deletable(board.locked)?;
    store.delete_goal(goal.id)?;
    Ok(ok())
}
