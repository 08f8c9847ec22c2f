// groups.rs - Group membership handlers.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{AuthUser, Payload};
use crate::error::ApiError;
use crate::routes::ok;
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct LeaveRequest {
    pub membership_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RemoveMemberRequest {
    pub member_id: Uuid,
}

/// Members of the caller's own group, oldest first.
pub async fn members(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let store = state.store();
    let group = store
        .group_owned_by(user.id)?
        .ok_or_else(|| ApiError::not_found("Group"))?;
    let members = store.list_members(group.id)?;
    Ok(Json(json!({
        "success": true,
        "group_id": group.id,
        "members": members,
    })))
}

/// Groups the caller joined through invitations, newest first.
pub async fn my_groups(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let groups = state.store().list_joined_groups(user.id)?;
    Ok(Json(json!({ "success": true, "groups": groups })))
}

pub async fn leave(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Payload(req): Payload<LeaveRequest>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store();
    let membership = store
        .get_membership(req.membership_id)?
        .filter(|m| m.user_id == user.id)
        .ok_or_else(|| ApiError::not_found("Membership"))?;
    membership.ensure_can_leave()?;
    store.delete_membership(membership.id)?;
    tracing::info!(group_id = %membership.group_id, user_id = %user.id, "left group");
    Ok(ok())
}

/// Remove someone from the caller's group. Only the owner may do this.
pub async fn remove_member(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Payload(req): Payload<RemoveMemberRequest>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store();
    let group = store
        .group_owned_by(user.id)?
        .ok_or_else(|| ApiError::Forbidden("You do not own a group".into()))?;
    let member = store
        .get_membership(req.member_id)?
        .filter(|m| m.group_id == group.id)
        .ok_or_else(|| ApiError::NotFound("Member not found in your group".into()))?;
    member.ensure_removable()?;
    store.delete_membership(member.id)?;
    tracing::info!(group_id = %group.id, user_id = %member.user_id, "member removed");
    Ok(ok())
}
