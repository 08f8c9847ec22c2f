// invitations.rs - Creating and accepting invitations.

use axum::extract::State;
use axum::Json;
use bingo_board::BoardEvent;
use bingo_social::{Invitation, SocialError};
use bingo_store::RedeemOutcome;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{AuthUser, Payload};
use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateInvitationRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AcceptInvitationRequest {
    pub invite_token: String,
}

/// Issue an invitation to the caller's group. An email, when given, must
/// not belong to an existing account.
pub async fn create(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Payload(req): Payload<CreateInvitationRequest>,
) -> Result<Json<Value>, ApiError> {
    let invitation = Invitation::new(
        user.id,
        req.email.as_deref(),
        state.config.invitation_ttl(),
    )?;
    {
        let store = state.store();
        if let Some(email) = &invitation.email {
            if store.find_user_by_email(email)?.is_some() {
                return Err(SocialError::EmailRegistered.into());
            }
        }
        store.insert_invitation(&invitation)?;
    }
    tracing::info!(invitation_id = %invitation.id, inviter_id = %user.id, "invitation created");

    let invite_url = state.config.public_url(&invitation.invite_path());
    Ok(Json(json!({
        "success": true,
        "invitation": invitation,
        "invite_url": invite_url,
    })))
}

/// Redeem an invite token as the signed-in user.
pub async fn accept(
    State(state): State<SharedState>,
    AuthUser(user): AuthUser,
    Payload(req): Payload<AcceptInvitationRequest>,
) -> Result<Json<Value>, ApiError> {
    let outcome = state
        .store()
        .redeem_invitation(user.id, req.invite_token.trim(), Utc::now())?;
    match outcome {
        RedeemOutcome::Joined {
            invitation,
            membership,
        } => {
            state.events.dispatch(&BoardEvent::invitation_redeemed(
                invitation.id,
                invitation.inviter_id,
                user.id,
            ));
            Ok(Json(json!({
                "success": true,
                "group_id": membership.group_id,
                "membership": membership,
            })))
        }
        RedeemOutcome::AlreadyMember => Err(SocialError::AlreadyMember.into()),
        RedeemOutcome::Rejected(e) => Err(e.into()),
    }
}
