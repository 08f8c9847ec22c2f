// signin.rs - Sign-in provisioning and invitation redemption.
//
// Both run inside a single transaction: a user never exists without their
// group, and an invitation is never marked used without the membership it
// paid for.

use bingo_social::{
    GroupMember, Identity, Invitation, InvitationStatus, MemberRole, SocialError, User,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::Store;

/// What a sign-in did.
#[derive(Debug)]
pub struct SignIn {
    pub user: User,
    /// `true` when this sign-in created the account.
    pub created: bool,
    /// Present when an invite token came along with the sign-in.
    pub redemption: Option<RedeemOutcome>,
}

/// Result of presenting an invite token.
#[derive(Debug)]
pub enum RedeemOutcome {
    /// The redeemer joined the inviter's group.
    Joined {
        invitation: Invitation,
        membership: GroupMember,
    },
    /// Already in the group; the invitation was left unused.
    AlreadyMember,
    /// The token could not be redeemed.
    Rejected(SocialError),
}

impl Store {
    /// Find or create the user for a verified identity, make sure they own a
    /// group, then redeem `invite_token` if one was given.
    ///
    /// The identity must already be normalized via [`Identity::validated`].
    /// A bad invite token never fails the sign-in; it shows up as
    /// [`RedeemOutcome::Rejected`].
    pub fn sign_in(
        &self,
        identity: &Identity,
        invite_token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SignIn, StoreError> {
        let tx = self.db.unchecked_transaction()?;

        let invited_by = match invite_token {
            Some(token) => self
                .find_invitation_by_token(token)?
                .filter(|inv| inv.status(now) == InvitationStatus::Pending)
                .map(|inv| inv.inviter_id),
            None => None,
        };
        let (user, created) = self.upsert_user(identity, invited_by)?;
        self.ensure_personal_group(user.id)?;

        let redemption = match invite_token {
            Some(token) => Some(self.redeem_unguarded(user.id, token, now)?),
            None => None,
        };

        tx.commit()?;
        Ok(SignIn {
            user,
            created,
            redemption,
        })
    }

    /// Redeem an invite token for an existing user.
    pub fn redeem_invitation(
        &self,
        user_id: Uuid,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RedeemOutcome, StoreError> {
        let tx = self.db.unchecked_transaction()?;
        let outcome = self.redeem_unguarded(user_id, token, now)?;
        tx.commit()?;
        Ok(outcome)
    }

    /// Redemption without its own transaction; callers provide one.
    fn redeem_unguarded(
        &self,
        user_id: Uuid,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RedeemOutcome, StoreError> {
        let Some(invitation) = self.find_invitation_by_token(token)? else {
            return Ok(RedeemOutcome::Rejected(SocialError::InvitationNotFound));
        };
        if let Err(e) = invitation.check_redeemable(user_id, now) {
            return Ok(RedeemOutcome::Rejected(e));
        }
        self.admit(invitation, user_id, now)
    }

    /// Spend `invitation` and add `user_id` to the inviter's group. The
    /// invitation row is claimed first, so a lost race adds no member.
    fn admit(
        &self,
        mut invitation: Invitation,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<RedeemOutcome, StoreError> {
        let group = self.ensure_personal_group(invitation.inviter_id)?;
        if self.find_membership(group.id, user_id)?.is_some() {
            return Ok(RedeemOutcome::AlreadyMember);
        }

        invitation.mark_used(user_id, now);
        if !self.mark_invitation_used(&invitation)? {
            return Ok(RedeemOutcome::Rejected(SocialError::InvitationUsed));
        }
        let membership = GroupMember::new(group.id, user_id, MemberRole::Member);
        self.insert_member(&membership)?;
        tracing::info!(
            invitation_id = %invitation.id,
            group_id = %group.id,
            user_id = %user_id,
            "invitation redeemed"
        );
        Ok(RedeemOutcome::Joined {
            invitation,
            membership,
        })
    }
}
