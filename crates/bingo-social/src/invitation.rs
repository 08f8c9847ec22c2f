// invitation.rs - Single-use, expiring invitations into a friend group.
//
// An invitation is pending until it is either redeemed (used_by/used_at
// set) or its expiry passes. Redeeming adds the redeemer to the inviter's
// group; the storage layer does the bookkeeping, this module decides
// whether a redemption is allowed.

use std::sync::OnceLock;

use bingo_board::token;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SocialError;

pub const DEFAULT_INVITATION_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Used,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invitation {
    pub id: Uuid,
    pub inviter_id: Uuid,
    pub invite_token: String,

    /// Optional address the invite was meant for. Informational only; any
    /// holder of the token may redeem it.
    pub email: Option<String>,

    pub used_by: Option<Uuid>,
    pub used_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Invitation {
    /// Create a pending invitation valid for `ttl`.
    pub fn new(inviter_id: Uuid, email: Option<&str>, ttl: Duration) -> Result<Self, SocialError> {
        let email = match email.map(str::trim).filter(|e| !e.is_empty()) {
            Some(e) => {
                validate_email(e)?;
                Some(e.to_lowercase())
            }
            None => None,
        };
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            inviter_id,
            invite_token: token::generate_token(),
            email,
            used_by: None,
            used_at: None,
            expires_at: now + ttl,
            created_at: now,
        })
    }

    pub fn status(&self, now: DateTime<Utc>) -> InvitationStatus {
        if self.used_by.is_some() {
            InvitationStatus::Used
        } else if self.expires_at <= now {
            InvitationStatus::Expired
        } else {
            InvitationStatus::Pending
        }
    }

    /// Check whether `redeemer` may use this invitation at `now`.
    pub fn check_redeemable(&self, redeemer: Uuid, now: DateTime<Utc>) -> Result<(), SocialError> {
        match self.status(now) {
            InvitationStatus::Used => Err(SocialError::InvitationUsed),
            InvitationStatus::Expired => Err(SocialError::InvitationExpired),
            InvitationStatus::Pending if self.inviter_id == redeemer => {
                Err(SocialError::SelfInvitation)
            }
            InvitationStatus::Pending => Ok(()),
        }
    }

    pub fn mark_used(&mut self, redeemer: Uuid, now: DateTime<Utc>) {
        self.used_by = Some(redeemer);
        self.used_at = Some(now);
    }

    /// Path (relative to the public base URL) of the invite link.
    pub fn invite_path(&self) -> String {
        format!("/login?invite={}", self.invite_token)
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Loose syntactic check: something@something.tld, no whitespace.
pub fn validate_email(email: &str) -> Result<(), SocialError> {
    if email_pattern().is_match(email) {
        Ok(())
    } else {
        Err(SocialError::InvalidEmail)
    }
}
