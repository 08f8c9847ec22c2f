// user.rs - User records and the identity delivered by the OAuth provider.
//
// Sign-in itself happens elsewhere. What reaches this service is an
// `Identity` the provider already verified; the email is the stable key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SocialError;
use crate::invitation::validate_email;

/// Verified profile handed over by the OAuth front end.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub provider_account_id: Option<String>,
}

fn default_provider() -> String {
    "google".to_string()
}

impl Identity {
    /// Normalize the email and reject identities without a usable one.
    pub fn validated(mut self) -> Result<Self, SocialError> {
        let email = self.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(SocialError::MissingEmail);
        }
        validate_email(&email)?;
        self.email = email;
        Ok(self)
    }
}

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub provider: String,
    pub provider_account_id: String,

    /// Who invited this user, if they signed up through an invitation.
    pub invited_by: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a new user from a validated identity.
    pub fn from_identity(identity: &Identity, invited_by: Option<Uuid>) -> Self {
        let now = Utc::now();
        let id = Uuid::new_v4();
        Self {
            id,
            email: identity.email.clone(),
            name: identity.name.clone(),
            avatar_url: identity.avatar_url.clone(),
            provider: identity.provider.clone(),
            provider_account_id: identity
                .provider_account_id
                .clone()
                .unwrap_or_else(|| id.to_string()),
            invited_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy name and avatar from a fresh sign-in.
    pub fn refresh_profile(&mut self, identity: &Identity) {
        self.name = identity.name.clone();
        self.avatar_url = identity.avatar_url.clone();
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// The public face of a user, as shown in friend lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}
