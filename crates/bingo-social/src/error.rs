// error.rs - Error types for users, groups and invitations.

use thiserror::Error;

/// Errors raised by the social layer's rules.
#[derive(Debug, Error)]
pub enum SocialError {
    #[error("Email is required")]
    MissingEmail,

    #[error("Invalid email address")]
    InvalidEmail,

    /// Invitations addressed to an existing account are refused.
    #[error("This email is already registered")]
    EmailRegistered,

    #[error("Invitation not found")]
    InvitationNotFound,

    #[error("Invitation has already been used")]
    InvitationUsed,

    #[error("Invitation has expired")]
    InvitationExpired,

    #[error("You cannot accept your own invitation")]
    SelfInvitation,

    #[error("Already a member of this group")]
    AlreadyMember,

    #[error("Cannot leave your own group")]
    CannotLeaveOwnGroup,

    #[error("Cannot remove the group owner")]
    CannotRemoveOwner,

    /// A stored role string did not parse.
    #[error("unknown member role: {0}")]
    UnknownRole(String),
}
