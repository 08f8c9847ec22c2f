//! # bingo-social
//!
//! Users, friend groups and invitations.
//!
//! Each [`User`] owns one [`Group`]. Others join it by redeeming an
//! [`Invitation`], a single-use token that expires after a week by default.
//! Storage lives in `bingo-store`; this crate only holds the records and
//! the rules about who may join, leave or be removed.

pub mod error;
pub mod group;
pub mod invitation;
pub mod user;

pub use error::SocialError;
pub use group::{Group, GroupMember, JoinedGroup, MemberRole, MemberView};
pub use invitation::{
    validate_email, Invitation, InvitationStatus, DEFAULT_INVITATION_TTL_DAYS,
};
pub use user::{Identity, User, UserSummary};
