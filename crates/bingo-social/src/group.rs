// group.rs - Friend groups and their memberships.
//
// Every user owns exactly one group, created at signup, and is its `owner`
// member. Invited friends join as `member`. A user can belong to many
// groups (one per friend who invited them) but owns only their own.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SocialError;
use crate::user::UserSummary;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Member,
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberRole::Owner => write!(f, "owner"),
            MemberRole::Member => write!(f, "member"),
        }
    }
}

impl FromStr for MemberRole {
    type Err = SocialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(MemberRole::Owner),
            "member" => Ok(MemberRole::Member),
            other => Err(SocialError::UnknownRole(other.to_string())),
        }
    }
}

/// A user's personal friend circle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// The group provisioned for a new user.
    pub fn personal(owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// The owner's own membership row for this group.
    pub fn owner_membership(&self) -> GroupMember {
        GroupMember::new(self.id, self.owner_id, MemberRole::Owner)
    }
}

/// One user's membership in one group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupMember {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

impl GroupMember {
    pub fn new(group_id: Uuid, user_id: Uuid, role: MemberRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }

    /// A member may leave any group except their own.
    pub fn ensure_can_leave(&self) -> Result<(), SocialError> {
        match self.role {
            MemberRole::Owner => Err(SocialError::CannotLeaveOwnGroup),
            MemberRole::Member => Ok(()),
        }
    }

    /// An owner may remove anyone except themselves.
    pub fn ensure_removable(&self) -> Result<(), SocialError> {
        match self.role {
            MemberRole::Owner => Err(SocialError::CannotRemoveOwner),
            MemberRole::Member => Ok(()),
        }
    }
}

/// A member of the caller's own group, with user details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberView {
    /// Membership id (used for removal).
    pub id: Uuid,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
    pub user: UserSummary,
}

/// A group the caller joined as a member, described by its owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JoinedGroup {
    /// Membership id (used for leaving).
    pub membership_id: Uuid,
    pub group_id: Uuid,
    pub joined_at: DateTime<Utc>,
    pub owner: UserSummary,
}
