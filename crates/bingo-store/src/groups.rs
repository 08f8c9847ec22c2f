// groups.rs - Groups and their memberships.

use bingo_social::{Group, GroupMember, JoinedGroup, MemberRole, MemberView, UserSummary};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::Store;

fn group_from_row(row: &Row<'_>) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn role_from_row(row: &Row<'_>) -> rusqlite::Result<MemberRole> {
    let raw: String = row.get("role")?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

fn member_from_row(row: &Row<'_>) -> rusqlite::Result<GroupMember> {
    Ok(GroupMember {
        id: row.get("id")?,
        group_id: row.get("group_id")?,
        user_id: row.get("user_id")?,
        role: role_from_row(row)?,
        joined_at: row.get("joined_at")?,
    })
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<UserSummary> {
    Ok(UserSummary {
        id: row.get("user_id")?,
        email: row.get("email")?,
        name: row.get("name")?,
        avatar_url: row.get("avatar_url")?,
    })
}

impl Store {
    pub fn insert_group(&self, group: &Group) -> Result<(), StoreError> {
        self.db.execute(
            "INSERT INTO friend_groups (id, owner_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![group.id, group.owner_id, group.created_at, group.updated_at],
        )?;
        Ok(())
    }

    /// The group owned by `owner_id`, if provisioned.
    pub fn group_owned_by(&self, owner_id: Uuid) -> Result<Option<Group>, StoreError> {
        Ok(self
            .db
            .query_row(
                "SELECT id, owner_id, created_at, updated_at FROM friend_groups
                 WHERE owner_id = ?1",
                params![owner_id],
                group_from_row,
            )
            .optional()?)
    }

    /// Return the personal group of `owner_id`, creating it and the owner
    /// membership when missing. Does not open a transaction of its own.
    pub fn ensure_personal_group(&self, owner_id: Uuid) -> Result<Group, StoreError> {
        if let Some(group) = self.group_owned_by(owner_id)? {
            return Ok(group);
        }
        let group = Group::personal(owner_id);
        self.insert_group(&group)?;
        self.insert_member(&group.owner_membership())?;
        tracing::debug!(group_id = %group.id, owner_id = %owner_id, "provisioned group");
        Ok(group)
    }

    pub fn insert_member(&self, member: &GroupMember) -> Result<(), StoreError> {
        self.db.execute(
            "INSERT INTO group_members (id, group_id, user_id, role, joined_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                member.id,
                member.group_id,
                member.user_id,
                member.role.to_string(),
                member.joined_at,
            ],
        )?;
        Ok(())
    }

    pub fn find_membership(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupMember>, StoreError> {
        Ok(self
            .db
            .query_row(
                "SELECT id, group_id, user_id, role, joined_at FROM group_members
                 WHERE group_id = ?1 AND user_id = ?2",
                params![group_id, user_id],
                member_from_row,
            )
            .optional()?)
    }

    pub fn get_membership(&self, id: Uuid) -> Result<Option<GroupMember>, StoreError> {
        Ok(self
            .db
            .query_row(
                "SELECT id, group_id, user_id, role, joined_at FROM group_members
                 WHERE id = ?1",
                params![id],
                member_from_row,
            )
            .optional()?)
    }

    pub fn delete_membership(&self, id: Uuid) -> Result<bool, StoreError> {
        let n = self
            .db
            .execute("DELETE FROM group_members WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    /// Members of a group with their profiles, oldest first. The owner's own
    /// row is included.
    pub fn list_members(&self, group_id: Uuid) -> Result<Vec<MemberView>, StoreError> {
        let mut stmt = self.db.prepare(
            "SELECT m.id, m.role, m.joined_at, m.user_id, u.email, u.name, u.avatar_url
             FROM group_members m JOIN users u ON u.id = m.user_id
             WHERE m.group_id = ?1
             ORDER BY m.joined_at ASC",
        )?;
        let rows = stmt.query_map(params![group_id], |row| {
            Ok(MemberView {
                id: row.get("id")?,
                role: role_from_row(row)?,
                joined_at: row.get("joined_at")?,
                user: summary_from_row(row)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Groups `user_id` belongs to as a plain member, newest first, with the
    /// owning user's profile.
    pub fn list_joined_groups(&self, user_id: Uuid) -> Result<Vec<JoinedGroup>, StoreError> {
        let mut stmt = self.db.prepare(
            "SELECT m.id AS membership_id, m.group_id, m.joined_at,
                    u.id AS user_id, u.email, u.name, u.avatar_url
             FROM group_members m
             JOIN friend_groups g ON g.id = m.group_id
             JOIN users u ON u.id = g.owner_id
             WHERE m.user_id = ?1 AND m.role != 'owner'
             ORDER BY m.joined_at DESC",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(JoinedGroup {
                membership_id: row.get("membership_id")?,
                group_id: row.get("group_id")?,
                joined_at: row.get("joined_at")?,
                owner: summary_from_row(row)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Do `a` and `b` share at least one group?
    pub fn are_friends(&self, a: Uuid, b: Uuid) -> Result<bool, StoreError> {
        let shared: i64 = self.db.query_row(
            "SELECT EXISTS (
                 SELECT 1 FROM group_members x
                 JOIN group_members y ON y.group_id = x.group_id
                 WHERE x.user_id = ?1 AND y.user_id = ?2
             )",
            params![a, b],
            |row| row.get(0),
        )?;
        Ok(shared != 0)
    }
}
