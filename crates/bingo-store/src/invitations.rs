// invitations.rs - Invitation rows.

use bingo_social::Invitation;
use rusqlite::{params, OptionalExtension, Row};

use crate::error::StoreError;
use crate::store::Store;

const INVITATION_COLUMNS: &str =
    "id, inviter_id, invite_token, email, used_by, used_at, expires_at, created_at";

fn invitation_from_row(row: &Row<'_>) -> rusqlite::Result<Invitation> {
    Ok(Invitation {
        id: row.get("id")?,
        inviter_id: row.get("inviter_id")?,
        invite_token: row.get("invite_token")?,
        email: row.get("email")?,
        used_by: row.get("used_by")?,
        used_at: row.get("used_at")?,
        expires_at: row.get("expires_at")?,
        created_at: row.get("created_at")?,
    })
}

impl Store {
    pub fn insert_invitation(&self, invitation: &Invitation) -> Result<(), StoreError> {
        self.db.execute(
            "INSERT INTO invitations (id, inviter_id, invite_token, email, used_by, used_at,
                                      expires_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                invitation.id,
                invitation.inviter_id,
                invitation.invite_token,
                invitation.email,
                invitation.used_by,
                invitation.used_at,
                invitation.expires_at,
                invitation.created_at,
            ],
        )?;
        Ok(())
    }

    pub fn find_invitation_by_token(&self, token: &str) -> Result<Option<Invitation>, StoreError> {
        let sql = format!("SELECT {INVITATION_COLUMNS} FROM invitations WHERE invite_token = ?1");
        Ok(self
            .db
            .query_row(&sql, params![token], invitation_from_row)
            .optional()?)
    }

    /// Record `used_by`/`used_at`. Only succeeds for a row that is still
    /// unused, so a token cannot be spent twice.
    pub fn mark_invitation_used(&self, invitation: &Invitation) -> Result<bool, StoreError> {
        let n = self.db.execute(
            "UPDATE invitations SET used_by = ?2, used_at = ?3
             WHERE id = ?1 AND used_by IS NULL",
            params![invitation.id, invitation.used_by, invitation.used_at],
        )?;
        Ok(n > 0)
    }

}
