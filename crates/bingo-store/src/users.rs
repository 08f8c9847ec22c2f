// users.rs - User rows.

use bingo_social::{Identity, User};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::Store;

const USER_COLUMNS: &str = "id, email, name, avatar_url, provider, provider_account_id, \
     invited_by, created_at, updated_at";

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        email: row.get("email")?,
        name: row.get("name")?,
        avatar_url: row.get("avatar_url")?,
        provider: row.get("provider")?,
        provider_account_id: row.get("provider_account_id")?,
        invited_by: row.get("invited_by")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

impl Store {
    pub fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        self.db.execute(
            "INSERT INTO users (id, email, name, avatar_url, provider, provider_account_id,
                                invited_by, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                user.id,
                user.email,
                user.name,
                user.avatar_url,
                user.provider,
                user.provider_account_id,
                user.invited_by,
                user.created_at,
                user.updated_at,
            ],
        )?;
        Ok(())
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        Ok(self
            .db
            .query_row(&sql, params![id], user_from_row)
            .optional()?)
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
        Ok(self
            .db
            .query_row(&sql, params![email], user_from_row)
            .optional()?)
    }

    /// Find the user for `identity` by email and refresh their profile, or
    /// create them. `invited_by` only applies to a new account. Returns the
    /// user and whether it was created.
    pub fn upsert_user(
        &self,
        identity: &Identity,
        invited_by: Option<Uuid>,
    ) -> Result<(User, bool), StoreError> {
        match self.find_user_by_email(&identity.email)? {
            Some(mut user) => {
                user.refresh_profile(identity);
                self.update_user_profile(&user)?;
                Ok((user, false))
            }
            None => {
                let user = User::from_identity(identity, invited_by);
                self.insert_user(&user)?;
                tracing::info!(user_id = %user.id, "created user");
                Ok((user, true))
            }
        }
    }

    /// Persist name, avatar and `updated_at`.
    pub fn update_user_profile(&self, user: &User) -> Result<(), StoreError> {
        self.db.execute(
            "UPDATE users SET name = ?2, avatar_url = ?3, updated_at = ?4 WHERE id = ?1",
            params![user.id, user.name, user.avatar_url, user.updated_at],
        )?;
        Ok(())
    }
}
