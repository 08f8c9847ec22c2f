//! # bingo-store
//!
//! SQLite persistence for Bingo Boards.
//!
//! A [`Store`] wraps one `rusqlite` connection. Records are the plain types
//! from `bingo-board` and `bingo-social`; this crate only moves them in and
//! out of tables. Multi-row writes (board creation with a free space,
//! sign-in provisioning, invitation redemption) run in one transaction.

pub mod boards;
pub mod error;
pub mod goals;
pub mod groups;
pub mod invitations;
pub mod sessions;
pub mod signin;
pub mod store;
pub mod users;

#[cfg(test)]
mod testing;

pub use error::StoreError;
pub use signin::{RedeemOutcome, SignIn};
pub use store::Store;
