// testing.rs - Fixtures shared by the store's unit tests.

use bingo_board::{Board, Goal};
use bingo_social::{Identity, User};
use chrono::Utc;

use crate::store::Store;

pub(crate) fn identity(email: &str) -> Identity {
    Identity {
        email: email.to_string(),
        name: Some("Test User".into()),
        avatar_url: None,
        provider: "google".into(),
        provider_account_id: Some(format!("acct-{email}")),
    }
}

/// Sign a fresh user in, which also provisions their group.
pub(crate) fn signed_up(store: &Store, email: &str) -> User {
    store.sign_in(&identity(email), None, Utc::now()).unwrap().user
}

pub(crate) fn board_for(store: &Store, user: &User, title: &str) -> Board {
    let board = Board::new(user.id, title, 2026).unwrap();
    store.insert_board(&board, None).unwrap();
    board
}

/// Fill every empty cell of `board` with an open goal.
pub(crate) fn fill_board(store: &Store, board: &Board) {
    let taken: Vec<u8> = store
        .list_goals(board.id)
        .unwrap()
        .iter()
        .map(|g| g.position)
        .collect();
    for position in (0..25u8).filter(|p| !taken.contains(p)) {
        store
            .insert_goal(&Goal::new(board.id, position, format!("goal {position}")))
            .unwrap();
    }
}
