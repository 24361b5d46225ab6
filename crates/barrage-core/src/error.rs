//! Errors raised while loading combat data.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("malformed table data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate weapon name: {0}")]
    DuplicateWeapon(String),

    #[error("weapon {weapon}: {reason}")]
    InvalidWeapon { weapon: String, reason: &'static str },

    #[error("player {0} is out of range")]
    InvalidPlayer(u8),
}

pub type Result<T> = std::result::Result<T, TableError>;
