use thiserror::Error;

use barrage_core::stats::WeaponId;
use barrage_core::types::ObjectId;

/// Why a fire order was rejected. Nothing is registered on error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
    #[error("unknown weapon {0:?}")]
    UnknownWeapon(WeaponId),

    #[error("target {0:?} is already destroyed")]
    DeadTarget(ObjectId),

    #[error("player {0} is out of range")]
    InvalidPlayer(u8),
}
