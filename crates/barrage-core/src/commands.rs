//! Commands from the order layer to the combat core.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::stats::WeaponId;
use crate::types::{ObjectId, Position};

/// A weapon discharge decided by the order/AI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireOrder {
    pub weapon: WeaponId,
    /// Firing object. `None` for scripted strikes.
    pub firer: Option<ObjectId>,
    pub player: u8,
    /// Aim point. Its z is ignored when a target object is given.
    pub target_point: Position,
    pub target: Option<ObjectId>,
    /// Forces effects to be shown regardless of observer visibility.
    #[serde(default)]
    pub visible: bool,
    /// Launch point. Defaults to the firer's position.
    #[serde(default)]
    pub muzzle: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatCommand {
    Fire(FireOrder),
    /// Make two players allies (or break the alliance).
    SetAlliance { a: u8, b: u8, allied: bool },
}
