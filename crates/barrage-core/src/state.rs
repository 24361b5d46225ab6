//! Per-tick output of the combat core.

use serde::{Deserialize, Serialize};

use crate::enums::ProjectileState;
use crate::events::{AudioEvent, CombatEvent, EffectEvent};
use crate::stats::WeaponId;
use crate::types::{Position, SimTime};

/// Render-facing view of one live projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub index: u32,
    pub generation: u32,
    pub weapon: WeaponId,
    pub player: u8,
    pub state: ProjectileState,
    pub position: Position,
    pub pitch: i32,
    pub visible: bool,
}

/// Everything produced by one call to `tick()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickReport {
    pub time: SimTime,
    pub audio: Vec<AudioEvent>,
    pub effects: Vec<EffectEvent>,
    pub combat: Vec<CombatEvent>,
    pub projectiles: Vec<ProjectileView>,
}
