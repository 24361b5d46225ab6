//! Projectile data model and lifecycle state.
//!
//! Each state handler returns an outcome type holding only the moves legal
//! from that state, so an illegal transition cannot be expressed by a
//! handler. [`Projectile::enter`] checks the table again at runtime.

use hecs::Entity;

use barrage_core::enums::ProjectileState;
use barrage_core::state::ProjectileView;
use barrage_core::stats::WeaponId;
use barrage_core::types::Position;

use crate::registry::ProjectileId;

/// How a projectile travels, fixed at launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPath {
    /// Straight line, optionally re-aimed at the target each tick.
    Direct { homing: bool },
    /// Ballistic arc over a horizontal `range`.
    Ballistic { range: i64, v_xy: i32, v_z: i32 },
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub state: ProjectileState,
    pub weapon: WeaponId,
    pub player: u8,
    /// Object that fired. Cleared once it dies.
    pub source: Option<Entity>,
    /// Object being aimed at. Cleared once it dies or the round misses.
    pub target: Option<Entity>,
    /// Object this round's parent already penetrated.
    pub last_damaged: Option<Entity>,
    /// Penetrated object whose hit this continuation still has to resolve.
    pub carried_hit: Option<Entity>,
    pub pos: Position,
    /// Launch point.
    pub start: Position,
    /// Aim point. For object targets z includes the rolled aim height.
    pub dest: Position,
    /// Aim height above the target's base, kept for homing.
    pub aim_offset: i32,
    pub path: FlightPath,
    pub pitch: i32,
    /// Game time of launch. Reset on entering post-impact.
    pub born: u32,
    /// Sticky once the observer has seen it.
    pub visible: bool,
    /// Hitbox radius of the target at launch.
    pub target_radius: i32,
    /// Aimed at a VTOL or a point in the air.
    pub air_target: bool,
}

impl Projectile {
    /// Height change from launch to aim point.
    pub fn alt_change(&self) -> i32 {
        self.dest.z - self.start.z
    }

    /// Move to the next lifecycle state.
    pub fn enter(&mut self, next: ProjectileState) {
        debug_assert!(
            self.state.can_become(next),
            "illegal projectile transition {:?} -> {:?}",
            self.state,
            next
        );
        if !self.state.can_become(next) {
            tracing::warn!(from = ?self.state, to = ?next, "illegal projectile transition ignored");
            return;
        }
        self.state = next;
    }

    pub fn view(&self, id: ProjectileId) -> ProjectileView {
        ProjectileView {
            index: id.index,
            generation: id.generation,
            weapon: self.weapon,
            player: self.player,
            state: self.state,
            position: self.pos,
            pitch: self.pitch,
            visible: self.visible,
        }
    }
}

/// Result of one in-flight tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightOutcome {
    Airborne,
    /// Struck something, reached the end of its path or left the map.
    Impact,
    /// Penetrated a unit. A continuation carries on in its place.
    HandedOff,
}

/// Result of the impact tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactOutcome {
    /// Blast or fire lingers.
    Linger,
    Spent,
}

/// Result of one post-impact tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LingerOutcome {
    Burning,
    Spent,
}
