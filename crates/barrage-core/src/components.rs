//! ECS components for battlefield objects living in the hecs world.
//!
//! Components are plain data structs. Damage and targeting logic lives in
//! the simulation crate.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Owning player of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub player: u8,
}

/// Monotonic spawn sequence number. Per-player iteration sorts on this so
/// sweeps visit objects in insertion order on every client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpawnOrder(pub u64);

/// Collision volume used for projectile hit tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hitbox {
    /// Horizontal radius in world units.
    pub radius: i32,
    /// Height above the object's base.
    pub height: i32,
}

/// Facing in whole degrees, 0 = North, clockwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facing {
    pub direction: i32,
}

/// Per-player visibility, one bit per player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    pub seen_by: u8,
}

/// Weapon mount whose pitch follows indirect fire solutions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turret {
    pub pitch: i32,
}

/// Incendiary exposure of an object standing in a fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnState {
    /// Game time the current exposure began.
    pub start: u32,
    /// Burn damage already applied for this exposure.
    pub applied: u32,
    /// Last tick a fire touched the object.
    pub last_tick: u64,
}

/// Marker for an object destroyed this tick. Removed from the world at
/// cleanup, which retires its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destroyed;

/// Most recent hit taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastHit {
    pub time: u32,
    pub subclass: WeaponSubClass,
}

/// Armour values indexed by hit side, then weapon class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armour {
    pub values: [[u32; WeaponClass::COUNT]; HitSide::COUNT],
}

impl Armour {
    /// Same armour on every side.
    pub fn uniform(kinetic: u32, heat: u32) -> Self {
        Self {
            values: [[kinetic, heat]; HitSide::COUNT],
        }
    }

    pub fn get(&self, side: HitSide, class: WeaponClass) -> u32 {
        self.values[side.index()][class.index()]
    }
}

/// A mobile unit (droid, cyborg, VTOL).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitBody {
    pub kind: UnitKind,
    pub propulsion: PropulsionType,
    pub body: u32,
    pub original_body: u32,
    pub armour: Armour,
    /// Accumulated experience, `EXPERIENCE_PER_KILL` per full kill.
    pub experience: u32,
    /// Resistance left against electronic attack. `None` until first attacked.
    pub resistance: Option<i32>,
    /// Starting resistance against electronic attack.
    pub base_resistance: i32,
    /// Airborne VTOL. Grounded VTOLs take extra damage and can burn.
    pub flying: bool,
    pub last_hit: Option<LastHit>,
}

/// A static building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructureBody {
    pub strength: StructureStrength,
    pub body: u32,
    pub original_body: u32,
    pub armour: Armour,
    /// Resistance left against electronic attack. `None` means immune.
    pub resistance: Option<i32>,
    /// Footprint in tiles (width, breadth).
    pub footprint: (i32, i32),
    pub last_hit: Option<LastHit>,
}

/// A terrain feature: trees, wrecks, boulders, oil resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureBody {
    /// Oil resources and pickups cannot be damaged or targeted by splash.
    pub damageable: bool,
    pub body: u32,
    pub original_body: u32,
    pub armour: Armour,
    pub footprint: (i32, i32),
    pub last_hit: Option<LastHit>,
}

/// Anything a projectile can damage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TargetBody {
    Unit(UnitBody),
    Structure(StructureBody),
    Feature(FeatureBody),
}

impl TargetBody {
    pub fn kind(&self) -> ObjectKind {
        match self {
            TargetBody::Unit(_) => ObjectKind::Unit,
            TargetBody::Structure(_) => ObjectKind::Structure,
            TargetBody::Feature(_) => ObjectKind::Feature,
        }
    }

    pub fn body(&self) -> u32 {
        match self {
            TargetBody::Unit(u) => u.body,
            TargetBody::Structure(s) => s.body,
            TargetBody::Feature(f) => f.body,
        }
    }
}
