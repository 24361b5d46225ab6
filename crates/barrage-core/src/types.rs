//! Fundamental geometric and simulation types.

use glam::I64Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::TICK_MS;

/// 3D position in world units. x = East, y = South, z = Up.
///
/// Integer coordinates keep every client of a lockstep session bit-identical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Squared horizontal distance.
    pub fn horizontal_range_sq(&self, other: &Position) -> i64 {
        let dx = i64::from(other.x) - i64::from(self.x);
        let dy = i64::from(other.y) - i64::from(self.y);
        dx * dx + dy * dy
    }

    /// Squared 3D distance.
    pub fn range_sq(&self, other: &Position) -> i64 {
        let dz = i64::from(other.z) - i64::from(self.z);
        self.horizontal_range_sq(other) + dz * dz
    }

    /// Horizontal range, truncated to whole units.
    pub fn horizontal_range_to(&self, other: &Position) -> i64 {
        isqrt(self.horizontal_range_sq(other))
    }

    pub fn as_i64vec3(&self) -> I64Vec3 {
        I64Vec3::new(self.x.into(), self.y.into(), self.z.into())
    }

    /// Converts back from wide displacement math. Values are saturated into
    /// the i32 range.
    pub fn from_i64vec3(v: I64Vec3) -> Self {
        let clamp = |c: i64| c.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
        Self::new(clamp(v.x), clamp(v.y), clamp(v.z))
    }
}

/// Integer square root, truncated.
pub fn isqrt(value: i64) -> i64 {
    if value <= 0 {
        return 0;
    }
    // f64 sqrt is correctly rounded, so this only needs a final nudge.
    let mut root = (value as f64).sqrt() as i64;
    while root * root > value {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= value {
        root += 1;
    }
    root
}

/// Serializable reference to a battlefield object (the bits of a
/// `hecs::Entity`, so index and generation both survive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl From<hecs::Entity> for ObjectId {
    fn from(entity: hecs::Entity) -> Self {
        Self(entity.to_bits().get())
    }
}

impl ObjectId {
    pub fn entity(self) -> Option<hecs::Entity> {
        hecs::Entity::from_bits(self.0)
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed game time in milliseconds.
    pub game_time: u32,
}

impl SimTime {
    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.game_time += TICK_MS;
    }
}
