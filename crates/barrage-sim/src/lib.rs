//! Projectile combat simulation for BARRAGE.
//!
//! Flies direct and ballistic rounds, re-acquires targets in flight and
//! resolves direct, splash and burn damage against the units, structures
//! and features held in a hecs world. Deterministic for lockstep play.

pub mod battlefield;
pub mod damage;
pub mod engine;
pub mod error;
pub mod neighbours;
pub mod objects;
pub mod projectile;
pub mod registry;
pub mod systems;
pub mod trajectory;
pub mod visibility;
pub mod world_setup;

pub use barrage_core as core;
pub use engine::{CombatEngine, SimConfig};
pub use error::SpawnError;
pub use registry::ProjectileId;

#[cfg(test)]
mod tests;
