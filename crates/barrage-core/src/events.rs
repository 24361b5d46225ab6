//! Events emitted by the combat core for external collaborators.
//!
//! Audio and effect events are already filtered by the observer's
//! visibility. Combat events are unconditional and identical on every
//! client.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{ObjectId, Position};

/// Fire-and-forget sound cues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// A weapon fired, attached to the firer if it still exists.
    WeaponFired {
        sound: u32,
        source: Option<ObjectId>,
        position: Position,
    },
    /// A round landed.
    Impact { sound: u32, position: Position },
    /// A machine-gun round glanced off something.
    Ricochet { position: Position },
}

/// Kind of explosion to draw at an impact point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionKind {
    /// Round struck an object.
    Hit,
    /// Round struck the ground.
    Miss,
    /// Round fell into water.
    Water,
    /// Anti-air round burst in the air.
    Flak,
}

/// Fire-and-forget visual effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EffectEvent {
    /// Trail left behind by a round in flight.
    Trail {
        position: Position,
        subclass: WeaponSubClass,
    },
    Explosion {
        position: Position,
        kind: ExplosionKind,
        subclass: WeaponSubClass,
    },
    /// Incendiary ground fire.
    Fire {
        position: Position,
        radius: i32,
        duration: u32,
    },
    LasSatStrike { position: Position },
}

/// Notifications for score keeping and lockstep replication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    ShotFired {
        player: u8,
        weapon: String,
        on_target: bool,
    },
    DamageDealt {
        attacker: u8,
        victim: ObjectId,
        victim_player: Option<u8>,
        amount: u32,
    },
    Kill {
        attacker: u8,
        firer: Option<ObjectId>,
        victim: ObjectId,
        victim_kind: ObjectKind,
    },
    /// Electronic attack took over an object. The firer should drop its
    /// current order.
    Captured {
        object: ObjectId,
        from: u8,
        to: u8,
        firer: Option<ObjectId>,
    },
    /// An object reached zero body points and leaves the world this tick.
    Destroyed { object: ObjectId, kind: ObjectKind },
}
