//! Enumeration types used throughout the combat simulation.

use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Armour class a weapon's damage is resisted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponClass {
    #[default]
    Kinetic,
    Heat,
}

impl WeaponClass {
    pub const COUNT: usize = 2;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Weapon family. Drives lifetime extension, hit margins and special rules
/// (electronic capture, EMP, Las-Sat countdown).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponSubClass {
    #[default]
    MachineGun,
    Cannon,
    Mortar,
    Missile,
    Rocket,
    Energy,
    Gauss,
    Flame,
    Howitzer,
    Electronic,
    AaGun,
    SlowMissile,
    SlowRocket,
    LasSat,
    Bomb,
    Command,
    Emp,
    Counter,
}

impl WeaponSubClass {
    pub const COUNT: usize = 18;

    pub fn index(self) -> usize {
        self as usize
    }

    /// How far past the aim point a direct round keeps flying, as a percent
    /// of the launch-to-aim distance.
    pub fn lifetime_extension_percent(self) -> i64 {
        match self {
            WeaponSubClass::MachineGun | WeaponSubClass::Command => DIRECT_EXTENSION_SHORT_PERCENT,
            WeaponSubClass::AaGun => DIRECT_EXTENSION_AA_PERCENT,
            _ => DIRECT_EXTENSION_LONG_PERCENT,
        }
    }

    /// Extra radius added to a target's hitbox when testing for a hit.
    pub fn hit_margin(self) -> i32 {
        match self {
            WeaponSubClass::MachineGun | WeaponSubClass::AaGun => HIT_MARGIN_PRECISE,
            WeaponSubClass::Energy
            | WeaponSubClass::Gauss
            | WeaponSubClass::Flame
            | WeaponSubClass::Electronic
            | WeaponSubClass::Command
            | WeaponSubClass::Emp => HIT_MARGIN_BEAM,
            _ => HIT_MARGIN_EXPLOSIVE,
        }
    }

    pub fn is_electronic(self) -> bool {
        self == WeaponSubClass::Electronic
    }

    /// Rockets and missiles leave a smoke trail.
    pub fn is_rocket(self) -> bool {
        matches!(
            self,
            WeaponSubClass::Missile
                | WeaponSubClass::Rocket
                | WeaponSubClass::SlowMissile
                | WeaponSubClass::SlowRocket
        )
    }

    /// Beam-like weapons draw no ballistic trail.
    pub fn is_beam(self) -> bool {
        matches!(
            self,
            WeaponSubClass::Flame
                | WeaponSubClass::Energy
                | WeaponSubClass::Command
                | WeaponSubClass::Electronic
                | WeaponSubClass::Emp
        )
    }
}

/// Damage category, looked up against structure strength and propulsion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponEffect {
    #[default]
    AntiPersonnel,
    AntiTank,
    BunkerBuster,
    ArtilleryRound,
    Flamer,
    AntiAircraft,
}

impl WeaponEffect {
    pub const COUNT: usize = 6;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// How a projectile travels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementModel {
    /// Straight line to the aim point.
    #[default]
    Direct,
    /// Ballistic arc.
    Indirect,
    /// Straight line re-aimed at the target every tick.
    HomingDirect,
    /// Ballistic arc. Homing has no effect on the arc.
    HomingIndirect,
}

impl MovementModel {
    pub fn is_direct(self) -> bool {
        matches!(self, MovementModel::Direct | MovementModel::HomingDirect)
    }
}

/// Which targets a weapon can engage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceToAir {
    #[default]
    GroundOnly,
    AirOnly,
    Both,
}

impl SurfaceToAir {
    pub fn shoots_in_air(self) -> bool {
        matches!(self, SurfaceToAir::AirOnly | SurfaceToAir::Both)
    }

    pub fn air_only(self) -> bool {
        self == SurfaceToAir::AirOnly
    }
}

/// Propulsion of a mobile unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropulsionType {
    #[default]
    Wheeled,
    Tracked,
    Legged,
    Hover,
    Ski,
    Lift,
    Propellor,
    HalfTracked,
}

impl PropulsionType {
    pub const COUNT: usize = 8;

    pub fn index(self) -> usize {
        self as usize
    }

    /// Lift propulsion makes a VTOL.
    pub fn is_vtol(self) -> bool {
        self == PropulsionType::Lift
    }
}

/// Structural strength class of a building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureStrength {
    Soft,
    #[default]
    Medium,
    Hard,
    Bunker,
}

impl StructureStrength {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Body shape of a mobile unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    #[default]
    Vehicle,
    Person,
    Cyborg,
    Transporter,
}

/// Side of a target a round strikes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitSide {
    #[default]
    Front,
    Rear,
    Left,
    Right,
    Top,
    Bottom,
}

impl HitSide {
    pub const COUNT: usize = 6;

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Kind of battlefield object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Unit,
    Structure,
    Feature,
}

/// Lifecycle state of a projectile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileState {
    #[default]
    InFlight,
    Impact,
    PostImpact,
}

impl ProjectileState {
    /// The legal forward transitions. Reclaiming is legal from every state.
    pub fn can_become(self, next: ProjectileState) -> bool {
        matches!(
            (self, next),
            (ProjectileState::InFlight, ProjectileState::Impact)
                | (ProjectileState::Impact, ProjectileState::PostImpact)
        )
    }
}
