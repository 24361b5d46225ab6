//! Spawn factories for battlefield objects.
//!
//! Every object gets a position, a hitbox, a spawn order and a
//! `TargetBody`. Owned objects also carry an `Owner`.

use hecs::{Entity, World};

use barrage_core::components::*;
use barrage_core::constants::*;
use barrage_core::enums::*;
use barrage_core::types::Position;

/// Description of a mobile unit to spawn.
#[derive(Debug, Clone)]
pub struct UnitSpec {
    pub player: u8,
    pub position: Position,
    pub facing: i32,
    pub kind: UnitKind,
    pub propulsion: PropulsionType,
    pub body: u32,
    pub armour: Armour,
    pub base_resistance: i32,
    pub experience: u32,
    pub flying: bool,
    pub radius: i32,
    pub height: i32,
    /// Players that can see the unit, one bit each.
    pub seen_by: u8,
    /// Whether the unit carries a pitchable turret.
    pub turret: bool,
}

impl Default for UnitSpec {
    fn default() -> Self {
        Self {
            player: 0,
            position: Position::default(),
            facing: 0,
            kind: UnitKind::Vehicle,
            propulsion: PropulsionType::Wheeled,
            body: 100,
            armour: Armour::default(),
            base_resistance: 100,
            experience: 0,
            flying: false,
            radius: DEFAULT_UNIT_RADIUS,
            height: DEFAULT_UNIT_HEIGHT,
            seen_by: 0,
            turret: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StructureSpec {
    pub player: u8,
    pub position: Position,
    pub strength: StructureStrength,
    pub body: u32,
    pub armour: Armour,
    pub resistance: Option<i32>,
    pub footprint: (i32, i32),
    pub height: i32,
    pub seen_by: u8,
    pub turret: bool,
}

impl Default for StructureSpec {
    fn default() -> Self {
        Self {
            player: 0,
            position: Position::default(),
            strength: StructureStrength::Medium,
            body: 500,
            armour: Armour::default(),
            resistance: None,
            footprint: (1, 1),
            height: DEFAULT_STRUCTURE_HEIGHT,
            seen_by: 0,
            turret: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeatureSpec {
    pub position: Position,
    pub damageable: bool,
    pub body: u32,
    pub armour: Armour,
    pub footprint: (i32, i32),
    pub height: i32,
    pub seen_by: u8,
}

impl Default for FeatureSpec {
    fn default() -> Self {
        Self {
            position: Position::default(),
            damageable: true,
            body: 200,
            armour: Armour::default(),
            footprint: (1, 1),
            height: DEFAULT_STRUCTURE_HEIGHT,
            seen_by: 0,
        }
    }
}

fn next_order(counter: &mut u64) -> SpawnOrder {
    let order = SpawnOrder(*counter);
    *counter += 1;
    order
}

/// Radius covering a footprint measured in tiles.
fn footprint_radius(footprint: (i32, i32)) -> i32 {
    footprint.0.max(footprint.1) * TILE_UNITS / 2
}

pub fn spawn_unit(world: &mut World, counter: &mut u64, spec: UnitSpec) -> Entity {
    let height = if spec.propulsion.is_vtol() {
        spec.height + VTOL_HITBOX_MODIFIER
    } else {
        spec.height
    };
    let body = UnitBody {
        kind: spec.kind,
        propulsion: spec.propulsion,
        body: spec.body,
        original_body: spec.body,
        armour: spec.armour,
        experience: spec.experience,
        resistance: None,
        base_resistance: spec.base_resistance,
        flying: spec.flying && spec.propulsion.is_vtol(),
        last_hit: None,
    };
    let entity = world.spawn((
        spec.position,
        Owner {
            player: spec.player,
        },
        next_order(counter),
        Hitbox {
            radius: spec.radius,
            height,
        },
        Facing {
            direction: spec.facing,
        },
        Visibility {
            seen_by: spec.seen_by,
        },
        TargetBody::Unit(body),
    ));
    if spec.turret {
        let _ = world.insert_one(entity, Turret::default());
    }
    entity
}

pub fn spawn_structure(world: &mut World, counter: &mut u64, spec: StructureSpec) -> Entity {
    let body = StructureBody {
        strength: spec.strength,
        body: spec.body,
        original_body: spec.body,
        armour: spec.armour,
        resistance: spec.resistance,
        footprint: spec.footprint,
        last_hit: None,
    };
    let entity = world.spawn((
        spec.position,
        Owner {
            player: spec.player,
        },
        next_order(counter),
        Hitbox {
            radius: footprint_radius(spec.footprint),
            height: spec.height,
        },
        Facing::default(),
        Visibility {
            seen_by: spec.seen_by,
        },
        TargetBody::Structure(body),
    ));
    if spec.turret {
        let _ = world.insert_one(entity, Turret::default());
    }
    entity
}

pub fn spawn_feature(world: &mut World, counter: &mut u64, spec: FeatureSpec) -> Entity {
    let body = FeatureBody {
        damageable: spec.damageable,
        body: spec.body,
        original_body: spec.body,
        armour: spec.armour,
        footprint: spec.footprint,
        last_hit: None,
    };
    world.spawn((
        spec.position,
        next_order(counter),
        Hitbox {
            radius: footprint_radius(spec.footprint),
            height: spec.height,
        },
        Facing::default(),
        Visibility {
            seen_by: spec.seen_by,
        },
        TargetBody::Feature(body),
    ))
}

/// Whether a point lies on the tiles a structure or feature occupies.
pub fn footprint_contains(centre: &Position, footprint: (i32, i32), point: &Position) -> bool {
    let half_w = footprint.0 * TILE_UNITS / 2;
    let half_b = footprint.1 * TILE_UNITS / 2;
    point.x >= centre.x - half_w
        && point.x < centre.x + half_w
        && point.y >= centre.y - half_b
        && point.y < centre.y + half_b
}
