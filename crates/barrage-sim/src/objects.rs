//! Read helpers over battlefield objects in the hecs world.

use hecs::{Entity, World};

use barrage_core::components::*;
use barrage_core::constants::MAX_PLAYERS;
use barrage_core::enums::ObjectKind;
use barrage_core::types::Position;

/// Present in the world and not destroyed this tick.
pub fn is_live(world: &World, entity: Entity) -> bool {
    world.contains(entity) && world.get::<&Destroyed>(entity).is_err()
}

/// Keep a weak reference only while its object is live.
pub fn live(world: &World, entity: Option<Entity>) -> Option<Entity> {
    entity.filter(|e| is_live(world, *e))
}

pub fn position_of(world: &World, entity: Entity) -> Option<Position> {
    world.get::<&Position>(entity).ok().map(|p| *p)
}

/// Owning player. Features have none.
pub fn owner_of(world: &World, entity: Entity) -> Option<u8> {
    world.get::<&Owner>(entity).ok().map(|o| o.player)
}

pub fn hitbox_of(world: &World, entity: Entity) -> Option<Hitbox> {
    world.get::<&Hitbox>(entity).ok().map(|h| *h)
}

pub fn kind_of(world: &World, entity: Entity) -> Option<ObjectKind> {
    world.get::<&TargetBody>(entity).ok().map(|b| b.kind())
}

pub fn facing_of(world: &World, entity: Entity) -> i32 {
    world
        .get::<&Facing>(entity)
        .map(|f| f.direction)
        .unwrap_or(0)
}

/// Lift-propelled unit, airborne or not.
pub fn is_vtol(world: &World, entity: Entity) -> bool {
    matches!(
        world.get::<&TargetBody>(entity).as_deref(),
        Ok(TargetBody::Unit(unit)) if unit.propulsion.is_vtol()
    )
}

/// VTOL currently in the air.
pub fn is_flying(world: &World, entity: Entity) -> bool {
    matches!(
        world.get::<&TargetBody>(entity).as_deref(),
        Ok(TargetBody::Unit(unit)) if unit.propulsion.is_vtol() && unit.flying
    )
}

/// Features that can be neither damaged nor hit by splash.
pub fn is_indestructible(world: &World, entity: Entity) -> bool {
    matches!(
        world.get::<&TargetBody>(entity).as_deref(),
        Ok(TargetBody::Feature(feature)) if !feature.damageable
    )
}

pub fn seen_by(world: &World, entity: Entity, player: u8) -> bool {
    world
        .get::<&Visibility>(entity)
        .map(|v| usize::from(player) < MAX_PLAYERS && v.seen_by & (1 << player) != 0)
        .unwrap_or(false)
}
