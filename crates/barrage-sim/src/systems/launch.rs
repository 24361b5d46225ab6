//! Launch: turns a fire order (or a penetration) into a new projectile.

use std::sync::Arc;

use hecs::Entity;
use rand::Rng;

use barrage_core::commands::FireOrder;
use barrage_core::components::{TargetBody, Turret};
use barrage_core::constants::*;
use barrage_core::enums::*;
use barrage_core::events::{AudioEvent, CombatEvent};
use barrage_core::stats::WeaponStats;
use barrage_core::types::{ObjectId, Position};

use crate::battlefield::Battlefield;
use crate::error::SpawnError;
use crate::objects::{hitbox_of, is_live, is_vtol, live, position_of};
use crate::projectile::{FlightPath, Projectile};
use crate::trajectory::solve_ballistic;
use crate::visibility::gfx_visible;

/// Pick the flight model for a shot from `start` to `dest`.
///
/// Indirect weapons inside their minimum range, or with no ballistic
/// solution, fire straight.
fn choose_path(stats: &WeaponStats, start: &Position, dest: &Position, gravity: i32) -> (FlightPath, i32) {
    let range = start.horizontal_range_to(dest);
    if stats.movement.is_direct() || range < i64::from(stats.min_range) {
        let homing = stats.movement == MovementModel::HomingDirect;
        return (FlightPath::Direct { homing }, 0);
    }
    let dz = i64::from(dest.z) - i64::from(start.z);
    match solve_ballistic(range, dz, stats.flight_speed, gravity) {
        Some(sol) => (
            FlightPath::Ballistic {
                range,
                v_xy: sol.v_xy,
                v_z: sol.v_z,
            },
            sol.pitch,
        ),
        None => {
            tracing::debug!(weapon = %stats.name, range, dz, "no ballistic solution, firing direct");
            (FlightPath::Direct { homing: false }, 0)
        }
    }
}

fn aim_variance(bf: &Battlefield, target: Entity) -> i32 {
    match bf.world.get::<&TargetBody>(target).as_deref() {
        Ok(TargetBody::Unit(unit)) if unit.kind == UnitKind::Person => PERSON_HEIGHT_VARIANCE,
        _ => TARGET_HEIGHT_VARIANCE,
    }
}

/// Validate a fire order and build its projectile.
pub fn spawn(bf: &mut Battlefield, order: &FireOrder) -> Result<Projectile, SpawnError> {
    let tables = Arc::clone(&bf.tables);
    let stats = tables
        .weapon(order.weapon)
        .ok_or(SpawnError::UnknownWeapon(order.weapon))?;
    if usize::from(order.player) >= MAX_PLAYERS {
        return Err(SpawnError::InvalidPlayer(order.player));
    }
    let target = match order.target {
        Some(id) => Some(
            id.entity()
                .filter(|e| is_live(&bf.world, *e))
                .ok_or(SpawnError::DeadTarget(id))?,
        ),
        None => None,
    };
    let source = live(&bf.world, order.firer.and_then(ObjectId::entity));

    let ground = bf
        .terrain
        .height_at(order.target_point.x, order.target_point.y);
    let start = order
        .muzzle
        .or_else(|| source.and_then(|e| position_of(&bf.world, e)))
        .unwrap_or(Position::new(
            order.target_point.x,
            order.target_point.y,
            ground,
        ));

    let (dest, aim_offset, target_radius, air_target) = match target {
        Some(t) => {
            let base = position_of(&bf.world, t).unwrap_or(order.target_point);
            let variance = aim_variance(bf, t);
            let offset = bf.rng.gen_range(0..variance);
            let radius = hitbox_of(&bf.world, t).map_or(0, |h| h.radius);
            (
                Position::new(order.target_point.x, order.target_point.y, base.z + offset),
                offset,
                radius,
                is_vtol(&bf.world, t),
            )
        }
        None => (order.target_point, 0, 0, order.target_point.z > ground),
    };

    let (path, pitch) = choose_path(stats, &start, &dest, bf.config.gravity);
    if let (FlightPath::Ballistic { .. }, Some(firer)) = (path, source) {
        if let Ok(mut turret) = bf.world.get::<&mut Turret>(firer) {
            turret.pitch = pitch;
        }
    }

    let mut proj = Projectile {
        state: ProjectileState::InFlight,
        weapon: order.weapon,
        player: order.player,
        source,
        target,
        last_damaged: None,
        carried_hit: None,
        pos: start,
        start,
        dest,
        aim_offset,
        path,
        pitch,
        born: bf.time.game_time,
        visible: order.visible,
        target_radius,
        air_target,
    };
    proj.visible = proj.visible || gfx_visible(&bf.world, &proj, bf.config.observer);

    if proj.visible {
        if let Some(sound) = stats.fire_sound {
            bf.events.audio.push(AudioEvent::WeaponFired {
                sound,
                source: source.map(ObjectId::from),
                position: start,
            });
        }
    }
    bf.events.combat.push(CombatEvent::ShotFired {
        player: order.player,
        weapon: stats.name.clone(),
        on_target: target.is_some(),
    });
    tracing::trace!(weapon = %stats.name, player = order.player, ?path, "projectile launched");
    Ok(proj)
}

/// Queue the round that carries on after penetrating `hit`.
///
/// It starts where the parent is now, aims at `aim`, and resolves the hit
/// on `hit` on its first tick.
pub fn continue_through(
    bf: &mut Battlefield,
    parent: &Projectile,
    stats: &WeaponStats,
    aim: Position,
    hit: Entity,
) {
    let aim = bf.terrain.clamp_to_map(aim);
    let (path, pitch) = choose_path(stats, &parent.pos, &aim, bf.config.gravity);
    tracing::debug!(weapon = %stats.name, ?hit, "round penetrated, continuing");
    bf.continuations.push(Projectile {
        state: ProjectileState::InFlight,
        weapon: parent.weapon,
        player: parent.player,
        source: parent.source,
        target: None,
        last_damaged: Some(hit),
        carried_hit: Some(hit),
        pos: parent.pos,
        start: parent.pos,
        dest: aim,
        aim_offset: 0,
        path,
        pitch,
        born: bf.time.game_time,
        visible: parent.visible,
        target_radius: 0,
        air_target: false,
    });
}
