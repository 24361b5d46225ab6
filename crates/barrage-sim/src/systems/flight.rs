//! In-flight system: moves a projectile along its path and checks whether
//! it has struck anything on the way.

use std::sync::Arc;

use hecs::Entity;

use barrage_core::constants::*;
use barrage_core::enums::*;
use barrage_core::events::EffectEvent;
use barrage_core::stats::WeaponStats;
use barrage_core::types::Position;

use crate::battlefield::Battlefield;
use crate::objects::*;
use crate::projectile::{FlightOutcome, FlightPath, Projectile};
use crate::registry::ProjectileId;
use crate::systems::hits::{direct_hit_for, strike};
use crate::systems::launch::continue_through;
use crate::trajectory::*;

pub fn run(bf: &mut Battlefield, id: ProjectileId, proj: &mut Projectile) -> FlightOutcome {
    let tables = Arc::clone(&bf.tables);
    let Some(stats) = tables.weapon(proj.weapon) else {
        tracing::warn!(projectile = %id, weapon = ?proj.weapon, "unknown weapon in flight, dropped");
        proj.target = None;
        return FlightOutcome::Impact;
    };

    if let Some(hit) = proj.carried_hit.take() {
        resolve_carried(bf, proj, stats, hit);
    }

    let elapsed = i64::from(bf.time.game_time - proj.born);
    if bf.config.multiplayer
        && stats.subclass == WeaponSubClass::LasSat
        && elapsed < LAS_SAT_DELAY_SECS * GAME_TICKS_PER_SEC
    {
        return FlightOutcome::Airborne;
    }

    let outcome = match proj.path {
        FlightPath::Direct { homing } => fly_direct(bf, id, proj, stats, homing, elapsed),
        FlightPath::Ballistic { range, v_xy, v_z } => {
            fly_ballistic(bf, id, proj, stats, range, v_xy, v_z, elapsed)
        }
    };

    if outcome == FlightOutcome::Airborne && proj.visible {
        let trail = match proj.path {
            FlightPath::Direct { .. } => stats.subclass.is_rocket(),
            FlightPath::Ballistic { .. } => !stats.subclass.is_beam(),
        };
        if trail {
            bf.events.effects.push(EffectEvent::Trail {
                position: proj.pos,
                subclass: stats.subclass,
            });
        }
    }
    outcome
}

/// Damage the object a parent round penetrated.
fn resolve_carried(bf: &mut Battlefield, proj: &Projectile, stats: &WeaponStats, hit: Entity) {
    if !is_live(&bf.world, hit) {
        return;
    }
    let damage = bf.tables.damage(stats, proj.player);
    let blow = direct_hit_for(bf, proj, stats, hit, damage);
    strike(bf, proj, hit, blow);
}

fn fly_direct(
    bf: &mut Battlefield,
    id: ProjectileId,
    proj: &mut Projectile,
    stats: &WeaponStats,
    homing: bool,
    elapsed: i64,
) -> FlightOutcome {
    let aim = match (homing, proj.target.and_then(|t| position_of(&bf.world, t))) {
        (true, Some(p)) => Position::new(p.x, p.y, p.z + proj.aim_offset),
        _ => proj.dest,
    };
    let step = direct_step(proj.start, aim, elapsed, stats.flight_speed);

    if !bf.terrain.on_map(step.pos.x, step.pos.y) {
        tracing::trace!(projectile = %id, "round leaving map, forced impact");
        proj.target = None;
        return FlightOutcome::Impact;
    }
    proj.pos = step.pos;

    let extension = stats.subclass.lifetime_extension_percent();
    if let Some(hit) = scan(bf, id, proj, stats) {
        if stats.penetrate && kind_of(&bf.world, hit) == Some(ObjectKind::Unit) {
            let aim = extend(proj.start, step.displacement, extension);
            continue_through(bf, proj, stats, aim, hit);
            return FlightOutcome::HandedOff;
        }
        proj.target = Some(hit);
        return FlightOutcome::Impact;
    }

    if past_lifetime(step.travelled, step.path_len, extension)
        || !bf.terrain.is_above_ground(&proj.pos)
    {
        proj.target = None;
        return FlightOutcome::Impact;
    }
    FlightOutcome::Airborne
}

#[allow(clippy::too_many_arguments)]
fn fly_ballistic(
    bf: &mut Battlefield,
    id: ProjectileId,
    proj: &mut Projectile,
    stats: &WeaponStats,
    range: i64,
    v_xy: i32,
    v_z: i32,
    elapsed: i64,
) -> FlightOutcome {
    let step = ballistic_step(proj.start, proj.dest, range, v_xy, v_z, elapsed, bf.config.gravity);

    if !bf.terrain.on_map(step.pos.x, step.pos.y) {
        tracing::trace!(projectile = %id, "shell leaving map, forced impact");
        proj.target = None;
        return FlightOutcome::Impact;
    }
    proj.pos = step.pos;
    proj.pitch = step.pitch;

    let lifetime = ballistic_lifetime_radius(range);
    if let Some(hit) = scan(bf, id, proj, stats) {
        let solid = matches!(
            kind_of(&bf.world, hit),
            Some(ObjectKind::Structure | ObjectKind::Feature)
        );
        if stats.penetrate && !solid {
            let dx = i64::from(proj.dest.x) - i64::from(proj.start.x);
            let dy = i64::from(proj.dest.y) - i64::from(proj.start.y);
            let aim = Position::new(
                (i64::from(proj.start.x) + lifetime * dx / range.max(1)) as i32,
                (i64::from(proj.start.y) + lifetime * dy / range.max(1)) as i32,
                proj.pos.z,
            );
            continue_through(bf, proj, stats, aim, hit);
            return FlightOutcome::HandedOff;
        }
        proj.target = Some(hit);
        return FlightOutcome::Impact;
    }

    let grounded = step.descending && !bf.terrain.is_above_ground(&proj.pos);
    if step.distance > lifetime - i64::from(proj.target_radius) || grounded {
        proj.pos.z = bf.terrain.height_at(proj.pos.x, proj.pos.y) + IMPACT_HEIGHT_ABOVE_GROUND;
        // Only a real hit on the target counts.
        proj.target = proj
            .target
            .filter(|t| touches(bf, proj, stats, *t));
        return FlightOutcome::Impact;
    }
    FlightOutcome::Airborne
}

/// Whether the round's current position is inside `object`'s hitbox,
/// widened by the weapon's margin.
fn touches(bf: &Battlefield, proj: &Projectile, stats: &WeaponStats, object: Entity) -> bool {
    let (Some(pos), Some(hitbox)) = (position_of(&bf.world, object), hitbox_of(&bf.world, object))
    else {
        return false;
    };
    let margin = stats.subclass.hit_margin();
    in_hitbox(&proj.pos, &pos, hitbox.radius + margin, hitbox.height + margin)
}

/// First eligible object the round is touching, nearest first.
fn scan(
    bf: &mut Battlefield,
    id: ProjectileId,
    proj: &Projectile,
    stats: &WeaponStats,
) -> Option<Entity> {
    let nearby = bf.neighbours.neighbours(
        &bf.index,
        id,
        bf.time.tick,
        &proj.pos,
        PROJ_NEIGHBOUR_RANGE,
    );
    nearby.into_iter().map(|n| n.entity).find(|&object| {
        if Some(object) == proj.last_damaged || !is_live(&bf.world, object) {
            return false;
        }
        if is_indestructible(&bf.world, object) {
            return false;
        }
        if let Some(owner) = owner_of(&bf.world, object) {
            if bf.alliances.allied(owner, proj.player) {
                return false;
            }
        }
        if stats.surface_to_air.air_only() && !is_vtol(&bf.world, object) {
            return false;
        }
        touches(bf, proj, stats, object)
    })
}
