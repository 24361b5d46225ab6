//! Impact system: resolves the direct hit, then the blast.

use std::sync::Arc;

use hecs::{Entity, World};
use rand::Rng;

use barrage_core::components::{Owner, SpawnOrder, TargetBody};
use barrage_core::constants::*;
use barrage_core::enums::*;
use barrage_core::events::{AudioEvent, EffectEvent, ExplosionKind};
use barrage_core::stats::WeaponStats;

use crate::battlefield::Battlefield;
use crate::damage::Hit;
use crate::objects::*;
use crate::projectile::{ImpactOutcome, Projectile};
use crate::registry::ProjectileId;
use crate::systems::hits::{direct_hit_for, hit_for, strike};
use crate::world_setup::footprint_contains;

pub fn run(bf: &mut Battlefield, id: ProjectileId, proj: &mut Projectile) -> ImpactOutcome {
    let tables = Arc::clone(&bf.tables);
    let Some(stats) = tables.weapon(proj.weapon) else {
        tracing::warn!(projectile = %id, weapon = ?proj.weapon, "unknown weapon at impact, dropped");
        return ImpactOutcome::Spent;
    };

    if let Some(target) = proj.target {
        if is_indestructible(&bf.world, target) {
            // Oil resources and the like absorb the round.
            return ImpactOutcome::Spent;
        }
    }

    if proj.visible {
        present_impact(bf, proj, stats);
    }

    if let Some(target) = proj.target {
        let damage = tables.damage(stats, proj.player);
        let hit = direct_hit_for(bf, proj, stats, target, damage);
        strike(bf, proj, target, hit);
    }

    if !stats.lingers() {
        return ImpactOutcome::Spent;
    }
    if stats.radius > 0 {
        blast(bf, proj, stats);
    }
    ImpactOutcome::Linger
}

fn present_impact(bf: &mut Battlefield, proj: &Projectile, stats: &WeaponStats) {
    let position = proj.pos;
    if let Some(sound) = stats.impact_sound {
        bf.events.audio.push(AudioEvent::Impact { sound, position });
    }
    if stats.subclass == WeaponSubClass::MachineGun
        && proj.target.is_some()
        && bf.cosmetic_rng.gen_range(0..RICOCHET_ONE_IN) == 0
    {
        bf.events.audio.push(AudioEvent::Ricochet { position });
    }

    if stats.subclass == WeaponSubClass::LasSat {
        bf.events.effects.push(EffectEvent::LasSatStrike { position });
    }
    if stats.incen_time > 0 {
        bf.events.effects.push(EffectEvent::Fire {
            position,
            radius: stats.incen_radius,
            duration: stats.incen_time,
        });
    }

    let kind = if proj.target.is_some() {
        if stats.surface_to_air.shoots_in_air() && proj.air_target {
            ExplosionKind::Flak
        } else {
            ExplosionKind::Hit
        }
    } else if bf.terrain.is_water(position.x, position.y) {
        ExplosionKind::Water
    } else {
        ExplosionKind::Miss
    };
    bf.events.effects.push(EffectEvent::Explosion {
        position,
        kind,
        subclass: stats.subclass,
    });
}

/// Strictly inside the blast. The boundary itself is outside.
pub fn in_blast(dist_sq: i64, radius: i32) -> bool {
    let r = i64::from(radius);
    dist_sq < r * r
}

/// Live objects in sweep order: by player, units before structures, then
/// spawn order. Ownerless features come last.
pub fn sweep_order(world: &World) -> Vec<(Entity, ObjectKind)> {
    let mut objects: Vec<((u16, u8, SpawnOrder), Entity, ObjectKind)> = world
        .query::<(&SpawnOrder, &TargetBody, Option<&Owner>)>()
        .iter()
        .filter(|(entity, _)| is_live(world, *entity))
        .map(|(entity, (order, body, owner))| {
            let kind = body.kind();
            let player = owner.map_or(u16::MAX, |o| u16::from(o.player));
            let rank = match kind {
                ObjectKind::Unit => 0,
                ObjectKind::Structure => 1,
                ObjectKind::Feature => 2,
            };
            ((player, rank, *order), entity, kind)
        })
        .collect();
    objects.sort_by_key(|(key, _, _)| *key);
    objects
        .into_iter()
        .map(|(_, entity, kind)| (entity, kind))
        .collect()
}

/// Splash damage around the impact point.
fn blast(bf: &mut Battlefield, proj: &Projectile, stats: &WeaponStats) {
    let centre = proj.pos;
    let radius = stats.radius;
    let spherical = stats.surface_to_air.shoots_in_air();
    let damage = bf.tables.radius_damage(stats, proj.player);
    let chance = bf.tables.radius_hit(stats, proj.player);

    for (object, kind) in sweep_order(&bf.world) {
        // The direct hit has already been dealt.
        if Some(object) == proj.target || !is_live(&bf.world, object) {
            continue;
        }
        let Some(pos) = position_of(&bf.world, object) else {
            continue;
        };
        let boxed = (pos.x - centre.x).abs() <= radius && (pos.y - centre.y).abs() <= radius;
        if !boxed {
            // A large structure can sit under the blast with its centre
            // out of reach. It takes a nominal hit.
            if kind == ObjectKind::Structure && !proj.air_target {
                let footprint = match bf.world.get::<&TargetBody>(object).as_deref() {
                    Ok(TargetBody::Structure(s)) => s.footprint,
                    _ => (1, 1),
                };
                if footprint_contains(&pos, footprint, &centre) {
                    let hit = Hit {
                        damage: NOMINAL_DAMAGE,
                        modified: false,
                        ..hit_for(bf, proj, stats, object, NOMINAL_DAMAGE)
                    };
                    strike(bf, proj, object, hit);
                }
            }
            continue;
        }

        let strike_inside = match kind {
            ObjectKind::Unit => {
                let dist_sq = if spherical {
                    centre.range_sq(&pos)
                } else {
                    centre.horizontal_range_sq(&pos)
                };
                in_blast(dist_sq, radius)
            }
            ObjectKind::Structure => {
                !proj.air_target && in_blast(centre.horizontal_range_sq(&pos), radius)
            }
            ObjectKind::Feature => {
                !is_indestructible(&bf.world, object)
                    && in_blast(centre.horizontal_range_sq(&pos), radius)
            }
        };
        if !strike_inside {
            continue;
        }

        // Not everything inside the blast is caught by it.
        if bf.rng.gen_range(0..100) >= chance {
            continue;
        }
        let hit = hit_for(bf, proj, stats, object, damage);
        strike(bf, proj, object, hit);
    }
}
