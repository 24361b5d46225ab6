//! Post-impact system: lingering blasts and incendiary fires.
//!
//! A fire charges each object it touches for the burn owed since that
//! object's exposure began, less what has already been charged, so the
//! total never exceeds `rate × exposure` however the ticks fall.

use std::sync::Arc;

use hecs::Entity;

use barrage_core::components::BurnState;
use barrage_core::constants::GAME_TICKS_PER_SEC;
use barrage_core::enums::*;
use barrage_core::stats::WeaponStats;

use crate::battlefield::Battlefield;
use crate::damage::Hit;
use crate::objects::*;
use crate::projectile::{LingerOutcome, Projectile};
use crate::systems::hits::strike;
use crate::systems::impact::sweep_order;

pub fn run(bf: &mut Battlefield, proj: &mut Projectile) -> LingerOutcome {
    let tables = Arc::clone(&bf.tables);
    let Some(stats) = tables.weapon(proj.weapon) else {
        return LingerOutcome::Spent;
    };
    let age = bf.time.game_time - proj.born;
    if age > stats.radius_life && age > stats.incen_time {
        return LingerOutcome::Spent;
    }
    if stats.incen_time > 0 && age <= stats.incen_time {
        burn(bf, proj, stats);
    }
    LingerOutcome::Burning
}

/// Burn owed to an object this tick, with its updated exposure record.
/// Nothing is owed on the tick an exposure starts.
pub fn charge(state: Option<BurnState>, now: u32, tick: u64, rate: u32) -> (BurnState, u32) {
    match state {
        Some(s) if s.last_tick + 1 >= tick => {
            let owed_total = u64::from(now - s.start) * u64::from(rate) / GAME_TICKS_PER_SEC as u64;
            let owed = (owed_total as u32).saturating_sub(s.applied);
            (
                BurnState {
                    start: s.start,
                    applied: s.applied + owed,
                    last_tick: tick,
                },
                owed,
            )
        }
        // New exposure, or the object left the fire for a while.
        _ => (
            BurnState {
                start: now,
                applied: 0,
                last_tick: tick,
            },
            0,
        ),
    }
}

fn burn(bf: &mut Battlefield, proj: &Projectile, stats: &WeaponStats) {
    let centre = proj.pos;
    let radius = stats.incen_radius;
    let radius_sq = i64::from(radius) * i64::from(radius);
    let rate = bf.tables.incen_damage(stats, proj.player);
    let now = bf.time.game_time;
    let tick = bf.time.tick;

    let victims: Vec<Entity> = sweep_order(&bf.world)
        .into_iter()
        .filter(|(_, kind)| *kind != ObjectKind::Feature)
        .map(|(entity, _)| entity)
        .collect();

    for object in victims {
        if !is_live(&bf.world, object) {
            continue;
        }
        // The firer's own side is never set alight.
        if owner_of(&bf.world, object) == Some(proj.player) {
            continue;
        }
        // Can't set something alight while it is in the air.
        if is_flying(&bf.world, object) {
            continue;
        }
        let Some(pos) = position_of(&bf.world, object) else {
            continue;
        };
        if (pos.x - centre.x).abs() > radius || (pos.y - centre.y).abs() > radius {
            continue;
        }
        if centre.horizontal_range_sq(&pos) > radius_sq {
            continue;
        }

        let previous = bf.world.get::<&BurnState>(object).ok().map(|s| *s);
        let (state, owed) = charge(previous, now, tick, rate);
        let _ = bf.world.insert_one(object, state);
        if owed == 0 {
            continue;
        }
        let hit = Hit {
            damage: owed,
            effect: stats.effect,
            class: stats.class,
            subclass: stats.subclass,
            side: HitSide::Front,
            modified: false,
        };
        strike(bf, proj, object, hit);
    }
}
