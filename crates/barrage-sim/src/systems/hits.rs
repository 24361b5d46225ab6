//! Applying a hit to an object and reporting what happened.

use hecs::Entity;

use barrage_core::components::{Destroyed, Owner, TargetBody};
use barrage_core::enums::{HitSide, ObjectKind};
use barrage_core::events::CombatEvent;
use barrage_core::stats::WeaponStats;
use barrage_core::types::ObjectId;

use crate::battlefield::Battlefield;
use crate::damage::{apply_damage, DamageOutcome, Hit};
use crate::objects::{facing_of, is_live, kind_of, live, owner_of, position_of};
use crate::projectile::{FlightPath, Projectile};
use crate::trajectory::hit_side;

/// Build the hit a projectile deals to `victim`, striking whichever side
/// faces the launch point.
pub fn hit_for(
    bf: &Battlefield,
    proj: &Projectile,
    stats: &WeaponStats,
    victim: Entity,
    damage: u32,
) -> Hit {
    let side = match position_of(&bf.world, victim) {
        Some(pos) => hit_side(
            &proj.start,
            proj.alt_change(),
            proj.pos.z,
            &pos,
            facing_of(&bf.world, victim),
        ),
        None => HitSide::Front,
    };
    Hit {
        damage,
        effect: stats.effect,
        class: stats.class,
        subclass: stats.subclass,
        side,
        modified: true,
    }
}

/// Build the hit on the object a projectile struck itself. Shells come
/// down on the roof; splash around them does not.
pub fn direct_hit_for(
    bf: &Battlefield,
    proj: &Projectile,
    stats: &WeaponStats,
    victim: Entity,
    damage: u32,
) -> Hit {
    let hit = hit_for(bf, proj, stats, victim, damage);
    match proj.path {
        FlightPath::Ballistic { .. } => Hit {
            side: HitSide::Top,
            ..hit
        },
        FlightPath::Direct { .. } => hit,
    }
}

/// Resolve `hit` on `victim` for a projectile of `proj`'s player, then
/// report damage, kills and captures and credit the firer's experience.
pub fn strike(bf: &mut Battlefield, proj: &Projectile, victim: Entity, hit: Hit) -> DamageOutcome {
    debug_assert!(is_live(&bf.world, victim), "strike on dead object {victim:?}");
    let now = bf.time.game_time;
    let victim_player = owner_of(&bf.world, victim);
    let Some(kind) = kind_of(&bf.world, victim) else {
        tracing::warn!(?victim, "strike on object without a body ignored");
        return DamageOutcome::default();
    };
    let outcome = match bf.world.get::<&mut TargetBody>(victim) {
        Ok(mut body) => apply_damage(&mut body, &hit, &bf.tables.modifiers, now),
        Err(_) => return DamageOutcome::default(),
    };

    let victim_id = ObjectId::from(victim);
    let firer = live(&bf.world, proj.source);

    if outcome.dealt > 0 {
        bf.events.combat.push(CombatEvent::DamageDealt {
            attacker: proj.player,
            victim: victim_id,
            victim_player,
            amount: outcome.dealt,
        });
    }

    if outcome.captured {
        if let Some(from) = victim_player.filter(|p| *p != proj.player) {
            if let Ok(mut owner) = bf.world.get::<&mut Owner>(victim) {
                owner.player = proj.player;
            }
            tracing::debug!(?victim, from, to = proj.player, "object captured");
            bf.events.combat.push(CombatEvent::Captured {
                object: victim_id,
                from,
                to: proj.player,
                firer: firer.map(ObjectId::from),
            });
        }
    }

    if outcome.destroyed {
        let _ = bf.world.insert_one(victim, Destroyed);
        tracing::debug!(?victim, ?kind, attacker = proj.player, "object destroyed");
        bf.events.combat.push(CombatEvent::Destroyed {
            object: victim_id,
            kind,
        });
        bf.events.combat.push(CombatEvent::Kill {
            attacker: proj.player,
            firer: firer.map(ObjectId::from),
            victim: victim_id,
            victim_kind: kind,
        });
    }

    // No experience for friendly fire or for clearing scenery.
    if kind != ObjectKind::Feature && victim_player != Some(proj.player) && outcome.relative > 0 {
        if let Some(firer) = firer {
            if let Ok(mut body) = bf.world.get::<&mut TargetBody>(firer) {
                if let TargetBody::Unit(unit) = &mut *body {
                    unit.experience = unit.experience.saturating_add(outcome.relative);
                }
            }
        }
    }

    outcome
}
