//! Damage resolution against units, structures and features.
//!
//! Every variant implements [`Damageable`]. [`apply_damage`] is the single
//! entry point: it looks up the effect modifier, routes electronic attacks
//! to the resistance counter and everything else to body points.

use barrage_core::components::*;
use barrage_core::constants::*;
use barrage_core::enums::*;
use barrage_core::stats::DamageModifiers;

/// One hit on one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub damage: u32,
    pub effect: WeaponEffect,
    pub class: WeaponClass,
    pub subclass: WeaponSubClass,
    pub side: HitSide,
    /// Scale `damage` through the effect modifier table first. Burns and
    /// footprint splash skip it.
    pub modified: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Body points removed.
    pub dealt: u32,
    pub destroyed: bool,
    /// Electronic attack exhausted the target's resistance.
    pub captured: bool,
    /// Damage relative to full health, `EXPERIENCE_PER_KILL` = one body.
    pub relative: u32,
}

pub trait Damageable {
    /// Percent multiplier for a weapon effect against this object.
    fn modifier(&self, effect: WeaponEffect, modifiers: &DamageModifiers) -> u32;

    /// Remove body points.
    fn absorb(&mut self, damage: u32, hit: &Hit, level: u32, now: u32) -> DamageOutcome;

    /// Drain electronic resistance. Returns true once the object changes
    /// hands.
    fn jam(&mut self, strength: u32, now: u32) -> bool;
}

/// Scale by a modifier percent. A nonzero hit never rounds down to zero.
pub fn calc_damage(base: u32, modifier: u32) -> u32 {
    let damage = base * modifier / 100;
    if damage == 0 && base != 0 {
        1
    } else {
        damage
    }
}

/// Experience level from accumulated experience.
pub fn experience_level(experience: u32) -> u32 {
    let kills = experience / EXPERIENCE_PER_KILL;
    EXPERIENCE_LEVEL_THRESHOLDS
        .iter()
        .rposition(|t| kills >= *t)
        .unwrap_or(0) as u32
}

/// Damage left after armour, reduced for veterans. A hit that armour
/// stops still scratches for one point; a veteran can shrug off a hit
/// that only just gets through.
fn after_armour(damage: u32, armour: u32, level: u32) -> u32 {
    if damage <= armour {
        return 1;
    }
    let reduction = 100u32.saturating_sub(EXP_REDUCE_DAMAGE * level);
    (damage - armour) * reduction / 100
}

fn drain_body(body: &mut u32, original: u32, actual: u32) -> DamageOutcome {
    let dealt = actual.min(*body);
    let relative = if original == 0 {
        0
    } else {
        (u64::from(dealt) * u64::from(EXPERIENCE_PER_KILL) / u64::from(original)) as u32
    };
    let destroyed = actual >= *body;
    *body -= dealt;
    DamageOutcome {
        dealt,
        destroyed,
        captured: false,
        relative,
    }
}

/// An EMP hit stays on record until the next EMP hit.
fn record_hit(last_hit: &mut Option<LastHit>, subclass: WeaponSubClass, now: u32) {
    let keep_emp = matches!(last_hit, Some(prev) if prev.subclass == WeaponSubClass::Emp)
        && subclass != WeaponSubClass::Emp;
    if !keep_emp {
        *last_hit = Some(LastHit { time: now, subclass });
    }
}

impl Damageable for UnitBody {
    fn modifier(&self, effect: WeaponEffect, modifiers: &DamageModifiers) -> u32 {
        modifiers.modifier_for_propulsion(effect, self.propulsion)
    }

    fn absorb(&mut self, damage: u32, hit: &Hit, level: u32, now: u32) -> DamageOutcome {
        record_hit(&mut self.last_hit, hit.subclass, now);
        if hit.subclass == WeaponSubClass::Emp {
            return DamageOutcome::default();
        }
        let damage = if self.propulsion.is_vtol() && !self.flying {
            damage * VTOL_GROUNDED_DAMAGE_MULTIPLIER
        } else {
            damage
        };
        let actual = after_armour(damage, self.armour.get(hit.side, hit.class), level);
        drain_body(&mut self.body, self.original_body, actual)
    }

    fn jam(&mut self, strength: u32, now: u32) -> bool {
        record_hit(&mut self.last_hit, WeaponSubClass::Electronic, now);
        let remaining = self.resistance.unwrap_or(self.base_resistance) - strength as i32;
        if remaining <= 0 {
            // The new owner starts with full resistance.
            self.resistance = None;
            true
        } else {
            self.resistance = Some(remaining);
            false
        }
    }
}

impl Damageable for StructureBody {
    fn modifier(&self, effect: WeaponEffect, modifiers: &DamageModifiers) -> u32 {
        modifiers.modifier_for_structure(effect, self.strength)
    }

    fn absorb(&mut self, damage: u32, hit: &Hit, _level: u32, now: u32) -> DamageOutcome {
        record_hit(&mut self.last_hit, hit.subclass, now);
        if hit.subclass == WeaponSubClass::Emp {
            return DamageOutcome::default();
        }
        let actual = after_armour(damage, self.armour.get(hit.side, hit.class), 0);
        drain_body(&mut self.body, self.original_body, actual)
    }

    fn jam(&mut self, strength: u32, now: u32) -> bool {
        let Some(resistance) = self.resistance.as_mut() else {
            return false;
        };
        record_hit(&mut self.last_hit, WeaponSubClass::Electronic, now);
        // Already taken over. Only the hit that crosses zero changes hands.
        if *resistance < 0 {
            return false;
        }
        *resistance -= strength as i32;
        *resistance < 0
    }
}

impl Damageable for FeatureBody {
    fn modifier(&self, _effect: WeaponEffect, _modifiers: &DamageModifiers) -> u32 {
        100
    }

    fn absorb(&mut self, damage: u32, hit: &Hit, _level: u32, now: u32) -> DamageOutcome {
        if !self.damageable || hit.subclass == WeaponSubClass::Emp {
            return DamageOutcome::default();
        }
        record_hit(&mut self.last_hit, hit.subclass, now);
        let actual = after_armour(damage, self.armour.get(hit.side, hit.class), 0);
        drain_body(&mut self.body, self.original_body, actual)
    }

    fn jam(&mut self, _strength: u32, _now: u32) -> bool {
        false
    }
}

pub fn as_damageable(body: &mut TargetBody) -> &mut dyn Damageable {
    match body {
        TargetBody::Unit(unit) => unit,
        TargetBody::Structure(structure) => structure,
        TargetBody::Feature(feature) => feature,
    }
}

/// Resolve one hit. Body points never increase.
pub fn apply_damage(
    target: &mut TargetBody,
    hit: &Hit,
    modifiers: &DamageModifiers,
    now: u32,
) -> DamageOutcome {
    let level = match target {
        TargetBody::Unit(unit) => experience_level(unit.experience),
        _ => 0,
    };
    let body = as_damageable(target);
    let damage = if hit.modified {
        calc_damage(hit.damage, body.modifier(hit.effect, modifiers))
    } else {
        hit.damage
    };
    if hit.subclass.is_electronic() {
        return DamageOutcome {
            captured: body.jam(damage, now),
            ..DamageOutcome::default()
        };
    }
    body.absorb(damage, hit, level, now)
}
