//! Per-tick projectile systems.
//!
//! `advance` runs exactly one state handler for one projectile. Handlers
//! take the shared `Battlefield` and the projectile being advanced; they
//! never see the registry, so spawns made mid-pass are queued in
//! `Battlefield::continuations`.

pub mod burn;
pub mod cleanup;
pub mod flight;
pub mod hits;
pub mod impact;
pub mod launch;

use barrage_core::enums::ProjectileState;

use crate::battlefield::Battlefield;
use crate::objects::live;
use crate::projectile::{FlightOutcome, ImpactOutcome, LingerOutcome, Projectile};
use crate::registry::ProjectileId;
use crate::visibility::gfx_visible;

/// What the registry should do with a projectile after its tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Keep,
    Reclaim,
}

pub fn advance(bf: &mut Battlefield, id: ProjectileId, proj: &mut Projectile) -> Fate {
    // Drop references to anything that died since last tick.
    proj.source = live(&bf.world, proj.source);
    proj.target = live(&bf.world, proj.target);
    proj.last_damaged = live(&bf.world, proj.last_damaged);

    if !bf.terrain.on_map(proj.pos.x, proj.pos.y) {
        tracing::trace!(projectile = %id, "projectile off map, reclaimed");
        return Fate::Reclaim;
    }

    if !proj.visible && gfx_visible(&bf.world, proj, bf.config.observer) {
        proj.visible = true;
    }

    match proj.state {
        ProjectileState::InFlight => match flight::run(bf, id, proj) {
            FlightOutcome::Airborne => Fate::Keep,
            FlightOutcome::Impact => {
                proj.enter(ProjectileState::Impact);
                Fate::Keep
            }
            FlightOutcome::HandedOff => Fate::Reclaim,
        },
        ProjectileState::Impact => match impact::run(bf, id, proj) {
            ImpactOutcome::Linger => {
                proj.enter(ProjectileState::PostImpact);
                proj.born = bf.time.game_time;
                Fate::Keep
            }
            ImpactOutcome::Spent => Fate::Reclaim,
        },
        ProjectileState::PostImpact => match burn::run(bf, proj) {
            LingerOutcome::Burning => Fate::Keep,
            LingerOutcome::Spent => Fate::Reclaim,
        },
    }
}
