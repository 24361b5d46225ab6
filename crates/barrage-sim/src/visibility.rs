//! Observer visibility gating for projectile effects and sounds.
//!
//! Only presentation depends on this. The simulation itself never does.

use hecs::World;

use barrage_core::enums::ObjectKind;

use crate::objects::{is_live, kind_of, owner_of, seen_by};
use crate::projectile::Projectile;

/// Whether `observer` should see and hear this projectile.
pub fn gfx_visible(world: &World, proj: &Projectile, observer: u8) -> bool {
    if proj.visible || proj.player == observer {
        return true;
    }

    let source = proj.source.filter(|e| is_live(world, *e));
    let target = proj.target.filter(|e| is_live(world, *e));
    let source_seen = source.is_some_and(|e| seen_by(world, e, observer));
    let target_seen = target.is_some_and(|e| seen_by(world, e, observer));

    // Someone else's structure firing at something the observer can't see.
    if let Some(src) = source {
        if kind_of(world, src) == Some(ObjectKind::Structure)
            && owner_of(world, src) != Some(observer)
            && !target_seen
        {
            return false;
        }
    }

    // Something unseen firing at a structure that isn't the observer's.
    if let Some(dst) = target {
        if kind_of(world, dst) == Some(ObjectKind::Structure)
            && owner_of(world, dst) != Some(observer)
            && !source_seen
        {
            return false;
        }
    }

    source_seen || target_seen
}
