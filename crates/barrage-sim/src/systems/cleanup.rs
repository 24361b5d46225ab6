//! Cleanup system: removes destroyed objects and expires stale burns.

use hecs::{Entity, World};

use barrage_core::components::{BurnState, Destroyed};

/// Despawn everything marked destroyed this tick and drop burn records of
/// objects no fire touched this tick.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, tick: u64, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, _) in world.query_mut::<&Destroyed>() {
        despawn_buffer.push(entity);
    }
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }

    for (entity, burn) in world.query_mut::<&BurnState>() {
        if burn.last_tick < tick {
            despawn_buffer.push(entity);
        }
    }
    for entity in despawn_buffer.drain(..) {
        let _ = world.remove_one::<BurnState>(entity);
    }
}
