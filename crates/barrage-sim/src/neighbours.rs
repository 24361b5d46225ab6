//! Neighbour query for airborne projectiles.
//!
//! A uniform grid over the map is rebuilt from the world once per tick.
//! Queries walk the overlapping cells row by row, objects within a cell in
//! spawn order, and shift-insert each hit into a list sorted by squared
//! distance. Equal distances keep scan order. The list is capped; overflow
//! is dropped.

use std::collections::HashMap;

use hecs::{Entity, World};

use barrage_core::components::{Destroyed, SpawnOrder, TargetBody};
use barrage_core::constants::{MAX_NEIGHBOURS, SPATIAL_CELL_SIZE};
use barrage_core::types::Position;

use crate::registry::ProjectileId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbour {
    pub entity: Entity,
    pub dist_sq: i64,
}

/// Insert keeping ascending distance. Later arrivals go after equal
/// distances. Once the list is full, further arrivals are dropped however
/// close they are.
pub fn insert_neighbour(list: &mut Vec<Neighbour>, entry: Neighbour, cap: usize) {
    if list.len() >= cap {
        return;
    }
    let at = list
        .iter()
        .position(|n| n.dist_sq > entry.dist_sq)
        .unwrap_or(list.len());
    list.insert(at, entry);
}

#[derive(Debug, Clone, Copy)]
struct Indexed {
    entity: Entity,
    pos: Position,
}

/// Bucketed object positions, valid for one tick.
#[derive(Default)]
pub struct SpatialIndex {
    cols: i32,
    rows: i32,
    cells: Vec<Vec<Indexed>>,
}

impl SpatialIndex {
    /// Rebuild from every live damageable object in the world.
    pub fn rebuild(&mut self, world: &World, world_size: (i32, i32)) {
        self.cols = (world_size.0 / SPATIAL_CELL_SIZE + 1).max(1);
        self.rows = (world_size.1 / SPATIAL_CELL_SIZE + 1).max(1);
        let count = (self.cols * self.rows) as usize;
        self.cells.iter_mut().for_each(Vec::clear);
        self.cells.resize_with(count, Vec::new);

        let mut objects: Vec<(SpawnOrder, Entity, Position)> = world
            .query::<(&Position, &SpawnOrder, &TargetBody)>()
            .without::<&Destroyed>()
            .iter()
            .map(|(entity, (pos, order, _))| (*order, entity, *pos))
            .collect();
        objects.sort_by_key(|(order, _, _)| *order);

        for (_, entity, pos) in objects {
            let cell = self.cell_index(pos.x, pos.y);
            self.cells[cell].push(Indexed { entity, pos });
        }
    }

    fn cell_coord(&self, x: i32, y: i32) -> (i32, i32) {
        (
            (x / SPATIAL_CELL_SIZE).clamp(0, self.cols - 1),
            (y / SPATIAL_CELL_SIZE).clamp(0, self.rows - 1),
        )
    }

    fn cell_index(&self, x: i32, y: i32) -> usize {
        let (cx, cy) = self.cell_coord(x, y);
        (cy * self.cols + cx) as usize
    }

    /// Objects within `radius` of `pos` (horizontal), nearest first.
    pub fn query(&self, pos: &Position, radius: i32, cap: usize) -> Vec<Neighbour> {
        let mut list = Vec::new();
        if self.cells.is_empty() {
            return list;
        }
        let radius_sq = i64::from(radius) * i64::from(radius);
        let (x0, y0) = self.cell_coord(pos.x.saturating_sub(radius), pos.y.saturating_sub(radius));
        let (x1, y1) = self.cell_coord(pos.x.saturating_add(radius), pos.y.saturating_add(radius));
        for cy in y0..=y1 {
            for cx in x0..=x1 {
                for obj in &self.cells[(cy * self.cols + cx) as usize] {
                    let dx = (i64::from(obj.pos.x) - i64::from(pos.x)).abs();
                    let dy = (i64::from(obj.pos.y) - i64::from(pos.y)).abs();
                    if dx > i64::from(radius) || dy > i64::from(radius) {
                        continue;
                    }
                    let dist_sq = dx * dx + dy * dy;
                    if dist_sq > radius_sq {
                        continue;
                    }
                    insert_neighbour(
                        &mut list,
                        Neighbour {
                            entity: obj.entity,
                            dist_sq,
                        },
                        cap,
                    );
                }
            }
        }
        list
    }
}

/// Neighbour lists keyed by (projectile, tick). Entries from an earlier
/// tick are discarded the first time a later tick is asked for.
#[derive(Default)]
pub struct NeighbourCache {
    tick: u64,
    entries: HashMap<ProjectileId, Vec<Neighbour>>,
}

impl NeighbourCache {
    pub fn neighbours(
        &mut self,
        index: &SpatialIndex,
        subject: ProjectileId,
        tick: u64,
        pos: &Position,
        radius: i32,
    ) -> Vec<Neighbour> {
        if tick != self.tick {
            self.entries.clear();
            self.tick = tick;
        }
        self.entries
            .entry(subject)
            .or_insert_with(|| index.query(pos, radius, MAX_NEIGHBOURS))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
