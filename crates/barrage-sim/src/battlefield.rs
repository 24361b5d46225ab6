//! Shared simulation state the projectile systems operate on.

use std::sync::Arc;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use barrage_core::constants::MAX_PLAYERS;
use barrage_core::events::{AudioEvent, CombatEvent, EffectEvent};
use barrage_core::stats::CombatTables;
use barrage_core::types::SimTime;
use barrage_terrain::TerrainQuery;

use crate::engine::SimConfig;
use crate::neighbours::{NeighbourCache, SpatialIndex};
use crate::projectile::Projectile;

/// Seed offset for the presentation-only random stream.
const COSMETIC_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Who is allied with whom. Every player is allied with itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alliances {
    matrix: [[bool; MAX_PLAYERS]; MAX_PLAYERS],
}

impl Default for Alliances {
    fn default() -> Self {
        let mut matrix = [[false; MAX_PLAYERS]; MAX_PLAYERS];
        for (i, row) in matrix.iter_mut().enumerate() {
            row[i] = true;
        }
        Self { matrix }
    }
}

impl Alliances {
    pub fn allied(&self, a: u8, b: u8) -> bool {
        a == b
            || self
                .matrix
                .get(usize::from(a))
                .and_then(|row| row.get(usize::from(b)))
                .copied()
                .unwrap_or(false)
    }

    /// Symmetric. Out-of-range players and self-alliances are ignored.
    pub fn set(&mut self, a: u8, b: u8, allied: bool) {
        let (a, b) = (usize::from(a), usize::from(b));
        if a == b || a >= MAX_PLAYERS || b >= MAX_PLAYERS {
            return;
        }
        self.matrix[a][b] = allied;
        self.matrix[b][a] = allied;
    }
}

/// Events gathered during a tick, drained into the tick report.
#[derive(Debug, Default)]
pub struct EventBuffers {
    pub audio: Vec<AudioEvent>,
    pub effects: Vec<EffectEvent>,
    pub combat: Vec<CombatEvent>,
}

pub struct Battlefield {
    pub world: World,
    pub tables: Arc<CombatTables>,
    pub terrain: Box<dyn TerrainQuery>,
    pub index: SpatialIndex,
    pub neighbours: NeighbourCache,
    /// Simulation rolls. Identical on every client.
    pub rng: ChaCha8Rng,
    /// Presentation-only rolls, which may differ per observer.
    pub cosmetic_rng: ChaCha8Rng,
    pub alliances: Alliances,
    pub config: SimConfig,
    pub time: SimTime,
    pub events: EventBuffers,
    /// Penetration continuations spawned during the current pass.
    pub continuations: Vec<Projectile>,
    pub next_spawn_order: u64,
}

impl Battlefield {
    /// An empty battlefield at time zero.
    pub fn new(config: SimConfig, tables: CombatTables, terrain: impl TerrainQuery + 'static) -> Self {
        Self {
            world: World::new(),
            tables: Arc::new(tables),
            terrain: Box::new(terrain),
            index: SpatialIndex::default(),
            neighbours: NeighbourCache::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            cosmetic_rng: ChaCha8Rng::seed_from_u64(config.seed ^ COSMETIC_SEED_SALT),
            alliances: Alliances::default(),
            config,
            time: SimTime::default(),
            events: EventBuffers::default(),
            continuations: Vec::new(),
            next_spawn_order: 0,
        }
    }
}
