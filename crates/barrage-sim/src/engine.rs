//! Combat engine: the per-tick driver of the projectile core.
//!
//! `CombatEngine` owns the hecs world of battlefield objects, the projectile
//! arena and all simulation state. It processes queued fire orders, advances
//! every projectile once per tick and produces a `TickReport`. Completely
//! headless, enabling deterministic testing.

use std::collections::VecDeque;

use hecs::{Entity, World};

use barrage_core::commands::{CombatCommand, FireOrder};
use barrage_core::constants::ACC_GRAVITY;
use barrage_core::state::TickReport;
use barrage_core::stats::CombatTables;
use barrage_core::types::SimTime;
use barrage_terrain::TerrainQuery;

use crate::battlefield::Battlefield;
use crate::error::SpawnError;
use crate::projectile::Projectile;
use crate::registry::{Arena, ProjectileId};
use crate::systems::{self, Fate};
use crate::world_setup::{self, FeatureSpec, StructureSpec, UnitSpec};

/// Configuration for a combat simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Local player whose view gates effects and sounds.
    pub observer: u8,
    /// Multiplayer rules (Las-Sat countdown).
    pub multiplayer: bool,
    /// Ballistic downward acceleration, world units / s².
    pub gravity: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            observer: 0,
            multiplayer: false,
            gravity: ACC_GRAVITY,
        }
    }
}

/// The combat engine. Owns the world and all projectile state.
pub struct CombatEngine {
    bf: Battlefield,
    projectiles: Arena<Projectile>,
    command_queue: VecDeque<CombatCommand>,
    despawn_buffer: Vec<Entity>,
}

impl CombatEngine {
    pub fn new(config: SimConfig, tables: CombatTables, terrain: impl TerrainQuery + 'static) -> Self {
        Self {
            bf: Battlefield::new(config, tables, terrain),
            projectiles: Arena::new(),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: CombatCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = CombatCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return what happened.
    pub fn tick(&mut self) -> TickReport {
        self.bf.time.advance();
        self.process_commands();

        let size = self.bf.terrain.world_size();
        self.bf.index.rebuild(&self.bf.world, size);
        self.advance_all();
        systems::cleanup::run(&mut self.bf.world, self.bf.time.tick, &mut self.despawn_buffer);

        let events = std::mem::take(&mut self.bf.events);
        TickReport {
            time: self.bf.time,
            audio: events.audio,
            effects: events.effects,
            combat: events.combat,
            projectiles: self
                .projectiles
                .iter()
                .map(|(id, proj)| proj.view(id))
                .collect(),
        }
    }

    fn process_commands(&mut self) {
        while let Some(cmd) = self.command_queue.pop_front() {
            match cmd {
                CombatCommand::Fire(order) => {
                    if let Err(err) = self.spawn(&order) {
                        tracing::debug!(%err, "fire order rejected");
                    }
                }
                CombatCommand::SetAlliance { a, b, allied } => {
                    self.bf.alliances.set(a, b, allied);
                }
            }
        }
    }

    /// Launch a projectile immediately. It first moves on the next tick.
    pub fn spawn(&mut self, order: &FireOrder) -> Result<ProjectileId, SpawnError> {
        let proj = systems::launch::spawn(&mut self.bf, order)?;
        Ok(self.projectiles.insert(proj))
    }

    /// Remove a projectile without resolving it. Stale handles are ignored.
    pub fn destroy(&mut self, id: ProjectileId) -> bool {
        self.projectiles.remove(id).is_some()
    }

    /// Run one state handler for every live projectile, in registration
    /// order. Continuations spawned on the way register afterwards.
    pub fn advance_all(&mut self) {
        for id in self.projectiles.ids() {
            let Some(proj) = self.projectiles.get_mut(id) else {
                continue;
            };
            if systems::advance(&mut self.bf, id, proj) == Fate::Reclaim {
                self.projectiles.remove(id);
            }
        }
        for proj in std::mem::take(&mut self.bf.continuations) {
            self.projectiles.insert(proj);
        }
    }

    // --- Battlefield objects ---

    pub fn spawn_unit(&mut self, spec: UnitSpec) -> Entity {
        world_setup::spawn_unit(&mut self.bf.world, &mut self.bf.next_spawn_order, spec)
    }

    pub fn spawn_structure(&mut self, spec: StructureSpec) -> Entity {
        world_setup::spawn_structure(&mut self.bf.world, &mut self.bf.next_spawn_order, spec)
    }

    pub fn spawn_feature(&mut self, spec: FeatureSpec) -> Entity {
        world_setup::spawn_feature(&mut self.bf.world, &mut self.bf.next_spawn_order, spec)
    }

    pub fn set_alliance(&mut self, a: u8, b: u8, allied: bool) {
        self.bf.alliances.set(a, b, allied);
    }

    // --- Accessors ---

    pub fn time(&self) -> SimTime {
        self.bf.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.bf.config
    }

    pub fn tables(&self) -> &CombatTables {
        &self.bf.tables
    }

    /// Read-only view of the battlefield objects.
    pub fn world(&self) -> &World {
        &self.bf.world
    }

    /// Mutable access for the object lifecycle layer (movement, repairs).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.bf.world
    }

    pub fn projectile(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.get(id)
    }

    pub fn projectiles(&self) -> impl Iterator<Item = (ProjectileId, &Projectile)> {
        self.projectiles.iter()
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }
}
