//! Generational slot arena holding the airborne projectiles.
//!
//! Handles carry a generation so a reclaimed-and-reused slot never answers
//! for its previous occupant. Iteration follows registration order, which
//! every client of a lockstep session reproduces.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectileId {
    pub index: u32,
    pub generation: u32,
}

impl ProjectileId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }
}

impl std::fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}g{}", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_indices: Vec<u32>,
    order: Vec<ProjectileId>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_indices: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Store a value in a free slot (or a new one) and register it last.
    pub fn insert(&mut self, value: T) -> ProjectileId {
        let id = if let Some(index) = self.free_indices.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            ProjectileId::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            ProjectileId::new(index, 0)
        };
        self.order.push(id);
        id
    }

    /// Reclaim a slot. Stale handles are ignored.
    pub fn remove(&mut self, id: ProjectileId) -> Option<T> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation += 1;
        self.free_indices.push(id.index);
        self.order.retain(|o| *o != id);
        Some(value)
    }

    pub fn is_alive(&self, id: ProjectileId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: ProjectileId) -> Option<&T> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.value.as_ref())
    }

    pub fn get_mut(&mut self, id: ProjectileId) -> Option<&mut T> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.value.as_mut())
    }

    /// Live handles in registration order, copied so the arena can be
    /// mutated while walking them.
    pub fn ids(&self) -> Vec<ProjectileId> {
        self.order.clone()
    }

    /// Live values in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ProjectileId, &T)> {
        self.order
            .iter()
            .filter_map(move |id| self.get(*id).map(|v| (*id, v)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Drop every value and retire every outstanding handle.
    pub fn clear(&mut self) {
        for id in std::mem::take(&mut self.order) {
            let slot = &mut self.slots[id.index as usize];
            slot.value = None;
            slot.generation += 1;
            self.free_indices.push(id.index);
        }
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
