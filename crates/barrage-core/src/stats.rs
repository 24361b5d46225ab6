//! Weapon statistics and damage modifier tables.
//!
//! Built once at load time (in code or from JSON) and read-only during
//! simulation. Missing modifier entries mean 100%.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_PLAYERS;
use crate::enums::*;
use crate::error::{Result, TableError};

/// Index into `CombatTables::weapons`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeaponId(pub u16);

/// Immutable description of a weapon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponStats {
    pub name: String,
    #[serde(default)]
    pub class: WeaponClass,
    #[serde(default)]
    pub subclass: WeaponSubClass,
    #[serde(default)]
    pub effect: WeaponEffect,
    #[serde(default)]
    pub movement: MovementModel,
    #[serde(default)]
    pub surface_to_air: SurfaceToAir,
    /// Direct-hit damage.
    pub damage: u32,
    /// Flight speed in world units per second.
    pub flight_speed: i32,
    #[serde(default)]
    pub min_range: i32,
    #[serde(default)]
    pub long_range: i32,
    /// Blast radius. Zero means no splash.
    #[serde(default)]
    pub radius: i32,
    /// Splash damage at any distance inside the blast.
    #[serde(default)]
    pub radius_damage: u32,
    /// Percent chance that an object inside the blast is hit.
    #[serde(default = "always")]
    pub radius_hit: u32,
    /// How long the blast lingers, milliseconds.
    #[serde(default)]
    pub radius_life: u32,
    #[serde(default)]
    pub incen_radius: i32,
    /// Fire duration, milliseconds. Zero means no fire.
    #[serde(default)]
    pub incen_time: u32,
    /// Burn damage per second.
    #[serde(default)]
    pub incen_damage: u32,
    /// Keeps flying after hitting a unit.
    #[serde(default)]
    pub penetrate: bool,
    #[serde(default)]
    pub fire_sound: Option<u32>,
    #[serde(default)]
    pub impact_sound: Option<u32>,
}

fn always() -> u32 {
    100
}

impl WeaponStats {
    /// True if impact leaves a blast or a fire behind.
    pub fn lingers(&self) -> bool {
        self.radius != 0 || self.incen_time != 0
    }
}

/// Percentage multipliers, weapon effect against target category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageModifiers {
    structure: [[u32; StructureStrength::COUNT]; WeaponEffect::COUNT],
    propulsion: [[u32; PropulsionType::COUNT]; WeaponEffect::COUNT],
}

impl Default for DamageModifiers {
    fn default() -> Self {
        Self {
            structure: [[100; StructureStrength::COUNT]; WeaponEffect::COUNT],
            propulsion: [[100; PropulsionType::COUNT]; WeaponEffect::COUNT],
        }
    }
}

impl DamageModifiers {
    pub fn modifier_for_structure(&self, effect: WeaponEffect, strength: StructureStrength) -> u32 {
        self.structure[effect.index()][strength.index()]
    }

    pub fn modifier_for_propulsion(&self, effect: WeaponEffect, propulsion: PropulsionType) -> u32 {
        self.propulsion[effect.index()][propulsion.index()]
    }

    pub fn set_structure(&mut self, effect: WeaponEffect, strength: StructureStrength, percent: u32) {
        self.structure[effect.index()][strength.index()] = percent;
    }

    pub fn set_propulsion(&mut self, effect: WeaponEffect, propulsion: PropulsionType, percent: u32) {
        self.propulsion[effect.index()][propulsion.index()] = percent;
    }
}

/// Research bonuses of one player, percent per weapon subclass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUpgrades {
    pub damage: [u32; WeaponSubClass::COUNT],
    pub radius_damage: [u32; WeaponSubClass::COUNT],
    pub incen_damage: [u32; WeaponSubClass::COUNT],
    pub radius_hit: [u32; WeaponSubClass::COUNT],
}

impl Default for PlayerUpgrades {
    fn default() -> Self {
        Self {
            damage: [0; WeaponSubClass::COUNT],
            radius_damage: [0; WeaponSubClass::COUNT],
            incen_damage: [0; WeaponSubClass::COUNT],
            radius_hit: [0; WeaponSubClass::COUNT],
        }
    }
}

fn upgraded(base: u32, percent: u32) -> u32 {
    base + base * percent / 100
}

/// Everything the damage pipeline looks up.
#[derive(Debug, Clone, Default)]
pub struct CombatTables {
    weapons: Vec<WeaponStats>,
    pub modifiers: DamageModifiers,
    upgrades: [PlayerUpgrades; MAX_PLAYERS],
}

// --- JSON layout ---

#[derive(Deserialize)]
struct TableFile {
    weapons: Vec<WeaponStats>,
    #[serde(default)]
    structure_modifiers: Vec<StructureModifierEntry>,
    #[serde(default)]
    propulsion_modifiers: Vec<PropulsionModifierEntry>,
    #[serde(default)]
    upgrades: Vec<UpgradeEntry>,
}

#[derive(Deserialize)]
struct StructureModifierEntry {
    effect: WeaponEffect,
    strength: StructureStrength,
    percent: u32,
}

#[derive(Deserialize)]
struct PropulsionModifierEntry {
    effect: WeaponEffect,
    propulsion: PropulsionType,
    percent: u32,
}

#[derive(Deserialize)]
struct UpgradeEntry {
    player: u8,
    subclass: WeaponSubClass,
    #[serde(default)]
    damage: u32,
    #[serde(default)]
    radius_damage: u32,
    #[serde(default)]
    incen_damage: u32,
    #[serde(default)]
    radius_hit: u32,
}

impl CombatTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse tables from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: TableFile = serde_json::from_str(json)?;
        let mut tables = Self::new();
        for weapon in file.weapons {
            tables.add_weapon(weapon)?;
        }
        for entry in file.structure_modifiers {
            tables
                .modifiers
                .set_structure(entry.effect, entry.strength, entry.percent);
        }
        for entry in file.propulsion_modifiers {
            tables
                .modifiers
                .set_propulsion(entry.effect, entry.propulsion, entry.percent);
        }
        for entry in file.upgrades {
            let upgrades = tables.upgrades_mut(entry.player)?;
            let sc = entry.subclass.index();
            upgrades.damage[sc] = entry.damage;
            upgrades.radius_damage[sc] = entry.radius_damage;
            upgrades.incen_damage[sc] = entry.incen_damage;
            upgrades.radius_hit[sc] = entry.radius_hit;
        }
        Ok(tables)
    }

    /// Register a weapon and return its id.
    pub fn add_weapon(&mut self, weapon: WeaponStats) -> Result<WeaponId> {
        if self.weapons.iter().any(|w| w.name == weapon.name) {
            return Err(TableError::DuplicateWeapon(weapon.name));
        }
        if weapon.flight_speed <= 0 {
            return Err(TableError::InvalidWeapon {
                weapon: weapon.name,
                reason: "flight speed must be positive",
            });
        }
        if weapon.radius < 0 || weapon.incen_radius < 0 {
            return Err(TableError::InvalidWeapon {
                weapon: weapon.name,
                reason: "radii must not be negative",
            });
        }
        let id = WeaponId(self.weapons.len() as u16);
        self.weapons.push(weapon);
        Ok(id)
    }

    pub fn weapon(&self, id: WeaponId) -> Option<&WeaponStats> {
        self.weapons.get(usize::from(id.0))
    }

    pub fn weapon_by_name(&self, name: &str) -> Option<WeaponId> {
        self.weapons
            .iter()
            .position(|w| w.name == name)
            .map(|i| WeaponId(i as u16))
    }

    pub fn upgrades(&self, player: u8) -> PlayerUpgrades {
        self.upgrades
            .get(usize::from(player))
            .copied()
            .unwrap_or_default()
    }

    pub fn upgrades_mut(&mut self, player: u8) -> Result<&mut PlayerUpgrades> {
        self.upgrades
            .get_mut(usize::from(player))
            .ok_or(TableError::InvalidPlayer(player))
    }

    // --- Upgraded stat lookups ---

    pub fn damage(&self, weapon: &WeaponStats, player: u8) -> u32 {
        upgraded(weapon.damage, self.upgrades(player).damage[weapon.subclass.index()])
    }

    pub fn radius_damage(&self, weapon: &WeaponStats, player: u8) -> u32 {
        upgraded(
            weapon.radius_damage,
            self.upgrades(player).radius_damage[weapon.subclass.index()],
        )
    }

    pub fn incen_damage(&self, weapon: &WeaponStats, player: u8) -> u32 {
        upgraded(
            weapon.incen_damage,
            self.upgrades(player).incen_damage[weapon.subclass.index()],
        )
    }

    pub fn radius_hit(&self, weapon: &WeaponStats, player: u8) -> u32 {
        upgraded(
            weapon.radius_hit,
            self.upgrades(player).radius_hit[weapon.subclass.index()],
        )
    }
}
