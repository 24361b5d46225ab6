//! Simulation constants and tuning parameters.
//!
//! World distances are integer world units (a map tile is `TILE_UNITS` wide),
//! game time is integer milliseconds.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 10;

/// Game time covered by one tick, in milliseconds.
pub const TICK_MS: u32 = 1000 / TICK_RATE;

/// Game-time units per second.
pub const GAME_TICKS_PER_SEC: i64 = 1000;

/// Number of players (and alliance matrix dimension).
pub const MAX_PLAYERS: usize = 8;

// --- World geometry ---

/// Width of one map tile in world units.
pub const TILE_UNITS: i32 = 128;

/// Downward acceleration of ballistic projectiles (world units / s²).
pub const ACC_GRAVITY: i32 = 1000;

/// Height above ground at which an indirect shell detonates.
pub const IMPACT_HEIGHT_ABOVE_GROUND: i32 = 16;

// --- Trajectory ---

/// Maximum launch pitch for indirect fire (degrees). Out-of-reach targets
/// are engaged at this pitch with a boosted muzzle velocity.
pub const PROJ_MAX_PITCH_DEG: i32 = 30;

/// Lifetime radius of indirect projectiles, percent of the nominal range.
pub const INDIRECT_EXTENSION_PERCENT: i64 = 120;

/// Lifetime radius of machine guns and command links, percent of nominal range.
pub const DIRECT_EXTENSION_SHORT_PERCENT: i64 = 120;

/// Lifetime radius of most direct weapons, percent of nominal range.
pub const DIRECT_EXTENSION_LONG_PERCENT: i64 = 150;

/// Anti-air guns stop at the aim point.
pub const DIRECT_EXTENSION_AA_PERCENT: i64 = 100;

/// Las-Sat projectiles hold still this long in multiplayer before striking.
pub const LAS_SAT_DELAY_SECS: i64 = 8;

// --- Neighbour query ---

/// Radius scanned around an airborne projectile each tick.
pub const PROJ_NEIGHBOUR_RANGE: i32 = TILE_UNITS * 4;

/// Neighbour list capacity. Further objects are dropped.
pub const MAX_NEIGHBOURS: usize = 120;

/// Spatial index cell edge, in world units.
pub const SPATIAL_CELL_SIZE: i32 = TILE_UNITS * 4;

// --- Hit boxes ---

/// Hitbox radius of a unit with no explicit radius.
pub const DEFAULT_UNIT_RADIUS: i32 = TILE_UNITS / 4;

/// Hitbox height of a unit with no explicit height.
pub const DEFAULT_UNIT_HEIGHT: i32 = 40;

/// Hitbox height of a structure or feature with no explicit height.
pub const DEFAULT_STRUCTURE_HEIGHT: i32 = 96;

/// Extra hitbox height granted to VTOLs so anti-air rounds connect.
pub const VTOL_HITBOX_MODIFIER: i32 = 100;

/// Aim height variance above an infantry target's base.
pub const PERSON_HEIGHT_VARIANCE: i32 = 4;

/// Aim height variance above other targets' base.
pub const TARGET_HEIGHT_VARIANCE: i32 = 8;

/// Extra hit radius for weapons with no blast (machine guns, AA guns).
pub const HIT_MARGIN_PRECISE: i32 = 0;

/// Extra hit radius for beam, flame and electronic weapons.
pub const HIT_MARGIN_BEAM: i32 = 8;

/// Extra hit radius for shells, rockets, missiles and bombs.
pub const HIT_MARGIN_EXPLOSIVE: i32 = 16;

// --- Damage ---

/// Flat damage applied to a structure whose footprint contains a blast.
pub const NOMINAL_DAMAGE: u32 = 5;

/// Damage reduction per experience level, percent.
pub const EXP_REDUCE_DAMAGE: u32 = 6;

/// Damage multiplier for VTOLs caught on the ground.
pub const VTOL_GROUNDED_DAMAGE_MULTIPLIER: u32 = 3;

/// Experience points equal to destroying one full-health unit.
pub const EXPERIENCE_PER_KILL: u32 = 65_536;

/// Kill-equivalents needed for each experience level.
pub const EXPERIENCE_LEVEL_THRESHOLDS: [u32; 9] = [0, 4, 8, 16, 32, 64, 128, 256, 512];

// --- Hit side ---

/// Launch height delta above which a hit lands on the target's top.
pub const HIT_SIDE_TOP_ALT_CHANGE: i32 = 300;

/// Depth below the target at which a hit lands on its bottom.
pub const HIT_SIDE_BOTTOM_MARGIN: i32 = 50;

// --- Effects ---

/// One in this many machine-gun impacts plays a ricochet.
pub const RICOCHET_ONE_IN: u32 = 3;
