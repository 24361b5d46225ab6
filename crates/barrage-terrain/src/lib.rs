//! Terrain for BARRAGE.
//!
//! Ground height, map bounds and water queries used to clamp impacts onto
//! the ground and to detect rounds leaving the map.

pub use barrage_core as core;

pub mod error;
pub mod grid;

pub use error::TerrainError;
pub use grid::{TerrainQuery, TileMap};
