//! TileMap: tile-corner heightmap with elevation and water queries.

use serde::{Deserialize, Serialize};

use barrage_core::constants::TILE_UNITS;
use barrage_core::types::Position;

use crate::error::TerrainError;

/// Height and bounds queries the combat core needs from the map.
pub trait TerrainQuery {
    /// Ground height at a world position. Off-map points read the nearest edge.
    fn height_at(&self, x: i32, y: i32) -> i32;

    /// Map extent in world units (width, breadth).
    fn world_size(&self) -> (i32, i32);

    /// Whether the tile under a point is water.
    fn is_water(&self, _x: i32, _y: i32) -> bool {
        false
    }

    /// Whether a point lies on the playable map.
    fn on_map(&self, x: i32, y: i32) -> bool {
        let (w, h) = self.world_size();
        x >= 0 && y >= 0 && x < w && y < h
    }

    /// Whether a point is above (or on) the ground.
    fn is_above_ground(&self, pos: &Position) -> bool {
        pos.z >= self.height_at(pos.x, pos.y)
    }

    /// Clamp a point onto the map, one unit inside the far edges.
    fn clamp_to_map(&self, pos: Position) -> Position {
        let (w, h) = self.world_size();
        Position::new(pos.x.clamp(0, w - 1), pos.y.clamp(0, h - 1), pos.z)
    }
}

/// Heightmap sampled at tile corners.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    /// Width in tiles.
    pub width: u32,
    /// Breadth in tiles.
    pub height: u32,
    /// Corner heights, row-major, (width + 1) × (height + 1).
    corners: Vec<i32>,
    /// Water flag per tile, row-major.
    water: Vec<bool>,
}

impl TileMap {
    /// Build a map from corner heights.
    pub fn new(width: u32, height: u32, corners: Vec<i32>) -> Result<Self, TerrainError> {
        if width == 0 || height == 0 {
            return Err(TerrainError::EmptyMap);
        }
        let expected = (width as usize + 1) * (height as usize + 1);
        if corners.len() != expected {
            return Err(TerrainError::CornerCount {
                expected,
                actual: corners.len(),
            });
        }
        Ok(Self {
            width,
            height,
            corners,
            water: vec![false; width as usize * height as usize],
        })
    }

    /// A level map at a single height. Sizes below one tile are raised to one.
    pub fn flat(width: u32, height: u32, level: i32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            corners: vec![level; (width as usize + 1) * (height as usize + 1)],
            water: vec![false; width as usize * height as usize],
        }
    }

    /// Mark a tile as water.
    pub fn set_water(&mut self, tile_x: u32, tile_y: u32, water: bool) -> Result<(), TerrainError> {
        if tile_x >= self.width || tile_y >= self.height {
            return Err(TerrainError::TileOutOfRange { tile_x, tile_y });
        }
        let idx = (tile_y * self.width + tile_x) as usize;
        self.water[idx] = water;
        Ok(())
    }

    fn corner(&self, cx: u32, cy: u32) -> i64 {
        let cx = cx.min(self.width);
        let cy = cy.min(self.height);
        i64::from(self.corners[(cy * (self.width + 1) + cx) as usize])
    }

    fn tile_of(&self, x: i32, y: i32) -> (u32, u32, i64, i64) {
        let tile = i64::from(TILE_UNITS);
        let max_x = i64::from(self.width) * tile - 1;
        let max_y = i64::from(self.height) * tile - 1;
        let x = i64::from(x).clamp(0, max_x);
        let y = i64::from(y).clamp(0, max_y);
        ((x / tile) as u32, (y / tile) as u32, x % tile, y % tile)
    }
}

impl TerrainQuery for TileMap {
    /// Bilinear interpolation between the four tile corners, in integer math.
    fn height_at(&self, x: i32, y: i32) -> i32 {
        let (tx, ty, fx, fy) = self.tile_of(x, y);
        let tile = i64::from(TILE_UNITS);
        let h00 = self.corner(tx, ty);
        let h10 = self.corner(tx + 1, ty);
        let h01 = self.corner(tx, ty + 1);
        let h11 = self.corner(tx + 1, ty + 1);
        let top = h00 * (tile - fx) + h10 * fx;
        let bottom = h01 * (tile - fx) + h11 * fx;
        ((top * (tile - fy) + bottom * fy) / (tile * tile)) as i32
    }

    fn world_size(&self) -> (i32, i32) {
        (
            self.width as i32 * TILE_UNITS,
            self.height as i32 * TILE_UNITS,
        )
    }

    fn is_water(&self, x: i32, y: i32) -> bool {
        if !self.on_map(x, y) {
            return false;
        }
        let (tx, ty, _, _) = self.tile_of(x, y);
        self.water[(ty * self.width + tx) as usize]
    }
}
