use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TerrainError {
    #[error("map must be at least one tile in each direction")]
    EmptyMap,

    #[error("expected {expected} corner heights, got {actual}")]
    CornerCount { expected: usize, actual: usize },

    #[error("tile ({tile_x}, {tile_y}) is off the map")]
    TileOutOfRange { tile_x: u32, tile_y: u32 },
}
