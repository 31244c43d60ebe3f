//! Tile pyramid plumbing: which tiles cover the screen, how they are joined
//! against the tiles already on screen, where their images live and which of
//! them are still loading.

pub mod cache;
pub mod join;
pub mod loader;
pub mod selector;
pub mod source;

use crate::core::geo::TileCoord;
use serde::{Deserialize, Serialize};

// Re-exports for convenience
pub use join::{TileDiff, TileJoin};
pub use loader::{TileLoadState, TileLoader, TileRequest};
pub use selector::{TileSelection, TileSelector};
pub use source::{LocalTileSource, TileSource};

/// One tile of the pyramid, identified by its canonical `"{z}-{row}-{col}"` id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub z: u8,
    pub row: u32,
    pub col: u32,
    pub id: String,
}

impl Tile {
    pub fn new(z: u8, row: u32, col: u32) -> Self {
        TileCoord::new(z, row, col).into()
    }

    pub fn coord(&self) -> TileCoord {
        TileCoord::new(self.z, self.row, self.col)
    }
}

impl From<TileCoord> for Tile {
    fn from(coord: TileCoord) -> Self {
        Self {
            z: coord.z,
            row: coord.row,
            col: coord.col,
            id: coord.id(),
        }
    }
}
