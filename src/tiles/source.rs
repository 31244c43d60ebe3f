use crate::{core::config::TileConfig, tiles::Tile};

/// Trait representing anything that can produce image URLs for a tile.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `tile`.
    fn url(&self, tile: &Tile) -> String;
}

/// Pyramid laid out as `{root}/{z}/{row}/{col}.{extension}`.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalTileSource {
    root: String,
    extension: String,
}

impl LocalTileSource {
    pub fn new(root: impl Into<String>, extension: impl Into<String>) -> Self {
        let root: String = root.into();
        Self {
            root: root.trim_end_matches('/').to_string(),
            extension: extension.into().trim_start_matches('.').to_string(),
        }
    }

    pub fn from_config(config: &TileConfig) -> Self {
        Self::new(config.root.clone(), config.extension.clone())
    }
}

impl Default for LocalTileSource {
    fn default() -> Self {
        Self::from_config(&TileConfig::default())
    }
}

impl TileSource for LocalTileSource {
    fn url(&self, tile: &Tile) -> String {
        format!(
            "{}/{}/{}/{}.{}",
            self.root, tile.z, tile.row, tile.col, self.extension
        )
    }
}
