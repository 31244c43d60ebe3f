//! Fire-and-forget tile image load tracking.
//!
//! The loader does not fetch anything itself. It turns entering tiles into
//! [`TileRequest`]s for the rendering backend, remembers what is still
//! pending, and records completions as they arrive in any order. A failed or
//! slow tile never holds up the others or the next frame.

use crate::{
    core::{config::TileConfig, geo::TileCoord},
    prelude::{Arc, HashMap},
    tiles::{
        cache::TileCache,
        join::TileDiff,
        source::{LocalTileSource, TileSource},
    },
    Result,
};

#[derive(Debug, Clone, PartialEq)]
pub enum TileLoadState {
    Pending,
    Loaded(Arc<Vec<u8>>),
    Failed(String),
}

impl TileLoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, TileLoadState::Loaded(_))
    }
}

/// Image the backend should start loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRequest {
    pub id: String,
    pub coord: TileCoord,
    pub url: String,
}

pub struct TileLoader {
    source: Box<dyn TileSource>,
    cache: TileCache,
    states: HashMap<TileCoord, TileLoadState>,
}

impl TileLoader {
    pub fn new(source: Box<dyn TileSource>, cache_capacity: usize) -> Self {
        Self {
            source,
            cache: TileCache::new(cache_capacity),
            states: HashMap::default(),
        }
    }

    pub fn from_config(config: &TileConfig) -> Self {
        Self::new(
            Box::new(LocalTileSource::from_config(config)),
            config.cache_size,
        )
    }

    /// Starts tracking entering tiles and forgets exiting ones.
    ///
    /// Returns requests for entering tiles whose image is not cached.
    pub fn apply(&mut self, diff: &TileDiff) -> Vec<TileRequest> {
        for tile in &diff.exit {
            self.states.remove(&tile.coord());
        }

        let mut requests = Vec::new();
        for tile in &diff.enter {
            let coord = tile.coord();
            if let Some(data) = self.cache.get(&coord) {
                self.states.insert(coord, TileLoadState::Loaded(data));
                continue;
            }
            self.states.insert(coord, TileLoadState::Pending);
            requests.push(TileRequest {
                id: tile.id.clone(),
                coord,
                url: self.source.url(tile),
            });
        }

        if !requests.is_empty() {
            log::debug!("requesting {} tiles", requests.len());
        }
        requests
    }

    /// Records the outcome of a request.
    ///
    /// Successful loads are cached even if the tile already left the screen.
    /// Failures are logged and never retried.
    pub fn complete(&mut self, coord: TileCoord, result: Result<Vec<u8>>) {
        match result {
            Ok(data) => {
                let data = self.cache.insert(coord, data);
                if let Some(state) = self.states.get_mut(&coord) {
                    *state = TileLoadState::Loaded(data);
                }
            }
            Err(e) => {
                log::warn!("Failed to load tile {}: {}", coord, e);
                if let Some(state) = self.states.get_mut(&coord) {
                    *state = TileLoadState::Failed(e.to_string());
                }
            }
        }
    }

    pub fn state(&self, coord: &TileCoord) -> Option<&TileLoadState> {
        self.states.get(coord)
    }

    pub fn pending_count(&self) -> usize {
        self.states
            .values()
            .filter(|state| matches!(state, TileLoadState::Pending))
            .count()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_count() > 0
    }

    pub fn tracked_count(&self) -> usize {
        self.states.len()
    }
}

impl Default for TileLoader {
    fn default() -> Self {
        Self::from_config(&TileConfig::default())
    }
}
