//! # na-map
//!
//! Viewport-driven tile and overlay synchronization engine for the Naval
//! Action world map.
//!
//! The engine turns a continuous zoom/pan transform over the fixed
//! `[0, 8192]²` world into the discrete set of image tiles to draw, the
//! world-space bounds every overlay layer filters against, and the discrete
//! level of detail the layers lay themselves out for. Rendering is left to a
//! backend adapter which consumes [`core::map::FrameState`] snapshots.

pub mod core;
pub mod data;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod tiles;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    bounds::Bounds,
    config::MapConfig,
    geo::{Point, TileCoord},
    lod::{LevelOfDetailPolicy, ZoomLevel},
    map::{FrameState, NaMap},
    transform::Transform,
    viewport::Viewport,
};

pub use layers::{
    base::{LayerFrame, LayerKind, OverlayItem, OverlayLayer},
    compass::CompassLayer,
    grid::GridLayer,
    journey::JourneyLayer,
    labels::LabelLayer,
    manager::LayerManager,
    pb_zone::{PbZoneLayer, PbZoneMode},
    ports::PortLayer,
};

pub use input::{events::InputEvent, handler::InputHandler, zoom::ZoomController};

pub use tiles::{
    join::{TileDiff, TileJoin},
    selector::{TileSelection, TileSelector},
    Tile,
};

pub use data::{dataset::LazyDataset, source::DatasetSource};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "http")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid transform: {0}")]
    InvalidTransform(String),

    #[error("Dataset '{name}' could not be imported: {reason}")]
    Dataset { name: String, reason: String },

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;
