//! Prelude module for common na-map types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use na_map::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{ChromeConfig, DatasetConfig, GridConfig, InteractionConfig, MapConfig, TileConfig},
    geo::{Point, TileCoord},
    lod::{LevelOfDetailPolicy, ZoomLevel},
    map::{FrameState, NaMap},
    transform::Transform,
    viewport::{TranslateExtent, Viewport},
};

pub use crate::layers::{
    base::{LayerFrame, LayerKind, OverlayItem, OverlayLayer},
    compass::CompassLayer,
    entity::{EntityId, PointEntity, PolygonLabel},
    grid::GridLayer,
    journey::JourneyLayer,
    labels::LabelLayer,
    manager::LayerManager,
    pb_zone::{PbZone, PbZoneLayer, PbZoneMode},
    ports::PortLayer,
};

pub use crate::input::{
    events::{InputEvent, MapEvent},
    handler::{Action, EventManager, InputHandler},
    zoom::ZoomController,
};

pub use crate::tiles::{
    cache::TileCache,
    join::{TileDiff, TileJoin},
    loader::{TileLoadState, TileLoader, TileRequest},
    selector::{TileSelection, TileSelector},
    source::{LocalTileSource, TileSource},
    Tile,
};

pub use crate::data::{
    dataset::{DatasetRequest, LazyDataset},
    source::{DatasetSource, MemoryDatasetSource},
};

pub use crate::traits::{PointMath, Positioned};

pub use crate::{Error as MapError, Result};

pub use std::{collections::VecDeque, sync::Arc};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet, FxHasher};
