use crate::core::{bounds::Bounds, geo::Point, lod::ZoomLevel, transform::Transform};
use serde::{Deserialize, Serialize};

/// Screen-space input the map reacts to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Double click/tap
    DoubleClick { position: Point },
    /// Start of drag operation
    DragStart { position: Point },
    /// Drag in progress
    Drag { delta: Point },
    /// End of drag operation
    DragEnd,
    /// Scroll wheel; only the sign of `delta_y` matters
    Scroll { delta_y: f64, position: Point },
    /// Two finger pinch, `scale` relative to the previous tick
    Pinch { center: Point, scale: f64 },
    /// Viewport/window resize
    Resize { size: Point },
}

/// Events emitted by the map after a commit
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// A new transform went through the whole pipeline
    TransformCommitted { transform: Transform, bounds: Bounds },
    /// The level of detail crossed a threshold
    ZoomLevelChanged { level: ZoomLevel },
    /// Tiles entered or left the screen
    TilesChanged { entered: usize, exited: usize },
    /// A lazily loaded dataset arrived
    DatasetLoaded { layer_id: String },
    /// A lazily loaded dataset could not be imported
    DatasetFailed { layer_id: String, reason: String },
    /// Layer was added to the map
    LayerAdd { layer_id: String },
    /// Layer was removed from the map
    LayerRemove { layer_id: String },
}

impl MapEvent {
    /// Key used to register listeners for this kind of event
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::TransformCommitted { .. } => "transformcommitted",
            MapEvent::ZoomLevelChanged { .. } => "zoomlevelchanged",
            MapEvent::TilesChanged { .. } => "tileschanged",
            MapEvent::DatasetLoaded { .. } => "datasetloaded",
            MapEvent::DatasetFailed { .. } => "datasetfailed",
            MapEvent::LayerAdd { .. } => "layeradd",
            MapEvent::LayerRemove { .. } => "layerremove",
        }
    }
}
