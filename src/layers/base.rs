use crate::{
    core::{bounds::Bounds, geo::Point, lod::ZoomLevel, transform::Transform},
    data::dataset::DatasetRequest,
    layers::entity::EntityId,
    Result,
};
use serde::{Deserialize, Serialize};

/// Contract every overlay layer implements.
///
/// The map calls, per committed transform and in this order, `set_bounds`,
/// `apply_transform`, `zoom_level_changed` (only when the level changed) and
/// `refresh`. Bounds and transform may also be set independently; `refresh`
/// always works from the latest of both.
pub trait OverlayLayer: Send + Sync {
    /// Get layer ID
    fn id(&self) -> &str;

    /// Get layer name
    fn name(&self) -> &str;

    fn kind(&self) -> LayerKind;

    /// Get layer z-index for ordering
    fn z_index(&self) -> i32;

    /// Set layer z-index
    fn set_z_index(&mut self, z_index: i32);

    /// Check if layer is visible
    fn is_visible(&self) -> bool;

    /// Set layer visibility
    fn set_visible(&mut self, visible: bool);

    /// Stores the latest world-space viewport rectangle
    fn set_bounds(&mut self, bounds: Bounds);

    /// Re-projects the layer's root group. Idempotent per transform.
    fn apply_transform(&mut self, transform: Transform);

    /// Level dependent layout; only called when the level actually changes
    fn zoom_level_changed(&mut self, _level: ZoomLevel) {}

    /// Re-runs the visibility filter against the latest bounds and
    /// rebuilds [`OverlayLayer::frame`]
    fn refresh(&mut self, level: ZoomLevel) -> Result<()>;

    /// Output of the last refresh
    fn frame(&self) -> &LayerFrame;

    /// Dataset this layer needs fetched, if any. Hands out each dataset once.
    fn dataset_request(&mut self, _level: ZoomLevel) -> Option<DatasetRequest> {
        None
    }

    /// Delivers the outcome of a request from [`OverlayLayer::dataset_request`].
    ///
    /// Returns `true` when the layer took the payload and needs a refresh.
    fn receive_dataset(&mut self, _payload: Result<Vec<u8>>) -> bool {
        false
    }

    /// Dynamic casting support
    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    Grid,
    Ports,
    PbZones,
    Labels,
    Journey,
    Compass,
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::Grid => write!(f, "grid"),
            LayerKind::Ports => write!(f, "ports"),
            LayerKind::PbZones => write!(f, "pb-zones"),
            LayerKind::Labels => write!(f, "labels"),
            LayerKind::Journey => write!(f, "journey"),
            LayerKind::Compass => write!(f, "compass"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub kind: LayerKind,
    pub z_index: i32,
    pub visible: bool,
}

impl LayerProperties {
    pub fn new(id: String, name: String, kind: LayerKind) -> Self {
        Self {
            id,
            name,
            kind,
            z_index: 0,
            visible: true,
        }
    }

    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }
}

/// Latest bounds and transform a layer was told about, plus its output
#[derive(Debug, Clone, Default)]
pub struct LayerView {
    pub bounds: Bounds,
    pub transform: Transform,
    pub frame: LayerFrame,
}

impl LayerView {
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.frame.transform = transform;
    }

    /// Replaces the frame's items, keeping it in sync with the transform
    pub fn publish(&mut self, items: Vec<OverlayItem>) {
        self.frame = LayerFrame {
            transform: self.transform,
            items,
        };
    }
}

/// Backend-neutral output of a layer: what to draw, in world coordinates,
/// under which root transform
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerFrame {
    pub transform: Transform,
    pub items: Vec<OverlayItem>,
}

impl LayerFrame {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CircleRole {
    PortBattle,
    Join,
    Raid,
    RaidPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Vertical line at a fixed x
    X,
    /// Horizontal line at a fixed y
    Y,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OverlayItem {
    Marker {
        id: EntityId,
        position: Point,
        selected: bool,
    },
    Label {
        text: String,
        position: Point,
        angle: f64,
    },
    Circle {
        zone: EntityId,
        center: Point,
        role: CircleRole,
    },
    GridLine {
        axis: Axis,
        value: f64,
        from: f64,
        to: f64,
    },
    Segment {
        index: usize,
        from: Point,
        to: Point,
    },
    Compass {
        position: Point,
    },
    CoordinateMarker {
        position: Point,
    },
}
