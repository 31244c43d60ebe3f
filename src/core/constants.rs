//! Engine-wide constants of the Naval Action map.
//! These are fixed by the tile pyramid and the world data; nothing here is
//! runtime-configurable.

/// Lower edge of world space on both axes.
pub const WORLD_MIN: f64 = 0.0;

/// Upper edge of world space on both axes.
pub const WORLD_MAX: f64 = 8192.0;

/// Square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Largest interactive scale.
pub const MAX_SCALE: f64 = 8.0;

/// Fallback scale when the viewport is collapsed (2^-8).
pub const MIN_SCALE_FLOOR: f64 = 1.0 / 256.0;

/// Ratio applied per wheel notch; also the base of the tile-local scale.
pub const WHEEL_DELTA: f64 = 0.5;

/// Scales above this show port labels.
pub const LABEL_ZOOM_THRESHOLD: f64 = 0.5;

/// Scales above this show port-battle zones.
pub const PB_ZONE_ZOOM_THRESHOLD: f64 = 1.5;

/// Decimal digits kept by `round_scale`.
pub const SCALE_PRECISION: i32 = 3;

/// Default file extension of tile images.
pub const TILE_IMAGE_EXTENSION: &str = "webp";

/// Default directory of the tile pyramid.
pub const TILE_ROOT: &str = "images/map";
