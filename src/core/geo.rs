use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a point in screen or world coordinates.
///
/// Serialized as an `[x, y]` pair, the shape overlay datasets use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [f64; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// Address of a tile in the pyramid: zoom level, row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u8,
    pub row: u32,
    pub col: u32,
}

impl TileCoord {
    pub fn new(z: u8, row: u32, col: u32) -> Self {
        Self { z, row, col }
    }

    /// Number of tiles per axis at this coordinate's zoom level
    pub fn tiles_per_axis(&self) -> u32 {
        1u32 << self.z
    }

    /// Canonical `"{z}-{row}-{col}"` key
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.z, self.row, self.col)
    }
}

/// Rounds half-way cases towards positive infinity.
///
/// Browser-side rounding behaves this way, and translate values computed for
/// programmatic zooms must land on the same pixel.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
