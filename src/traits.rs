//! Shared trait abstractions for common patterns
//!
//! Point arithmetic and the representative-point contract overlay entities
//! share, so layers and bounds filtering work against one abstraction.

use crate::core::geo::Point;

/// Point math operations trait to consolidate point calculations
pub trait PointMath {
    /// Add two points
    fn add(&self, other: &Self) -> Self;

    /// Subtract two points
    fn subtract(&self, other: &Self) -> Self;

    /// Multiply by scalar
    fn multiply(&self, scalar: f64) -> Self;
}

impl PointMath for Point {
    fn add(&self, other: &Self) -> Self {
        Point::new(self.x + other.x, self.y + other.y)
    }

    fn subtract(&self, other: &Self) -> Self {
        Point::new(self.x - other.x, self.y - other.y)
    }

    fn multiply(&self, scalar: f64) -> Self {
        Point::new(self.x * scalar, self.y * scalar)
    }
}

/// Anything with a representative world-space point.
///
/// Bounds filtering only ever looks at this point: a port's coordinates, a
/// polygon's centroid, a zone's anchor.
pub trait Positioned {
    fn position(&self) -> Point;
}

impl Positioned for Point {
    fn position(&self) -> Point {
        *self
    }
}
