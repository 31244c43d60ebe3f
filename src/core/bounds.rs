use crate::{
    core::{geo::Point, transform::Transform, viewport::Viewport},
    traits::Positioned,
};
use serde::{Deserialize, Serialize};

/// Axis-aligned world-space rectangle, `lower` being the top-left corner.
///
/// Every overlay layer filters its entities against the bounds of the current
/// frame. Bounds are a filter predicate only: at the smallest scales they can
/// reach outside world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: Point,
    pub upper: Point,
}

impl Bounds {
    /// Creates new bounds from two corners
    pub fn new(lower: Point, upper: Point) -> Self {
        Self { lower, upper }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(Point::new(min_x, min_y), Point::new(max_x, max_y))
    }

    /// World-space rectangle visible through `transform` on a `width`×`height`
    /// screen.
    ///
    /// The lower corner is the inverse of `(world_min, world_min)`, the upper
    /// corner the inverse of the far screen corner. No clamping is applied.
    pub fn from_transform(transform: &Transform, width: f64, height: f64, world_min: f64) -> Self {
        Self::new(
            transform.invert(Point::new(world_min, world_min)),
            transform.invert(Point::new(width, height)),
        )
    }

    /// Shorthand for [`Bounds::from_transform`] with a viewport
    pub fn visible(transform: &Transform, viewport: &Viewport) -> Self {
        Self::from_transform(
            transform,
            viewport.width,
            viewport.height,
            crate::constants::WORLD_MIN,
        )
    }

    /// Gets the width of the bounds
    pub fn width(&self) -> f64 {
        self.upper.x - self.lower.x
    }

    /// Gets the height of the bounds
    pub fn height(&self) -> f64 {
        self.upper.y - self.lower.y
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> Point {
        Point::new(
            (self.lower.x + self.upper.x) / 2.0,
            (self.lower.y + self.upper.y) / 2.0,
        )
    }

    /// Closed-interval containment on both axes; points on an edge are inside.
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.lower.x
            && point.x <= self.upper.x
            && point.y >= self.lower.y
            && point.y <= self.upper.y
    }

    /// Checks if the bounds intersect with another bounds
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(other.upper.x < self.lower.x
            || other.lower.x > self.upper.x
            || other.upper.y < self.lower.y
            || other.lower.y > self.upper.y)
    }

    /// Gets the intersection of two bounds
    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        if !self.intersects(other) {
            return None;
        }

        Some(Bounds::new(
            Point::new(self.lower.x.max(other.lower.x), self.lower.y.max(other.lower.y)),
            Point::new(self.upper.x.min(other.upper.x), self.upper.y.min(other.upper.y)),
        ))
    }

    /// Smallest bounds holding both points
    pub fn spanning(a: Point, b: Point) -> Self {
        Self::new(
            Point::new(a.x.min(b.x), a.y.min(b.y)),
            Point::new(a.x.max(b.x), a.y.max(b.y)),
        )
    }

    /// Checks if the bounds are valid (lower <= upper)
    pub fn is_valid(&self) -> bool {
        self.lower.x <= self.upper.x && self.lower.y <= self.upper.y
    }

    /// Gets the area of the bounds
    pub fn area(&self) -> f64 {
        if !self.is_valid() {
            0.0
        } else {
            self.width() * self.height()
        }
    }

    /// Keeps the items whose representative point lies inside the bounds
    pub fn filter_visible<'a, T: Positioned>(&self, items: &'a [T]) -> Vec<&'a T> {
        items
            .iter()
            .filter(|item| self.contains(&item.position()))
            .collect()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(Point::new(0.0, 0.0), Point::new(0.0, 0.0))
    }
}
