use crate::{
    constants::{MAX_SCALE, MIN_SCALE_FLOOR, WORLD_MAX, WORLD_MIN},
    core::{config::ChromeConfig, geo::{round_half_up, Point}, transform::Transform},
};
use serde::{Deserialize, Serialize};

/// Pixel size of the map's screen area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> Point {
        Point::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// True when either side is zero, negative or not a number
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }

    /// Smallest interactive scale: the power of two nearest to the scale that
    /// fits the whole world into the shorter screen side.
    pub fn min_scale(&self) -> f64 {
        if self.is_degenerate() {
            return MIN_SCALE_FLOOR;
        }
        nearest_power_of_two(self.width.min(self.height) / WORLD_MAX)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}

/// `2^round(log2(value))`, kept inside `[MIN_SCALE_FLOOR, MAX_SCALE]`.
///
/// Non-positive and non-finite input yields `MIN_SCALE_FLOOR`.
pub fn nearest_power_of_two(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return MIN_SCALE_FLOOR;
    }
    2_f64
        .powf(round_half_up(value.log2()))
        .clamp(MIN_SCALE_FLOOR, MAX_SCALE)
}

/// World-space rectangle the viewport may pan over.
///
/// The negative side leaves room for the grid axis backgrounds drawn over
/// the top and left screen edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TranslateExtent {
    pub lower: Point,
    pub upper: Point,
}

impl TranslateExtent {
    pub fn new(min_scale: f64, chrome: &ChromeConfig) -> Self {
        Self {
            lower: Point::new(
                WORLD_MIN - chrome.y_grid_background_width * min_scale,
                WORLD_MIN - chrome.x_grid_background_height * min_scale,
            ),
            upper: Point::new(WORLD_MAX, WORLD_MAX),
        }
    }

    /// Shifts `transform` so the extent covers the viewport on each axis.
    ///
    /// When the scaled extent is narrower than the viewport on an axis it is
    /// centered on that axis instead. The scale is left untouched.
    pub fn constrain(&self, transform: Transform, viewport: &Viewport) -> Transform {
        let dx0 = transform.invert_x(0.0) - self.lower.x;
        let dx1 = transform.invert_x(viewport.width) - self.upper.x;
        let dy0 = transform.invert_y(0.0) - self.lower.y;
        let dy1 = transform.invert_y(viewport.height) - self.upper.y;

        transform.translate(axis_shift(dx0, dx1), axis_shift(dy0, dy1))
    }

    /// Whether `transform` already satisfies [`TranslateExtent::constrain`]
    pub fn admits(&self, transform: &Transform, viewport: &Viewport) -> bool {
        const EPSILON: f64 = 1e-6;

        let axis_ok = |start: f64, end: f64, lower: f64, upper: f64| {
            if end - start > upper - lower {
                ((start - lower) + (end - upper)).abs() <= EPSILON * transform.k.recip().max(1.0)
            } else {
                start >= lower - EPSILON && end <= upper + EPSILON
            }
        };

        axis_ok(
            transform.invert_x(0.0),
            transform.invert_x(viewport.width),
            self.lower.x,
            self.upper.x,
        ) && axis_ok(
            transform.invert_y(0.0),
            transform.invert_y(viewport.height),
            self.lower.y,
            self.upper.y,
        )
    }
}

fn axis_shift(d0: f64, d1: f64) -> f64 {
    if d1 > d0 {
        return (d0 + d1) / 2.0;
    }
    let towards_lower = d0.min(0.0);
    if towards_lower != 0.0 {
        towards_lower
    } else {
        d1.max(0.0)
    }
}
