//! Screen/world affine transform: translate `(x, y)` in screen pixels plus a
//! uniform scale `k`.

use crate::{
    constants::SCALE_PRECISION,
    core::geo::Point,
    traits::PointMath,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Maps world point `w` to screen point `w * k + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    pub fn identity() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    /// identity ∘ translate(tx, ty) ∘ scale(k)
    ///
    /// The scale is applied first, so the translation stays in screen pixels.
    pub fn compose(translate_x: f64, translate_y: f64, scale: f64) -> Self {
        Self::identity()
            .translate(translate_x, translate_y)
            .scale(scale)
    }

    /// Post-multiplies a translation given in this transform's local units.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + self.k * dx, self.y + self.k * dy, self.k)
    }

    /// Post-multiplies a uniform scale.
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.x, self.y, self.k * factor)
    }

    /// World point to screen point
    pub fn apply(&self, world: Point) -> Point {
        world.multiply(self.k).add(&self.translation())
    }

    /// Screen point to world point
    pub fn invert(&self, screen: Point) -> Point {
        Point::new(self.invert_x(screen.x), self.invert_y(screen.y))
    }

    pub fn invert_x(&self, screen_x: f64) -> f64 {
        (screen_x - self.x) / self.k
    }

    pub fn invert_y(&self, screen_y: f64) -> f64 {
        (screen_y - self.y) / self.k
    }

    pub fn translation(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Same transform with `k` passed through [`round_scale`]
    pub fn with_rounded_scale(&self) -> Self {
        Self::new(self.x, self.y, round_scale(self.k))
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.k.is_finite()
    }
}

/// Rounds a scale to [`SCALE_PRECISION`] decimal digits.
///
/// Frames whose scales differ below this precision must produce identical
/// tile sets.
pub fn round_scale(k: f64) -> f64 {
    let factor = 10_f64.powi(SCALE_PRECISION);
    (k * factor).round() / factor
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate({},{}) scale({})", self.x, self.y, self.k)
    }
}

impl FromStr for Transform {
    type Err = MapError;

    /// Parses the canonical `translate(x,y) scale(k)` form.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || MapError::InvalidTransform(s.to_string());

        let rest = s.trim().strip_prefix("translate(").ok_or_else(invalid)?;
        let (translate, rest) = rest.split_once(')').ok_or_else(invalid)?;
        let (x, y) = translate.split_once(',').ok_or_else(invalid)?;

        let scale = rest
            .trim()
            .strip_prefix("scale(")
            .and_then(|r| r.strip_suffix(')'))
            .ok_or_else(invalid)?;

        let parse = |v: &str| v.trim().parse::<f64>().map_err(|_| invalid());
        let transform = Transform::new(parse(x)?, parse(y)?, parse(scale)?);

        if !transform.is_finite() || transform.k <= 0.0 {
            return Err(invalid());
        }
        Ok(transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_scales_before_translating() {
        let t = Transform::compose(10.0, 20.0, 2.0);
        assert_eq!(t, Transform::new(10.0, 20.0, 2.0));

        // world origin lands on the translation
        assert_eq!(t.apply(Point::new(0.0, 0.0)), Point::new(10.0, 20.0));
        assert_eq!(t.apply(Point::new(5.0, 5.0)), Point::new(20.0, 30.0));
    }

    #[test]
    fn test_translate_uses_local_units() {
        let t = Transform::new(0.0, 0.0, 2.0).translate(10.0, -5.0);
        assert_eq!(t, Transform::new(20.0, -10.0, 2.0));
    }

    #[test]
    fn test_invert_round_trips_apply() {
        let t = Transform::new(-8280.0, -4604.0, 2.0);
        let world = Point::new(4396.0, 2494.0);
        let screen = t.apply(world);
        assert_eq!(screen, Point::new(512.0, 384.0));
        assert_eq!(t.invert(screen), world);
    }

    #[test]
    fn test_round_scale() {
        assert_eq!(round_scale(1.23449), 1.234);
        assert_eq!(round_scale(1.2345001), 1.235);
        assert_eq!(round_scale(0.125), 0.125);
        assert_eq!(round_scale(2.0000004), 2.0);
    }

    #[test]
    fn test_display_and_parse() {
        let t = Transform::new(-8280.0, -4604.5, 2.0);
        let s = t.to_string();
        assert_eq!(s, "translate(-8280,-4604.5) scale(2)");
        assert_eq!(s.parse::<Transform>().unwrap(), t);

        let spaced: Transform = " translate( 1.5 , 2 )  scale( 0.25 ) ".parse().unwrap();
        assert_eq!(spaced, Transform::new(1.5, 2.0, 0.25));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("scale(2)".parse::<Transform>().is_err());
        assert!("translate(1,2)".parse::<Transform>().is_err());
        assert!("translate(a,2) scale(1)".parse::<Transform>().is_err());
        assert!("translate(1,2) scale(0)".parse::<Transform>().is_err());
        assert!("translate(1,2) scale(NaN)".parse::<Transform>().is_err());
    }
}
