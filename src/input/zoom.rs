//! Interactive zoom/pan state.
//!
//! The controller is the only owner of the committed [`Transform`]. Every
//! gesture proposes a transform which then runs through one pipeline: the
//! scale is clamped to `[min_scale, MAX_SCALE]` and rounded, the translation
//! is constrained to the translate extent. Out-of-range input is clamped,
//! non-finite input is dropped and the previous transform stays.

use crate::{
    constants::{MAX_SCALE, WHEEL_DELTA},
    core::{
        config::ChromeConfig,
        geo::{round_half_up, Point},
        transform::{round_scale, Transform},
        viewport::{TranslateExtent, Viewport},
    },
    input::handler::Action,
    traits::PointMath,
};

#[derive(Debug, Clone)]
pub struct ZoomController {
    transform: Transform,
    viewport: Viewport,
    min_scale: f64,
    extent: TranslateExtent,
    chrome: ChromeConfig,
}

impl ZoomController {
    /// Starts at `{0, 0, min_scale}`, the whole world at the smallest scale
    pub fn new(viewport: Viewport, chrome: ChromeConfig) -> Self {
        let min_scale = viewport.min_scale();
        let extent = TranslateExtent::new(min_scale, &chrome);
        let mut controller = Self {
            transform: Transform::new(0.0, 0.0, min_scale),
            viewport,
            min_scale,
            extent,
            chrome,
        };
        controller.commit(Transform::new(0.0, 0.0, min_scale));
        controller
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn min_scale(&self) -> f64 {
        self.min_scale
    }

    pub fn max_scale(&self) -> f64 {
        MAX_SCALE
    }

    pub fn extent(&self) -> TranslateExtent {
        self.extent
    }

    /// Runs one action through the pipeline, returns whether the transform
    /// changed.
    pub fn apply(&mut self, action: &Action) -> bool {
        match *action {
            Action::Pan { delta } => self.drag(delta),
            Action::Wheel { delta_y, anchor } => self.wheel(delta_y, anchor),
            Action::Pinch { factor, anchor } => self.pinch(factor, anchor),
            Action::ZoomToScreenPoint { position, scale } => self.double_click(position, scale),
            Action::ZoomToPoint { point, scale } => self.zoom_to_point(point, scale),
            Action::Resize { viewport } => self.resize(viewport),
        }
    }

    /// One wheel notch halves or doubles the scale around `anchor`
    pub fn wheel(&mut self, delta_y: f64, anchor: Point) -> bool {
        if !delta_y.is_finite() || !anchor.is_finite() || delta_y == 0.0 {
            return false;
        }
        let k = self.transform.k * WHEEL_DELTA.powf(delta_y.signum());
        self.scale_at(k, anchor)
    }

    /// Translates by a screen-space delta
    pub fn drag(&mut self, delta: Point) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let t = self.transform;
        self.commit(Transform::new(t.x + delta.x, t.y + delta.y, t.k))
    }

    /// Multiplies the scale by `factor` around `anchor`
    pub fn pinch(&mut self, factor: f64, anchor: Point) -> bool {
        if !factor.is_finite() || factor <= 0.0 || !anchor.is_finite() {
            return false;
        }
        let k = self.transform.k * factor;
        self.scale_at(k, anchor)
    }

    /// Centers world `point` on screen at `scale`.
    ///
    /// The scale is clamped and rounded before the translation is derived,
    /// so the point ends up centered at the scale actually committed.
    pub fn zoom_to_point(&mut self, point: Point, scale: f64) -> bool {
        if !point.is_finite() || !scale.is_finite() {
            return false;
        }
        let k = self.committable_scale(scale);
        let center = self.viewport.center();
        let x = round_half_up(-point.x * k + center.x);
        let y = round_half_up(-point.y * k + center.y);
        self.commit(Transform::new(x, y, k))
    }

    /// Zooms to the world point under screen `position`
    pub fn double_click(&mut self, position: Point, scale: f64) -> bool {
        if !position.is_finite() {
            return false;
        }
        let target = self.transform.invert(position);
        self.zoom_to_point(target, scale)
    }

    /// Adopts a new screen size and re-clamps the current transform
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.min_scale = viewport.min_scale();
        self.extent = TranslateExtent::new(self.min_scale, &self.chrome);
        log::debug!(
            "resized to {}x{}, min scale {}",
            viewport.width,
            viewport.height,
            self.min_scale
        );
        self.commit(self.transform);
        true
    }

    /// Commits an externally supplied transform, e.g. one parsed back from
    /// its string form
    pub fn set_transform(&mut self, transform: Transform) -> bool {
        self.commit(transform)
    }

    fn clamp_scale(&self, k: f64) -> f64 {
        k.clamp(self.min_scale, MAX_SCALE)
    }

    /// Scale `k` becomes once committed; rounding can step outside the
    /// scale extent, so it is clamped on both sides
    fn committable_scale(&self, k: f64) -> f64 {
        self.clamp_scale(round_scale(self.clamp_scale(k)))
    }

    fn scale_at(&mut self, k: f64, anchor: Point) -> bool {
        let k = self.clamp_scale(k);
        let translate = anchor.subtract(&self.transform.invert(anchor).multiply(k));
        self.commit(Transform::new(translate.x, translate.y, k))
    }

    fn commit(&mut self, proposed: Transform) -> bool {
        if !proposed.is_finite() || proposed.k <= 0.0 {
            log::debug!("ignoring non-finite transform {}", proposed);
            return false;
        }

        let k = self.committable_scale(proposed.k);
        let constrained = self
            .extent
            .constrain(Transform::new(proposed.x, proposed.y, k), &self.viewport);

        if !constrained.is_finite() {
            return false;
        }
        let changed = constrained != self.transform;
        self.transform = constrained;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ZoomController {
        ZoomController::new(Viewport::new(1024.0, 768.0), ChromeConfig::default())
    }

    fn assert_clamped(zoom: &ZoomController) {
        let t = zoom.transform();
        assert!(t.k >= zoom.min_scale() && t.k <= zoom.max_scale(), "k = {}", t.k);
        assert!(zoom.extent().admits(&t, &zoom.viewport()), "{} not admitted", t);
    }

    #[test]
    fn test_initial_transform() {
        let zoom = controller();
        assert_eq!(zoom.min_scale(), 0.125);
        assert_eq!(zoom.transform(), Transform::new(0.0, 0.0, 0.125));
    }

    #[test]
    fn test_double_click_centers_target() {
        let mut zoom = controller();
        // screen point over world (4396, 2494) at k = 0.125
        let changed = zoom.double_click(Point::new(549.5, 311.75), 2.0);

        assert!(changed);
        assert_eq!(zoom.transform(), Transform::new(-8280.0, -4604.0, 2.0));
    }

    #[test]
    fn test_wheel_steps_by_powers_of_two() {
        let mut zoom = controller();
        zoom.zoom_to_point(Point::new(4096.0, 4096.0), 1.0);

        zoom.wheel(-3.0, Point::new(512.0, 384.0));
        assert_eq!(zoom.transform().k, 2.0);
        zoom.wheel(250.0, Point::new(512.0, 384.0));
        assert_eq!(zoom.transform().k, 1.0);
        assert!(!zoom.wheel(0.0, Point::new(512.0, 384.0)));
        assert_eq!(zoom.transform().k, 1.0);
    }

    #[test]
    fn test_wheel_keeps_anchor_fixed() {
        let mut zoom = controller();
        zoom.zoom_to_point(Point::new(4096.0, 4096.0), 1.0);
        let anchor = Point::new(300.0, 200.0);
        let before = zoom.transform().invert(anchor);

        zoom.wheel(-1.0, anchor);
        let after = zoom.transform().invert(anchor);

        assert!((before.x - after.x).abs() < 1e-9);
        assert!((before.y - after.y).abs() < 1e-9);
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut zoom = controller();
        for _ in 0..10 {
            zoom.wheel(-1.0, Point::new(512.0, 384.0));
        }
        assert_eq!(zoom.transform().k, MAX_SCALE);

        for _ in 0..20 {
            zoom.wheel(1.0, Point::new(512.0, 384.0));
        }
        assert_eq!(zoom.transform().k, 0.125);
        assert_clamped(&zoom);
    }

    #[test]
    fn test_drag_is_constrained_to_extent() {
        let mut zoom = controller();
        zoom.zoom_to_point(Point::new(4096.0, 4096.0), 2.0);

        zoom.drag(Point::new(1.0e6, 1.0e6));
        assert_clamped(&zoom);
        // left/top edge of the extent sits at the screen edge
        assert_eq!(zoom.transform().invert_x(0.0), -40.0 * 0.125);
        assert_eq!(zoom.transform().invert_y(0.0), -20.0 * 0.125);

        zoom.drag(Point::new(-1.0e6, -1.0e6));
        assert_clamped(&zoom);
        assert_eq!(zoom.transform().invert_x(1024.0), 8192.0);
    }

    #[test]
    fn test_zoom_to_point_clamps_scale_first() {
        let mut zoom = controller();
        zoom.zoom_to_point(Point::new(4096.0, 4096.0), 100.0);

        let t = zoom.transform();
        assert_eq!(t.k, MAX_SCALE);
        assert_eq!(t.x, -4096.0 * 8.0 + 512.0);
        assert_eq!(t.y, -4096.0 * 8.0 + 384.0);
    }

    #[test]
    fn test_scale_is_rounded() {
        let mut zoom = controller();
        zoom.zoom_to_point(Point::new(4096.0, 4096.0), 1.0);
        zoom.pinch(1.23456, Point::new(512.0, 384.0));

        assert_eq!(zoom.transform().k, 1.235);
    }

    #[test]
    fn test_zoom_to_point_centers_at_committed_scale() {
        let mut zoom = controller();
        let target = Point::new(4000.0, 4000.0);
        zoom.zoom_to_point(target, 1.23456);

        let t = zoom.transform();
        assert_eq!(t.k, 1.235);
        assert_eq!(t.x, -4428.0);
        assert_eq!(t.y, -4556.0);
        let screen = t.apply(target);
        assert!((screen.x - 512.0).abs() < 1e-6 && (screen.y - 384.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_input_is_ignored() {
        let mut zoom = controller();
        let before = zoom.transform();

        assert!(!zoom.wheel(f64::NAN, Point::new(0.0, 0.0)));
        assert!(!zoom.drag(Point::new(f64::INFINITY, 0.0)));
        assert!(!zoom.pinch(f64::NAN, Point::new(0.0, 0.0)));
        assert!(!zoom.zoom_to_point(Point::new(f64::NAN, 1.0), 2.0));
        assert!(!zoom.set_transform(Transform::new(0.0, 0.0, f64::NAN)));
        assert_eq!(zoom.transform(), before);
    }

    #[test]
    fn test_resize_updates_min_scale() {
        let mut zoom = controller();
        assert!(zoom.resize(Viewport::new(2048.0, 2048.0)));
        assert_eq!(zoom.min_scale(), 0.25);
        assert_eq!(zoom.transform().k, 0.25);
        assert_clamped(&zoom);
    }

    #[test]
    fn test_collapsed_viewport_does_not_produce_nan() {
        let mut zoom = controller();
        zoom.resize(Viewport::new(0.0, 0.0));

        assert!(zoom.transform().is_finite());
        assert_eq!(zoom.min_scale(), crate::constants::MIN_SCALE_FLOOR);
    }

    #[test]
    fn test_apply_dispatches_actions() {
        let mut zoom = controller();
        assert!(zoom.apply(&Action::ZoomToPoint {
            point: Point::new(4396.0, 2494.0),
            scale: 2.0,
        }));
        assert!(zoom.apply(&Action::Pan {
            delta: Point::new(-10.0, 0.0),
        }));
        assert_eq!(zoom.transform(), Transform::new(-8290.0, -4604.0, 2.0));
    }
}
