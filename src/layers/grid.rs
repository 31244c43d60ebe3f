//! Coordinate grid over the visible part of the world.
//!
//! Line spacing is a power-of-two number of world units, the smallest one
//! that keeps neighbouring lines at least `min_line_spacing_px` apart on
//! screen at the current scale.

use crate::{
    constants::{WORLD_MAX, WORLD_MIN},
    core::{config::GridConfig, lod::ZoomLevel},
    impl_layer_constructor, impl_layer_trait,
    layers::base::{Axis, LayerKind, LayerProperties, LayerView, OverlayItem, OverlayLayer},
    Result,
};

pub struct GridLayer {
    properties: LayerProperties,
    view: LayerView,
    min_line_spacing_px: f64,
}

impl GridLayer {
    impl_layer_constructor!(LayerKind::Grid);

    fn with_properties(properties: LayerProperties) -> Self {
        Self {
            properties,
            view: LayerView::default(),
            min_line_spacing_px: GridConfig::default().min_line_spacing_px,
        }
    }

    pub fn from_config(id: impl Into<String>, name: impl Into<String>, config: &GridConfig) -> Self {
        Self::new(id, name).with_min_spacing(config.min_line_spacing_px)
    }

    pub fn with_min_spacing(mut self, px: f64) -> Self {
        self.min_line_spacing_px = px;
        self
    }

    /// World units between two lines at scale `k`
    pub fn spacing(&self, k: f64) -> f64 {
        if !(k.is_finite() && k > 0.0) || !(self.min_line_spacing_px > 0.0) {
            return WORLD_MAX;
        }
        let exponent = (self.min_line_spacing_px / k).log2().ceil();
        2_f64.powf(exponent).clamp(1.0, WORLD_MAX)
    }
}

/// Multiples of `step` inside `[from, to]`
fn lines_between(from: f64, to: f64, step: f64) -> impl Iterator<Item = f64> {
    let first = (from / step).ceil() as i64;
    let last = (to / step).floor() as i64;
    (first..=last).map(move |i| i as f64 * step)
}

impl OverlayLayer for GridLayer {
    impl_layer_trait!(properties, view);

    fn refresh(&mut self, _level: ZoomLevel) -> Result<()> {
        if !self.properties.visible {
            self.view.publish(Vec::new());
            return Ok(());
        }

        let bounds = self.view.bounds;
        let x0 = bounds.lower.x.max(WORLD_MIN);
        let x1 = bounds.upper.x.min(WORLD_MAX);
        let y0 = bounds.lower.y.max(WORLD_MIN);
        let y1 = bounds.upper.y.min(WORLD_MAX);
        if x0 > x1 || y0 > y1 {
            self.view.publish(Vec::new());
            return Ok(());
        }

        let step = self.spacing(self.view.transform.k);
        let mut items: Vec<OverlayItem> = lines_between(x0, x1, step)
            .map(|value| OverlayItem::GridLine {
                axis: Axis::X,
                value,
                from: y0,
                to: y1,
            })
            .collect();
        items.extend(lines_between(y0, y1, step).map(|value| OverlayItem::GridLine {
            axis: Axis::Y,
            value,
            from: x0,
            to: x1,
        }));

        self.view.publish(items);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{bounds::Bounds, transform::Transform};

    fn line_values(layer: &GridLayer, axis: Axis) -> Vec<f64> {
        layer
            .frame()
            .items
            .iter()
            .filter_map(|item| match item {
                OverlayItem::GridLine { axis: a, value, .. } if *a == axis => Some(*value),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_spacing_keeps_lines_apart() {
        let grid = GridLayer::new("grid", "Grid");

        assert_eq!(grid.spacing(0.125), 1024.0);
        assert_eq!(grid.spacing(1.0), 128.0);
        assert_eq!(grid.spacing(8.0), 16.0);
        assert_eq!(grid.spacing(0.0), WORLD_MAX);
        for k in [0.125, 0.3, 1.0, 2.7, 8.0] {
            assert!(grid.spacing(k) * k >= 100.0);
        }
    }

    #[test]
    fn test_lines_clipped_to_world() {
        let mut grid = GridLayer::new("grid", "Grid");
        grid.set_bounds(Bounds::from_coords(-5.0, -2.5, 8192.0, 6144.0));
        grid.apply_transform(Transform::new(0.0, 0.0, 0.125));
        grid.refresh(ZoomLevel::Initial).unwrap();

        assert_eq!(
            line_values(&grid, Axis::X),
            vec![0.0, 1024.0, 2048.0, 3072.0, 4096.0, 5120.0, 6144.0, 7168.0, 8192.0]
        );
        assert_eq!(line_values(&grid, Axis::Y).len(), 7);
        match &grid.frame().items[0] {
            OverlayItem::GridLine { from, to, .. } => {
                assert_eq!(*from, 0.0);
                assert_eq!(*to, 6144.0);
            }
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn test_hidden_grid_is_empty() {
        let mut grid = GridLayer::new("grid", "Grid");
        grid.set_bounds(Bounds::from_coords(0.0, 0.0, 8192.0, 8192.0));
        grid.set_visible(false);
        grid.refresh(ZoomLevel::Initial).unwrap();
        assert!(grid.frame().is_empty());
    }
}
