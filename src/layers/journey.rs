use crate::{
    core::{bounds::Bounds, geo::Point, lod::ZoomLevel},
    impl_layer_constructor, impl_layer_trait,
    layers::base::{LayerKind, LayerProperties, LayerView, OverlayItem, OverlayLayer},
    Result,
};

/// Polyline through user-chosen world waypoints
pub struct JourneyLayer {
    properties: LayerProperties,
    view: LayerView,
    waypoints: Vec<Point>,
}

impl JourneyLayer {
    impl_layer_constructor!(LayerKind::Journey);

    fn with_properties(properties: LayerProperties) -> Self {
        Self {
            properties,
            view: LayerView::default(),
            waypoints: Vec::new(),
        }
    }

    pub fn set_waypoints(&mut self, waypoints: Vec<Point>) {
        self.waypoints = waypoints;
    }

    pub fn push_waypoint(&mut self, waypoint: Point) {
        self.waypoints.push(waypoint);
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }
}

impl OverlayLayer for JourneyLayer {
    impl_layer_trait!(properties, view);

    fn refresh(&mut self, _level: ZoomLevel) -> Result<()> {
        if !self.properties.visible {
            self.view.publish(Vec::new());
            return Ok(());
        }

        let bounds = self.view.bounds;
        // a segment can cross the screen with both ends outside it
        let items = self
            .waypoints
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| Bounds::spanning(pair[0], pair[1]).intersects(&bounds))
            .map(|(index, pair)| OverlayItem::Segment {
                index,
                from: pair[0],
                to: pair[1],
            })
            .collect();

        self.view.publish(items);
        Ok(())
    }
}
