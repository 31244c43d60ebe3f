use crate::{
    core::{geo::Point, lod::ZoomLevel},
    impl_layer_constructor, impl_layer_trait,
    layers::base::{LayerKind, LayerProperties, LayerView, OverlayItem, OverlayLayer},
    Result,
};

/// Placed compass plus F11 coordinate markers
pub struct CompassLayer {
    properties: LayerProperties,
    view: LayerView,
    compass: Option<Point>,
    markers: Vec<Point>,
}

impl CompassLayer {
    impl_layer_constructor!(LayerKind::Compass);

    fn with_properties(properties: LayerProperties) -> Self {
        Self {
            properties,
            view: LayerView::default(),
            compass: None,
            markers: Vec::new(),
        }
    }

    pub fn set_compass(&mut self, position: Option<Point>) {
        self.compass = position;
    }

    pub fn compass(&self) -> Option<Point> {
        self.compass
    }

    pub fn add_marker(&mut self, position: Point) {
        self.markers.push(position);
    }

    pub fn clear_markers(&mut self) {
        self.markers.clear();
    }

    pub fn markers(&self) -> &[Point] {
        &self.markers
    }
}

impl OverlayLayer for CompassLayer {
    impl_layer_trait!(properties, view);

    fn refresh(&mut self, _level: ZoomLevel) -> Result<()> {
        if !self.properties.visible {
            self.view.publish(Vec::new());
            return Ok(());
        }

        let bounds = self.view.bounds;
        let mut items: Vec<OverlayItem> = self
            .compass
            .filter(|position| bounds.contains(position))
            .map(|position| OverlayItem::Compass { position })
            .into_iter()
            .collect();
        items.extend(
            bounds
                .filter_visible(&self.markers)
                .into_iter()
                .map(|position| OverlayItem::CoordinateMarker {
                    position: *position,
                }),
        );

        self.view.publish(items);
        Ok(())
    }
}
