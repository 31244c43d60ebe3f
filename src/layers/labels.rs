//! Region and county name labels.
//!
//! Each label sits at its polygon's centroid with the polygon's angle. A
//! label layer is shown for a contiguous range of levels: regions at the
//! overview level, counties once ports get labels.

use crate::{
    core::lod::ZoomLevel,
    data::dataset::{DatasetRequest, LazyDataset},
    impl_layer_trait,
    layers::{
        base::{LayerKind, LayerProperties, LayerView, OverlayItem, OverlayLayer},
        entity::PolygonLabel,
    },
    Result,
};
use std::ops::RangeInclusive;

pub struct LabelLayer {
    properties: LayerProperties,
    view: LayerView,
    dataset: LazyDataset<PolygonLabel>,
    levels: RangeInclusive<ZoomLevel>,
    shown: bool,
}

impl LabelLayer {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        dataset_name: impl Into<String>,
        levels: RangeInclusive<ZoomLevel>,
    ) -> Self {
        Self {
            properties: LayerProperties::new(id.into(), name.into(), LayerKind::Labels),
            view: LayerView::default(),
            dataset: LazyDataset::new(dataset_name),
            levels,
            shown: false,
        }
    }

    /// Region names, shown at the overview level only
    pub fn regions(dataset_name: impl Into<String>) -> Self {
        Self::new("regions", "Regions", dataset_name, ZoomLevel::Initial..=ZoomLevel::Initial)
    }

    /// County names, shown from the port label level up
    pub fn counties(dataset_name: impl Into<String>) -> Self {
        Self::new("counties", "Counties", dataset_name, ZoomLevel::PortLabel..=ZoomLevel::PbZone)
    }

    /// Supplies the labels directly instead of fetching them
    pub fn with_labels(mut self, labels: Vec<PolygonLabel>) -> Self {
        self.dataset = LazyDataset::ready(self.dataset.name().to_string(), labels);
        self
    }

    pub fn shown_at(&self, level: ZoomLevel) -> bool {
        self.levels.contains(&level)
    }

    pub fn labels(&self) -> &[PolygonLabel] {
        self.dataset.items()
    }
}

impl OverlayLayer for LabelLayer {
    impl_layer_trait!(properties, view);

    fn zoom_level_changed(&mut self, level: ZoomLevel) {
        self.shown = self.shown_at(level);
    }

    fn refresh(&mut self, _level: ZoomLevel) -> Result<()> {
        if !self.properties.visible || !self.shown {
            self.view.publish(Vec::new());
            return Ok(());
        }

        let items = self
            .view
            .bounds
            .filter_visible(self.dataset.items())
            .into_iter()
            .map(|label| OverlayItem::Label {
                text: label.name.clone(),
                position: label.centroid,
                angle: label.angle,
            })
            .collect();
        self.view.publish(items);
        Ok(())
    }

    fn dataset_request(&mut self, level: ZoomLevel) -> Option<DatasetRequest> {
        if !self.properties.visible || !self.shown_at(level) {
            return None;
        }
        let name = self.dataset.begin_load()?.to_string();
        Some(DatasetRequest {
            layer_id: self.properties.id.clone(),
            name,
        })
    }

    fn receive_dataset(&mut self, payload: Result<Vec<u8>>) -> bool {
        self.dataset.resolve(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{bounds::Bounds, geo::Point};

    fn labels() -> Vec<PolygonLabel> {
        vec![
            PolygonLabel::new("Bahamas", Point::new(3000.0, 1500.0), -20.0),
            PolygonLabel::new("Gulf Coast", Point::new(7000.0, 7000.0), 0.0),
        ]
    }

    #[test]
    fn test_regions_only_at_overview_level() {
        let mut regions = LabelLayer::regions("regions.json").with_labels(labels());
        regions.set_bounds(Bounds::from_coords(0.0, 0.0, 8192.0, 6144.0));

        regions.zoom_level_changed(ZoomLevel::Initial);
        regions.refresh(ZoomLevel::Initial).unwrap();
        assert_eq!(
            regions.frame().items,
            vec![OverlayItem::Label {
                text: "Bahamas".to_string(),
                position: Point::new(3000.0, 1500.0),
                angle: -20.0,
            }]
        );

        regions.zoom_level_changed(ZoomLevel::PortLabel);
        regions.refresh(ZoomLevel::PortLabel).unwrap();
        assert!(regions.frame().is_empty());
    }

    #[test]
    fn test_counties_request_dataset_once_when_shown() {
        let mut counties = LabelLayer::counties("counties.json");

        assert!(counties.dataset_request(ZoomLevel::Initial).is_none());
        let request = counties.dataset_request(ZoomLevel::PortLabel).unwrap();
        assert_eq!(request.layer_id, "counties");
        assert_eq!(request.name, "counties.json");
        assert!(counties.dataset_request(ZoomLevel::PbZone).is_none());

        let payload = br#"[{"name": "Havana", "centroid": [4000, 4000], "angle": 12}]"#;
        assert!(counties.receive_dataset(Ok(payload.to_vec())));
        assert_eq!(counties.labels().len(), 1);
    }
}
