use crate::{
    core::lod::ZoomLevel,
    data::dataset::{DatasetRequest, LazyDataset},
    impl_layer_trait,
    layers::{
        base::{LayerKind, LayerProperties, LayerView, OverlayItem, OverlayLayer},
        entity::{EntityId, PointEntity},
    },
    Result,
};

/// Port markers, with name labels once zoomed in far enough
pub struct PortLayer {
    properties: LayerProperties,
    view: LayerView,
    dataset: LazyDataset<PointEntity>,
    selected: Option<EntityId>,
    labels_shown: bool,
}

impl PortLayer {
    pub fn new(id: impl Into<String>, name: impl Into<String>, dataset_name: impl Into<String>) -> Self {
        Self {
            properties: LayerProperties::new(id.into(), name.into(), LayerKind::Ports),
            view: LayerView::default(),
            dataset: LazyDataset::new(dataset_name),
            selected: None,
            labels_shown: false,
        }
    }

    /// Supplies the ports directly instead of fetching them
    pub fn with_ports(mut self, ports: Vec<PointEntity>) -> Self {
        self.dataset = LazyDataset::ready(self.dataset.name().to_string(), ports);
        self
    }

    pub fn ports(&self) -> &[PointEntity] {
        self.dataset.items()
    }

    pub fn find(&self, id: &EntityId) -> Option<&PointEntity> {
        self.ports().iter().find(|port| &port.id == id)
    }

    pub fn selected(&self) -> Option<&EntityId> {
        self.selected.as_ref()
    }

    pub fn set_selected(&mut self, id: Option<EntityId>) {
        self.selected = id;
    }

    pub fn labels_shown(&self) -> bool {
        self.labels_shown
    }
}

impl OverlayLayer for PortLayer {
    impl_layer_trait!(properties, view);

    fn zoom_level_changed(&mut self, level: ZoomLevel) {
        self.labels_shown = level >= ZoomLevel::PortLabel;
    }

    fn refresh(&mut self, _level: ZoomLevel) -> Result<()> {
        if !self.properties.visible {
            self.view.publish(Vec::new());
            return Ok(());
        }

        let visible = self.view.bounds.filter_visible(self.dataset.items());
        let mut items = Vec::with_capacity(visible.len() * 2);
        for port in &visible {
            items.push(OverlayItem::Marker {
                id: port.id.clone(),
                position: port.coordinates,
                selected: self.selected.as_ref() == Some(&port.id),
            });
        }
        if self.labels_shown {
            items.extend(visible.iter().map(|port| OverlayItem::Label {
                text: port.label(),
                position: port.coordinates,
                angle: 0.0,
            }));
        }

        self.view.publish(items);
        Ok(())
    }

    fn dataset_request(&mut self, _level: ZoomLevel) -> Option<DatasetRequest> {
        if !self.properties.visible {
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
