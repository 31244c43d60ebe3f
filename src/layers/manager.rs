use crate::{
    core::{bounds::Bounds, lod::ZoomLevel, transform::Transform},
    data::dataset::DatasetRequest,
    layers::base::{LayerFrame, OverlayLayer},
    MapError, Result,
};

use crate::prelude::HashMap;

/// Manages overlay layers, keeping them ordered by z-index and dispatching
/// each commit to all of them
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, Box<dyn OverlayLayer>>,
    /// Ordered list of layer IDs for rendering (sorted by z-index)
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    /// Adds a layer to the manager
    pub fn add_layer(&mut self, layer: Box<dyn OverlayLayer>) -> Result<()> {
        let layer_id = layer.id().to_string();
        if self.layers.contains_key(&layer_id) {
            return Err(MapError::Layer(format!("duplicate layer id '{layer_id}'")));
        }
        let z_index = layer.z_index();

        self.layers.insert(layer_id.clone(), layer);

        // Insert in sorted order by z-index
        let insert_pos = self
            .render_order
            .iter()
            .position(|id| {
                self.layers
                    .get(id)
                    .map(|l| l.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.render_order.insert(insert_pos, layer_id);
        Ok(())
    }

    /// Removes a layer from the manager
    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn OverlayLayer>> {
        self.render_order.retain(|id| id != layer_id);
        self.layers.remove(layer_id)
    }

    /// Gets a reference to a layer by ID
    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn OverlayLayer> {
        self.layers.get(layer_id).map(|l| l.as_ref())
    }

    /// Downcasts a layer to its concrete type
    pub fn get_layer_as<T: 'static>(&self, layer_id: &str) -> Option<&T> {
        self.get_layer(layer_id)
            .and_then(|layer| layer.as_any().downcast_ref::<T>())
    }

    /// Applies a function to a specific layer mutably
    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn OverlayLayer) -> R,
    {
        self.layers.get_mut(layer_id).map(|layer| f(layer.as_mut()))
    }

    /// Lists all layer IDs in render order
    pub fn list_layers(&self) -> Vec<String> {
        self.render_order.clone()
    }

    /// Gets all layers in render order
    pub fn layers(&self) -> Vec<&dyn OverlayLayer> {
        self.render_order
            .iter()
            .filter_map(|id| self.layers.get(id).map(|l| l.as_ref()))
            .collect()
    }

    /// Applies a function to each layer mutably in render order
    pub fn for_each_layer_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut dyn OverlayLayer),
    {
        for id in &self.render_order {
            if let Some(layer) = self.layers.get_mut(id) {
                f(layer.as_mut());
            }
        }
    }

    /// Hands one commit to every layer.
    ///
    /// `changed_level` is `Some` only when the level of detail crossed a
    /// threshold. A layer failing to refresh is logged and left with an
    /// empty frame; the other layers still refresh.
    pub fn dispatch(
        &mut self,
        bounds: Bounds,
        transform: Transform,
        level: ZoomLevel,
        changed_level: Option<ZoomLevel>,
    ) {
        self.for_each_layer_mut(|layer| {
            layer.set_bounds(bounds);
            layer.apply_transform(transform);
            if let Some(changed) = changed_level {
                layer.zoom_level_changed(changed);
            }
            if let Err(e) = layer.refresh(level) {
                log::error!("Layer {} failed to refresh: {}", layer.id(), e);
            }
        });
    }

    /// Collects dataset requests from layers that need data at `level`
    pub fn dataset_requests(&mut self, level: ZoomLevel) -> Vec<DatasetRequest> {
        let mut requests = Vec::new();
        self.for_each_layer_mut(|layer| {
            if let Some(request) = layer.dataset_request(level) {
                requests.push(request);
            }
        });
        requests
    }

    /// Frames of all visible layers in render order
    pub fn frames(&self) -> Vec<(String, LayerFrame)> {
        self.layers()
            .into_iter()
            .filter(|layer| layer.is_visible())
            .map(|layer| (layer.id().to_string(), layer.frame().clone()))
            .collect()
    }

    /// Updates the render order based on current z-indices
    pub fn update_render_order(&mut self) {
        let layers = &self.layers;
        self.render_order.sort_by_key(|id| layers.get(id).map(|l| l.z_index()).unwrap_or(0));
    }

    /// Gets the number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Checks if the manager is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::geo::Point,
        layers::{compass::CompassLayer, grid::GridLayer, journey::JourneyLayer},
    };

    #[test]
    fn test_render_order_follows_z_index() {
        let mut manager = LayerManager::new();
        let mut grid = GridLayer::new("grid", "Grid");
        grid.set_z_index(10);
        manager.add_layer(Box::new(grid)).unwrap();
        manager
            .add_layer(Box::new(CompassLayer::new("compass", "Compass")))
            .unwrap();

        assert_eq!(manager.list_layers(), vec!["compass", "grid"]);

        manager.with_layer_mut("compass", |layer| layer.set_z_index(20));
        manager.update_render_order();
        assert_eq!(manager.list_layers(), vec!["grid", "compass"]);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut manager = LayerManager::new();
        manager.add_layer(Box::new(GridLayer::new("grid", "Grid"))).unwrap();
        assert!(matches!(
            manager.add_layer(Box::new(GridLayer::new("grid", "Other"))),
            Err(MapError::Layer(_))
        ));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_dispatch_reaches_every_layer() {
        let mut manager = LayerManager::new();
        let mut journey = JourneyLayer::new("journey", "Journey");
        journey.set_waypoints(vec![Point::new(100.0, 100.0), Point::new(200.0, 200.0)]);
        manager.add_layer(Box::new(journey)).unwrap();
        manager.add_layer(Box::new(GridLayer::new("grid", "Grid"))).unwrap();

        let transform = Transform::new(0.0, 0.0, 0.125);
        manager.dispatch(
            Bounds::from_coords(0.0, 0.0, 8192.0, 6144.0),
            transform,
            ZoomLevel::Initial,
            Some(ZoomLevel::Initial),
        );

        for (_, frame) in manager.frames() {
            assert_eq!(frame.transform, transform);
            assert!(!frame.is_empty());
        }
        assert!(manager.get_layer_as::<JourneyLayer>("journey").is_some());
        assert!(manager.get_layer_as::<GridLayer>("journey").is_none());
    }

    #[test]
    fn test_removed_layer_leaves_render_order() {
        let mut manager = LayerManager::new();
        manager.add_layer(Box::new(GridLayer::new("grid", "Grid"))).unwrap();

        assert!(manager.remove_layer("grid").is_some());
        assert!(manager.is_empty());
        assert!(manager.list_layers().is_empty());
    }
}
