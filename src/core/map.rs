//! The map: owner of all per-map state and driver of the commit pipeline.
//!
//! Every change of the transform goes through [`NaMap::commit`], which in a
//! single call derives bounds, selects and joins tiles, updates the level of
//! detail and refreshes every overlay layer, then notifies subscribers.
//! Layers therefore never see bounds or tiles from an older transform.

use crate::{
    constants::TILE_SIZE,
    core::{
        bounds::Bounds,
        config::MapConfig,
        geo::{Point, TileCoord},
        lod::{LevelOfDetailPolicy, ZoomLevel},
        transform::Transform,
        viewport::Viewport,
    },
    data::{dataset::DatasetRequest, source::DatasetSource},
    input::{
        events::{InputEvent, MapEvent},
        handler::{Action, EventManager, InputHandler},
        zoom::ZoomController,
    },
    layers::{
        base::{LayerFrame, OverlayLayer},
        compass::CompassLayer,
        entity::EntityId,
        grid::GridLayer,
        journey::JourneyLayer,
        labels::LabelLayer,
        manager::LayerManager,
        pb_zone::{PbZoneLayer, PbZoneMode},
        ports::PortLayer,
    },
    tiles::{
        join::{TileDiff, TileJoin},
        loader::{TileLoader, TileRequest},
        selector::{TileSelection, TileSelector},
        source::TileSource,
    },
    MapError, Result,
};

/// Snapshot of the last committed frame, everything a rendering backend
/// needs to draw it
#[derive(Debug, Clone)]
pub struct FrameState {
    pub transform: Transform,
    pub bounds: Bounds,
    pub tiles: TileSelection,
    pub tile_diff: TileDiff,
    /// Images to start loading for tiles that entered
    pub tile_requests: Vec<TileRequest>,
    pub zoom_level: ZoomLevel,
    /// Whether this frame crossed a level-of-detail threshold
    pub level_changed: bool,
}

impl FrameState {
    fn empty() -> Self {
        Self {
            transform: Transform::identity(),
            bounds: Bounds::default(),
            tiles: TileSelection::empty(Transform::identity(), TILE_SIZE as f64),
            tile_diff: TileDiff::default(),
            tile_requests: Vec::new(),
            zoom_level: ZoomLevel::Initial,
            level_changed: false,
        }
    }

    /// `translate(x,y) scale(k)` for the tile group
    pub fn tile_transform(&self) -> String {
        self.tiles.transform.to_string()
    }
}

pub struct NaMap {
    config: MapConfig,
    zoom: ZoomController,
    input_handler: InputHandler,
    lod: LevelOfDetailPolicy,
    layer_manager: LayerManager,
    tile_selector: TileSelector,
    tile_join: TileJoin,
    tile_loader: TileLoader,
    event_manager: EventManager,
    frame: FrameState,
}

impl NaMap {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_config(viewport, MapConfig::default())
    }

    /// Builds the map and commits the initial `{0, 0, min_scale}` frame
    pub fn with_config(viewport: Viewport, config: MapConfig) -> Self {
        let mut map = Self {
            zoom: ZoomController::new(viewport, config.chrome.clone()),
            input_handler: InputHandler::from_config(&config.interaction),
            lod: LevelOfDetailPolicy::new(),
            layer_manager: LayerManager::new(),
            tile_selector: TileSelector::default(),
            tile_join: TileJoin::new(),
            tile_loader: TileLoader::from_config(&config.tiles),
            event_manager: EventManager::new(),
            frame: FrameState::empty(),
            config,
        };
        map.commit();
        map
    }

    /// Replaces the tile URL scheme. Tiles already on screen keep their state.
    pub fn with_tile_source(mut self, source: Box<dyn TileSource>) -> Self {
        self.tile_loader = TileLoader::new(source, self.config.tiles.cache_size);
        self
    }

    /// Adds the standard overlay stack, datasets named after the config
    pub fn add_default_layers(&mut self) -> Result<()> {
        let datasets = self.config.datasets.clone();

        let mut regions = LabelLayer::regions(datasets.regions);
        regions.set_z_index(10);
        let mut counties = LabelLayer::counties(datasets.counties);
        counties.set_z_index(20);
        let mut pb_zones = PbZoneLayer::new("pb-zones", "Port battle zones", datasets.pb_zones);
        pb_zones.set_z_index(30);
        let mut ports = PortLayer::new("ports", "Ports", datasets.ports);
        ports.set_z_index(40);
        let mut journey = JourneyLayer::new("journey", "Journey");
        journey.set_z_index(50);
        let mut compass = CompassLayer::new("compass", "Compass");
        compass.set_z_index(60);
        let mut grid = GridLayer::from_config("grid", "Grid", &self.config.grid);
        grid.set_z_index(70);

        let layers: Vec<Box<dyn OverlayLayer>> = vec![
            Box::new(regions),
            Box::new(counties),
            Box::new(pb_zones),
            Box::new(ports),
            Box::new(journey),
            Box::new(compass),
            Box::new(grid),
        ];
        for layer in layers {
            self.add_layer(layer)?;
        }
        Ok(())
    }

    fn commit(&mut self) -> &FrameState {
        let transform = self.zoom.transform();
        let viewport = self.zoom.viewport();

        let bounds = Bounds::visible(&transform, &viewport);

        let tiles = self.tile_selector.select(&transform, &viewport);
        let tile_diff = self.tile_join.update(&tiles);
        let tile_requests = self.tile_loader.apply(&tile_diff);

        let changed_level = self.lod.update(transform.k);
        let zoom_level = self.lod.current();

        self.layer_manager
            .dispatch(bounds, transform, zoom_level, changed_level);

        log::debug!(
            "committed {} ({} tiles at z{}, {} entered, {} exited)",
            transform,
            tiles.len(),
            tiles.zoom,
            tile_diff.enter.len(),
            tile_diff.exit.len()
        );

        self.event_manager
            .emit(MapEvent::TransformCommitted { transform, bounds });
        if let Some(level) = changed_level {
            self.event_manager.emit(MapEvent::ZoomLevelChanged { level });
        }
        if !tile_diff.is_unchanged() {
            self.event_manager.emit(MapEvent::TilesChanged {
                entered: tile_diff.enter.len(),
                exited: tile_diff.exit.len(),
            });
        }

        self.frame = FrameState {
            transform,
            bounds,
            tiles,
            tile_diff,
            tile_requests,
            zoom_level,
            level_changed: changed_level.is_some(),
        };
        self.event_manager.process_events();
        &self.frame
    }

    /// Runs one input event through the pipeline.
    ///
    /// Returns whether a new transform was committed.
    pub fn handle_input(&mut self, input: InputEvent) -> bool {
        let actions = self.input_handler.handle_event(input);
        let mut changed = false;
        for action in &actions {
            changed |= self.zoom.apply(action);
        }
        if changed {
            self.commit();
        }
        changed
    }

    /// Runs a single action, committing if the transform changed
    pub fn apply(&mut self, action: Action) -> bool {
        let changed = self.zoom.apply(&action);
        if changed {
            self.commit();
        }
        changed
    }

    /// Centers world `point` at `scale`
    pub fn zoom_to_point(&mut self, point: Point, scale: f64) -> bool {
        self.apply(Action::ZoomToPoint { point, scale })
    }

    /// Centers world `point`, at the configured go-to scale unless given
    pub fn go_to_coordinate(&mut self, point: Point, scale: Option<f64>) -> bool {
        let scale = scale.unwrap_or(self.config.interaction.goto_scale);
        self.zoom_to_point(point, scale)
    }

    /// Selects a port and centers it at the configured go-to scale
    pub fn go_to_port(&mut self, id: &EntityId) -> Result<bool> {
        let position = self
            .layer_manager
            .layers()
            .into_iter()
            .filter_map(|layer| layer.as_any().downcast_ref::<PortLayer>())
            .find_map(|ports| ports.find(id).map(|port| port.coordinates))
            .ok_or_else(|| MapError::Layer(format!("unknown port {id}")))?;

        self.set_selected_port(Some(id.clone()));
        Ok(self.go_to_coordinate(position, None))
    }

    /// Adopts a new screen size
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        self.apply(Action::Resize { viewport })
    }

    /// Commits an externally supplied transform, clamped like any gesture
    pub fn set_transform(&mut self, transform: Transform) -> bool {
        let changed = self.zoom.set_transform(transform);
        if changed {
            self.commit();
        }
        changed
    }

    /// Selects a port for the ports and port battle zone layers
    pub fn set_selected_port(&mut self, id: Option<EntityId>) {
        self.layer_manager.for_each_layer_mut(|layer| {
            if let Some(ports) = layer.as_any_mut().downcast_mut::<PortLayer>() {
                ports.set_selected(id.clone());
            }
            if let Some(zones) = layer.as_any_mut().downcast_mut::<PbZoneLayer>() {
                zones.set_selected(id.clone());
            }
        });
        self.refresh_layers();
    }

    pub fn set_pb_zone_mode(&mut self, mode: PbZoneMode) {
        self.layer_manager.for_each_layer_mut(|layer| {
            if let Some(zones) = layer.as_any_mut().downcast_mut::<PbZoneLayer>() {
                zones.set_mode(mode);
            }
        });
        self.refresh_layers();
    }

    /// Re-runs every layer's refresh against the current frame, for changes
    /// that do not move the transform
    pub fn refresh_layers(&mut self) {
        self.layer_manager.dispatch(
            self.frame.bounds,
            self.frame.transform,
            self.frame.zoom_level,
            None,
        );
    }

    /// Adds a layer and brings it up to date with the current frame
    pub fn add_layer(&mut self, layer: Box<dyn OverlayLayer>) -> Result<()> {
        let layer_id = layer.id().to_string();
        self.layer_manager.add_layer(layer)?;

        let frame = &self.frame;
        let result = self.layer_manager.with_layer_mut(&layer_id, |layer| {
            layer.set_bounds(frame.bounds);
            layer.apply_transform(frame.transform);
            layer.zoom_level_changed(frame.zoom_level);
            layer.refresh(frame.zoom_level)
        });
        if let Some(Err(e)) = result {
            log::error!("Layer {} failed to refresh: {}", layer_id, e);
        }

        self.event_manager.emit(MapEvent::LayerAdd { layer_id });
        self.event_manager.process_events();
        Ok(())
    }

    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn OverlayLayer>> {
        let removed = self.layer_manager.remove_layer(layer_id);
        if removed.is_some() {
            self.event_manager.emit(MapEvent::LayerRemove {
                layer_id: layer_id.to_string(),
            });
            self.event_manager.process_events();
        }
        removed
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn OverlayLayer> {
        self.layer_manager.get_layer(layer_id)
    }

    pub fn get_layer_as<T: 'static>(&self, layer_id: &str) -> Option<&T> {
        self.layer_manager.get_layer_as(layer_id)
    }

    pub fn with_layer_mut<F, R>(&mut self, layer_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut dyn OverlayLayer) -> R,
    {
        self.layer_manager.with_layer_mut(layer_id, f)
    }

    pub fn list_layers(&self) -> Vec<String> {
        self.layer_manager.list_layers()
    }

    /// Frames of all visible layers in render order
    pub fn layer_frames(&self) -> Vec<(String, LayerFrame)> {
        self.layer_manager.frames()
    }

    /// Listen for one kind of event, see [`MapEvent::event_type`]
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.event_manager.on(event_type, callback);
    }

    /// Listen for every event
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.event_manager.subscribe(callback);
    }

    /// Records the outcome of a tile image load
    pub fn complete_tile(&mut self, coord: TileCoord, result: Result<Vec<u8>>) {
        self.tile_loader.complete(coord, result);
    }

    pub fn tile_loader(&self) -> &TileLoader {
        &self.tile_loader
    }

    /// Datasets layers need at the current level. Each is handed out once.
    pub fn pending_dataset_requests(&mut self) -> Vec<DatasetRequest> {
        self.layer_manager.dataset_requests(self.frame.zoom_level)
    }

    /// Delivers a dataset to the layer that asked for it and refreshes that
    /// layer against the current frame.
    ///
    /// Returns `false` for unknown layers and duplicate completions.
    pub fn receive_dataset(&mut self, layer_id: &str, payload: Result<Vec<u8>>) -> bool {
        let failure = payload.as_ref().err().map(|e| e.to_string());
        let frame = &self.frame;
        let accepted = self
            .layer_manager
            .with_layer_mut(layer_id, |layer| {
                if !layer.receive_dataset(payload) {
                    return false;
                }
                layer.set_bounds(frame.bounds);
                layer.apply_transform(frame.transform);
                if let Err(e) = layer.refresh(frame.zoom_level) {
                    log::error!("Layer {} failed to refresh: {}", layer.id(), e);
                }
                true
            })
            .unwrap_or(false);

        if accepted {
            let layer_id = layer_id.to_string();
            let event = match failure {
                Some(reason) => MapEvent::DatasetFailed { layer_id, reason },
                None => MapEvent::DatasetLoaded { layer_id },
            };
            self.event_manager.emit(event);
            self.event_manager.process_events();
        }
        accepted
    }

    /// Fetches every pending dataset concurrently and hands the results to
    /// their layers. Returns the number of datasets fetched.
    pub async fn load_pending_datasets(&mut self, source: &dyn DatasetSource) -> usize {
        let requests = self.pending_dataset_requests();
        if requests.is_empty() {
            return 0;
        }
        log::info!("fetching {} datasets", requests.len());

        let results =
            futures::future::join_all(requests.iter().map(|request| source.fetch(&request.name)))
                .await;

        for (request, result) in requests.iter().zip(results) {
            self.receive_dataset(&request.layer_id, result);
        }
        requests.len()
    }

    /// Last committed frame
    pub fn frame(&self) -> &FrameState {
        &self.frame
    }

    pub fn transform(&self) -> Transform {
        self.frame.transform
    }

    pub fn bounds(&self) -> Bounds {
        self.frame.bounds
    }

    pub fn zoom_level(&self) -> ZoomLevel {
        self.frame.zoom_level
    }

    pub fn viewport(&self) -> Viewport {
        self.zoom.viewport()
    }

    pub fn zoom_controller(&self) -> &ZoomController {
        &self.zoom
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }
}
