//! Port battle and raid zones.
//!
//! Zones are drawn at the `pbZone` level only. The dataset is fetched the
//! first time the layer is active at that level; until it arrives, or if it
//! cannot be imported, the layer shows nothing.

use crate::{
    core::{geo::Point, lod::ZoomLevel},
    data::dataset::{DatasetRequest, LazyDataset},
    impl_layer_trait,
    layers::{
        base::{CircleRole, LayerKind, LayerProperties, LayerView, OverlayItem, OverlayLayer},
        entity::EntityId,
    },
    traits::Positioned,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Zone geometry around one port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbZone {
    pub id: EntityId,
    /// Port position, used for bounds filtering
    pub coordinates: Point,
    #[serde(default)]
    pub pb_circles: Vec<Point>,
    #[serde(default)]
    pub join_circles: Vec<Point>,
    #[serde(default)]
    pub raid_circles: Vec<Point>,
    #[serde(default)]
    pub raid_points: Vec<Point>,
}

impl Positioned for PbZone {
    fn position(&self) -> Point {
        self.coordinates
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PbZoneMode {
    #[default]
    #[serde(rename = "pb-all")]
    PbAll,
    #[serde(rename = "pb-single")]
    PbSingle,
    #[serde(rename = "raid-all")]
    RaidAll,
    #[serde(rename = "raid-single")]
    RaidSingle,
    #[serde(rename = "off")]
    Off,
}

impl PbZoneMode {
    pub fn is_raid(&self) -> bool {
        matches!(self, PbZoneMode::RaidAll | PbZoneMode::RaidSingle)
    }

    pub fn is_single(&self) -> bool {
        matches!(self, PbZoneMode::PbSingle | PbZoneMode::RaidSingle)
    }
}

impl fmt::Display for PbZoneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PbZoneMode::PbAll => "pb-all",
            PbZoneMode::PbSingle => "pb-single",
            PbZoneMode::RaidAll => "raid-all",
            PbZoneMode::RaidSingle => "raid-single",
            PbZoneMode::Off => "off",
        };
        write!(f, "{name}")
    }
}

impl FromStr for PbZoneMode {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pb-all" => Ok(PbZoneMode::PbAll),
            "pb-single" => Ok(PbZoneMode::PbSingle),
            "raid-all" => Ok(PbZoneMode::RaidAll),
            "raid-single" => Ok(PbZoneMode::RaidSingle),
            "off" => Ok(PbZoneMode::Off),
            other => Err(MapError::Layer(format!("unknown port battle zone mode '{other}'"))),
        }
    }
}

pub struct PbZoneLayer {
    properties: LayerProperties,
    view: LayerView,
    dataset: LazyDataset<PbZone>,
    mode: PbZoneMode,
    selected: Option<EntityId>,
}

impl PbZoneLayer {
    pub fn new(id: impl Into<String>, name: impl Into<String>, dataset_name: impl Into<String>) -> Self {
        Self {
            properties: LayerProperties::new(id.into(), name.into(), LayerKind::PbZones),
            view: LayerView::default(),
            dataset: LazyDataset::new(dataset_name),
            mode: PbZoneMode::default(),
            selected: None,
        }
    }

    /// Supplies the zones directly instead of fetching them
    pub fn with_zones(mut self, zones: Vec<PbZone>) -> Self {
        self.dataset = LazyDataset::ready(self.dataset.name().to_string(), zones);
        self
    }

    pub fn mode(&self) -> PbZoneMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PbZoneMode) {
        self.mode = mode;
    }

    pub fn set_selected(&mut self, id: Option<EntityId>) {
        self.selected = id;
    }

    pub fn zones(&self) -> &[PbZone] {
        self.dataset.items()
    }

    pub fn is_loading(&self) -> bool {
        self.dataset.is_loading()
    }

    fn is_active(&self, level: ZoomLevel) -> bool {
        self.properties.visible && self.mode != PbZoneMode::Off && level == ZoomLevel::PbZone
    }

    fn includes(&self, zone: &PbZone) -> bool {
        match self.mode {
            PbZoneMode::Off => false,
            PbZoneMode::PbAll | PbZoneMode::RaidAll => true,
            PbZoneMode::PbSingle | PbZoneMode::RaidSingle => {
                self.selected.as_ref() == Some(&zone.id)
            }
        }
    }
}

fn circles(zone: &PbZone, points: &[Point], role: CircleRole) -> Vec<OverlayItem> {
    points
        .iter()
        .map(|center| OverlayItem::Circle {
            zone: zone.id.clone(),
            center: *center,
            role,
        })
        .collect()
}

impl OverlayLayer for PbZoneLayer {
    impl_layer_trait!(properties, view);

    fn refresh(&mut self, level: ZoomLevel) -> Result<()> {
        if !self.is_active(level) {
            self.view.publish(Vec::new());
            return Ok(());
        }

        let raid = self.mode.is_raid();
        let mut items = Vec::new();
        for zone in self.view.bounds.filter_visible(self.dataset.items()) {
            if !self.includes(zone) {
                continue;
            }
            if raid {
                items.extend(circles(zone, &zone.raid_circles, CircleRole::Raid));
                items.extend(circles(zone, &zone.raid_points, CircleRole::RaidPoint));
            } else {
                items.extend(circles(zone, &zone.pb_circles, CircleRole::PortBattle));
                items.extend(circles(zone, &zone.join_circles, CircleRole::Join));
            }
        }

        self.view.publish(items);
        Ok(())
    }

    fn dataset_request(&mut self, level: ZoomLevel) -> Option<DatasetRequest> {
        if !self.is_active(level) {
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
    use crate::core::bounds::Bounds;

    fn zone(id: i64, x: f64, y: f64) -> PbZone {
        PbZone {
            id: EntityId::Number(id),
            coordinates: Point::new(x, y),
            pb_circles: vec![Point::new(x + 10.0, y), Point::new(x - 10.0, y)],
            join_circles: vec![Point::new(x, y + 30.0)],
            raid_circles: vec![Point::new(x, y - 20.0)],
            raid_points: vec![Point::new(x + 5.0, y - 25.0)],
        }
    }

    fn layer() -> PbZoneLayer {
        let mut layer = PbZoneLayer::new("pb-zones", "Port battle zones", "pb-zones.json")
            .with_zones(vec![zone(1, 1000.0, 1000.0), zone(2, 1200.0, 1100.0), zone(3, 7000.0, 7000.0)]);
        layer.set_bounds(Bounds::from_coords(900.0, 900.0, 1400.0, 1300.0));
        layer
    }

    fn roles(layer: &PbZoneLayer) -> Vec<(EntityId, CircleRole)> {
        layer
            .frame()
            .items
            .iter()
            .filter_map(|item| match item {
                OverlayItem::Circle { zone, role, .. } => Some((zone.clone(), *role)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_pb_all_shows_battle_circles_of_visible_zones() {
        let mut layer = layer();
        layer.refresh(ZoomLevel::PbZone).unwrap();

        let roles = roles(&layer);
        assert_eq!(roles.len(), 6);
        assert!(roles
            .iter()
            .all(|(_, role)| matches!(role, CircleRole::PortBattle | CircleRole::Join)));
        assert!(roles.iter().all(|(id, _)| *id != EntityId::Number(3)));
    }

    #[test]
    fn test_single_modes_follow_selection() {
        let mut layer = layer();
        layer.set_mode(PbZoneMode::RaidSingle);
        layer.refresh(ZoomLevel::PbZone).unwrap();
        assert!(layer.frame().is_empty());

        layer.set_selected(Some(EntityId::Number(2)));
        layer.refresh(ZoomLevel::PbZone).unwrap();
        assert_eq!(
            roles(&layer),
            vec![
                (EntityId::Number(2), CircleRole::Raid),
                (EntityId::Number(2), CircleRole::RaidPoint)
            ]
        );

        layer.set_mode(PbZoneMode::PbSingle);
        layer.refresh(ZoomLevel::PbZone).unwrap();
        assert_eq!(roles(&layer).len(), 3);
    }

    #[test]
    fn test_raid_and_battle_circles_never_mix() {
        for mode in [PbZoneMode::PbAll, PbZoneMode::RaidAll] {
            let mut layer = layer();
            layer.set_mode(mode);
            layer.refresh(ZoomLevel::PbZone).unwrap();

            let roles = roles(&layer);
            let raid = roles
                .iter()
                .any(|(_, r)| matches!(r, CircleRole::Raid | CircleRole::RaidPoint));
            let battle = roles
                .iter()
                .any(|(_, r)| matches!(r, CircleRole::PortBattle | CircleRole::Join));
            assert!(raid != battle, "mode {mode} mixed circle kinds");
        }
    }

    #[test]
    fn test_only_drawn_at_pb_zone_level() {
        let mut layer = layer();
        layer.refresh(ZoomLevel::PortLabel).unwrap();
        assert!(layer.frame().is_empty());

        layer.set_mode(PbZoneMode::Off);
        layer.refresh(ZoomLevel::PbZone).unwrap();
        assert!(layer.frame().is_empty());
    }

    #[test]
    fn test_dataset_requested_once_at_pb_zone_level() {
        let mut layer = PbZoneLayer::new("pb-zones", "Port battle zones", "pb-zones.json");

        assert!(layer.dataset_request(ZoomLevel::PortLabel).is_none());
        assert!(layer.dataset_request(ZoomLevel::PbZone).is_some());
        assert!(layer.is_loading());
        assert!(layer.dataset_request(ZoomLevel::PbZone).is_none());

        let payload = br#"[{"id": "7", "coordinates": [10, 10], "pbCircles": [[12, 10]]}]"#;
        assert!(layer.receive_dataset(Ok(payload.to_vec())));
        assert_eq!(layer.zones()[0].pb_circles, vec![Point::new(12.0, 10.0)]);
        assert!(layer.zones()[0].raid_points.is_empty());
    }

    #[test]
    fn test_mode_string_round_trip() {
        for mode in [
            PbZoneMode::PbAll,
            PbZoneMode::PbSingle,
            PbZoneMode::RaidAll,
            PbZoneMode::RaidSingle,
            PbZoneMode::Off,
        ] {
            assert_eq!(mode.to_string().parse::<PbZoneMode>().unwrap(), mode);
        }
        assert!("pb-some".parse::<PbZoneMode>().is_err());
    }
}
