use na_map::{
    data::source::MemoryDatasetSource,
    input::events::{InputEvent, MapEvent},
    layers::{
        base::{CircleRole, OverlayItem},
        entity::EntityId,
    },
    LabelLayer, NaMap, PbZoneLayer, Point, PortLayer, Viewport, ZoomLevel,
};
use std::sync::{Arc, Mutex};

#[cfg(feature = "tokio-runtime")]
use na_map::{
    data::source::{DatasetSource, FileDatasetSource},
    MapError,
};

const PORTS: &str = r#"[
    {"id": 1, "coordinates": [4396, 2494], "name": "Havana"},
    {"id": 2, "coordinates": [100, 100]}
]"#;

const PB_ZONES: &str = r#"[
    {"id": 1, "coordinates": [4396, 2494], "pbCircles": [[4380, 2480]], "joinCircles": [[4396, 2460]]}
]"#;

const REGIONS: &str = r#"[{"name": "Cuba", "centroid": [4200, 2600], "angle": -15}]"#;

const COUNTIES: &str = r#"[{"name": "La Habana", "centroid": [4390, 2520]}]"#;

/// Lazy dataset loading against in-memory and on-disk sources
#[cfg(test)]
mod dataset_loading {
    use super::*;

    fn source() -> MemoryDatasetSource {
        MemoryDatasetSource::new()
            .with_dataset("ports.json", PORTS)
            .with_dataset("pb-zones.json", PB_ZONES)
            .with_dataset("regions.json", REGIONS)
            .with_dataset("counties.json", COUNTIES)
    }

    fn map() -> NaMap {
        let mut map = NaMap::new(Viewport::new(1024.0, 768.0));
        map.add_default_layers().unwrap();
        map
    }

    fn zoom_to_havana(map: &mut NaMap) {
        map.handle_input(InputEvent::DoubleClick {
            position: Point::new(549.5, 311.75),
        });
    }

    #[tokio::test]
    async fn test_datasets_fetched_once_per_level_need() {
        let source = source();
        let mut map = map();

        // ports always, regions at the overview level
        assert_eq!(map.load_pending_datasets(&source).await, 2);
        assert_eq!(map.load_pending_datasets(&source).await, 0);
        assert_eq!(
            map.get_layer_as::<PortLayer>("ports").unwrap().ports().len(),
            2
        );
        assert_eq!(map.get_layer("regions").unwrap().frame().len(), 1);

        // counties and port battle zones once zoomed in
        zoom_to_havana(&mut map);
        assert_eq!(map.load_pending_datasets(&source).await, 2);
        assert_eq!(source.fetch_count(), 4);

        // crossing the thresholds again never refetches
        for delta_y in [1.0, 1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0] {
            map.handle_input(InputEvent::Scroll {
                delta_y,
                position: Point::new(512.0, 384.0),
            });
            assert_eq!(map.load_pending_datasets(&source).await, 0);
        }
        assert_eq!(source.fetch_count(), 4);
    }

    #[tokio::test]
    async fn test_loaded_zones_drawn_at_pb_zone_level() {
        let source = source();
        let mut map = map();
        zoom_to_havana(&mut map);
        map.load_pending_datasets(&source).await;

        let zones = map.get_layer("pb-zones").unwrap().frame();
        assert_eq!(zones.transform, map.transform());
        assert_eq!(
            zones.items,
            vec![
                OverlayItem::Circle {
                    zone: EntityId::Number(1),
                    center: Point::new(4380.0, 2480.0),
                    role: CircleRole::PortBattle,
                },
                OverlayItem::Circle {
                    zone: EntityId::Number(1),
                    center: Point::new(4396.0, 2460.0),
                    role: CircleRole::Join,
                },
            ]
        );
        let counties = map.get_layer_as::<LabelLayer>("counties").unwrap();
        assert_eq!(counties.labels()[0].angle, 0.0);
    }

    #[tokio::test]
    async fn test_missing_dataset_reported_and_not_retried() {
        let source = MemoryDatasetSource::new().with_dataset("ports.json", PORTS);
        let mut map = map();
        let failures = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&failures);
        map.on("datasetfailed", move |event| {
            if let MapEvent::DatasetFailed { layer_id, .. } = event {
                sink.lock().unwrap().push(layer_id.clone());
            }
        });

        map.load_pending_datasets(&source).await;
        zoom_to_havana(&mut map);
        map.load_pending_datasets(&source).await;

        let mut failed = failures.lock().unwrap().clone();
        failed.sort();
        assert_eq!(failed, vec!["counties", "pb-zones", "regions"]);
        assert!(map.get_layer("pb-zones").unwrap().frame().is_empty());
        assert!(!map.get_layer_as::<PbZoneLayer>("pb-zones").unwrap().is_loading());
        assert!(map.pending_dataset_requests().is_empty());
        // the other layers still draw
        assert!(!map.get_layer("ports").unwrap().frame().is_empty());
    }

    #[test]
    fn test_late_dataset_uses_latest_bounds() {
        let mut map = map();
        let requests = map.pending_dataset_requests();
        let ports = requests
            .iter()
            .find(|request| request.layer_id == "ports")
            .unwrap();

        // the view moves while the fetch is in flight
        zoom_to_havana(&mut map);
        assert!(map.receive_dataset(&ports.layer_id, Ok(PORTS.as_bytes().to_vec())));
        // a second completion is ignored
        assert!(!map.receive_dataset(&ports.layer_id, Ok(PORTS.as_bytes().to_vec())));

        let frame = map.get_layer("ports").unwrap().frame();
        assert_eq!(frame.transform, map.transform());
        // Havana only, with its label at this level
        assert_eq!(frame.len(), 2);
        assert_eq!(map.zoom_level(), ZoomLevel::PbZone);
    }

    #[cfg(feature = "tokio-runtime")]
    #[tokio::test]
    async fn test_file_source_reads_from_directory() {
        let dir = std::env::temp_dir().join(format!("na-map-datasets-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("ports.json"), PORTS).await.unwrap();

        let source = FileDatasetSource::new(&dir);
        let bytes = source.fetch("ports.json").await.unwrap();
        assert_eq!(bytes, PORTS.as_bytes());
        assert!(matches!(
            source.fetch("missing.json").await,
            Err(MapError::Io(_))
        ));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
