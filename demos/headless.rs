use na_map::{
    data::source::MemoryDatasetSource,
    input::events::{InputEvent, MapEvent},
    layers::entity::EntityId,
    NaMap, Point, PbZoneMode, Viewport,
};

const PORTS: &str = r#"[
    {"id": 1, "coordinates": [4396, 2494], "name": "Havana"},
    {"id": 2, "coordinates": [7040, 3010], "name": "Fort Royal"},
    {"id": 3, "coordinates": [1250, 5600], "name": "La Navasse"}
]"#;

const PB_ZONES: &str = r#"[
    {"id": 1, "coordinates": [4396, 2494],
     "pbCircles": [[4380, 2480], [4410, 2505]], "joinCircles": [[4396, 2460]],
     "raidCircles": [[4420, 2520]], "raidPoints": [[4425, 2530]]}
]"#;

const REGIONS: &str = r#"[{"name": "Cuba", "centroid": [4200, 2600], "angle": -15}]"#;

const COUNTIES: &str = r#"[{"name": "La Habana", "centroid": [4390, 2520], "angle": 0}]"#;

/// Drives the map without any renderer, printing each committed frame
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("🗺️ na-map headless example");
    println!("==========================");

    let source = MemoryDatasetSource::new()
        .with_dataset("ports.json", PORTS)
        .with_dataset("pb-zones.json", PB_ZONES)
        .with_dataset("regions.json", REGIONS)
        .with_dataset("counties.json", COUNTIES);

    let mut map = NaMap::new(Viewport::new(1024.0, 768.0));
    map.add_default_layers()?;
    map.subscribe(|event| match event {
        MapEvent::ZoomLevelChanged { level } => println!("   🔭 level of detail: {level}"),
        MapEvent::DatasetFailed { layer_id, reason } => {
            println!("   ⚠️ {layer_id} failed to load: {reason}")
        }
        _ => {}
    });

    let loaded = map.load_pending_datasets(&source).await;
    println!("✅ Map created, {loaded} datasets loaded");
    print_frame(&map);

    println!("\n🎯 Double click on Havana:");
    map.handle_input(InputEvent::DoubleClick {
        position: Point::new(549.5, 311.75),
    });
    map.load_pending_datasets(&source).await;
    print_frame(&map);

    println!("\n🚀 Dragging:");
    map.handle_input(InputEvent::DragStart {
        position: Point::new(500.0, 400.0),
    });
    map.handle_input(InputEvent::Drag {
        delta: Point::new(-120.0, 40.0),
    });
    map.handle_input(InputEvent::DragEnd);
    print_frame(&map);

    println!("\n⚓ Raid zones of the selected port:");
    map.go_to_port(&EntityId::Number(1))?;
    map.set_pb_zone_mode(PbZoneMode::RaidSingle);
    print_frame(&map);

    println!("\n🔍 Zooming out with the wheel:");
    for _ in 0..5 {
        map.handle_input(InputEvent::Scroll {
            delta_y: 1.0,
            position: Point::new(512.0, 384.0),
        });
    }
    print_frame(&map);

    Ok(())
}

fn print_frame(map: &NaMap) {
    let frame = map.frame();
    println!("   Transform: {}", frame.transform);
    println!(
        "   Bounds: ({:.1}, {:.1}) - ({:.1}, {:.1})",
        frame.bounds.lower.x, frame.bounds.lower.y, frame.bounds.upper.x, frame.bounds.upper.y
    );
    println!(
        "   Tiles: {} at zoom {}, group {}",
        frame.tiles.len(),
        frame.tiles.zoom,
        frame.tile_transform()
    );
    for (id, layer) in map.layer_frames() {
        if !layer.is_empty() {
            println!("   Layer {id}: {} items", layer.len());
        }
    }
}
