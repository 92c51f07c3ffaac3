// ./src/main.rs
use bevy::app::AppExit;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use cienegas_sim::config::SimulationSettings;
use cienegas_sim::features::{Feature, FeatureCollection, FeatureLayer, InMemorySource};
use cienegas_sim::sim::*;
use geo::{LineString, Point, polygon};

fn main() {
    App::new()
        .add_plugins(MinimalPlugins)
        .add_plugins(LogPlugin::default())
        .insert_resource(FeatureSourceHandle::new(lerma_source()))
        .add_plugins(SimulationPlugin::new(SimulationSettings::default()))
        .add_systems(OnEnter(SimulationState::Ready), report_erosion_system)
        .add_systems(
            Update,
            (
                log_timeline_changes_system,
                drive_timeline_system.run_if(in_state(SimulationState::Ready)),
                exit_on_failure_system.run_if(in_state(SimulationState::Failed)),
            )
                .chain(),
        )
        .run();
}

/// Synthetische Layer in Web-Mercator-Koordinaten rund um Lerma.
fn lerma_source() -> InMemorySource {
    let mut wetlands = FeatureCollection::default();
    wetlands.push(
        Feature::new(polygon![
            (x: -11_069_000.0, y: 2_157_000.0), (x: -11_066_500.0, y: 2_157_200.0),
            (x: -11_066_000.0, y: 2_160_500.0), (x: -11_068_200.0, y: 2_161_000.0),
            (x: -11_069_500.0, y: 2_159_000.0),
        ])
        .with_attribute("name", "Chignahuapan"),
    );
    wetlands.push(
        Feature::new(polygon![
            (x: -11_064_000.0, y: 2_150_000.0), (x: -11_061_500.0, y: 2_150_300.0),
            (x: -11_061_200.0, y: 2_152_800.0), (x: -11_063_800.0, y: 2_153_000.0),
        ])
        .with_attribute("name", "Chimaliapan"),
    );
    wetlands.push(
        Feature::new(polygon![
            (x: -11_060_000.0, y: 2_142_000.0), (x: -11_058_800.0, y: 2_142_100.0),
            (x: -11_058_900.0, y: 2_143_200.0), (x: -11_060_100.0, y: 2_143_000.0),
        ])
        .with_attribute("name", "Chiconahuapan"),
    );

    let industries = FeatureCollection::from_geometries(vec![
        Point::new(-11_070_500.0, 2_162_000.0),
        Point::new(-11_063_000.0, 2_155_000.0),
        Point::new(-11_057_000.0, 2_147_000.0),
    ]);
    let roads = FeatureCollection::from_geometries(vec![
        LineString::from(vec![
            (-11_075_000.0, 2_158_500.0),
            (-11_065_000.0, 2_156_000.0),
            (-11_055_000.0, 2_151_000.0),
        ]),
        LineString::from(vec![(-11_062_500.0, 2_140_000.0), (-11_062_500.0, 2_165_000.0)]),
    ]);

    InMemorySource::new()
        .with_layer(FeatureLayer::Wetlands, wetlands)
        .with_layer(FeatureLayer::Industries, industries)
        .with_layer(FeatureLayer::Roads, roads)
}

fn report_erosion_system(
    history: Res<ErosionHistory>,
    features: Res<WetlandFeatures>,
    seed: Res<SeedResource>,
) {
    for snapshot in &history.snapshots {
        info!(
            "Erosion {}: {} wetlands, area {:.0} m², reduction {:.2}%",
            snapshot.year,
            snapshot.geometries.len(),
            snapshot.total_area(),
            snapshot.reduction_percent(history.original_area)
        );
    }

    let store = &features.0;
    let mut rng = seed.rng();
    match DispersionEngine::default().disperse_batch(
        Some(&store.wetlands),
        Some(&store.industries),
        Some(&store.roads),
        &mut rng,
    ) {
        Ok(points) => info!("Batch dispersion: {} contaminant points.", points.len()),
        Err(err) => error!("Batch dispersion failed: {}", err),
    }
}

fn log_timeline_changes_system(mut events: EventReader<TimelineChangedEvent>) {
    for event in events.read() {
        info!(
            "Timeline at {} ({:?}): {} visible contaminant points",
            event.year, event.position, event.visible_points
        );
    }
}

/// Schreitet bis zum Endjahr voran und beendet dann die App.
fn drive_timeline_system(
    timeline: Res<ContaminationTimeline>,
    mut advance: EventWriter<AdvanceYearRequest>,
    mut exit: EventWriter<AppExit>,
) {
    let timeline = &timeline.0;
    if timeline.can_advance() {
        advance.send(AdvanceYearRequest);
        return;
    }
    for (year, points) in timeline.points_by_year() {
        let industrial = points
            .iter()
            .filter(|p| p.influence == Influence::Industrial)
            .count();
        info!(
            "{}: {} points ({} industrial, {} road)",
            year,
            points.len(),
            industrial,
            points.len() - industrial
        );
    }
    exit.send(AppExit);
}

fn exit_on_failure_system(mut exit: EventWriter<AppExit>) {
    error!("Simulation failed, exiting.");
    exit.send(AppExit);
}
