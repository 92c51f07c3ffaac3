// src/sim/systems.rs
use super::resources::*;
use crate::config::SimulationSettings;
use crate::error::{SimulationError, SimulationResult};
use crate::features::FeatureStore;
use crate::sim::erosion::ErosionEngine;
use crate::sim::history::ErosionHistory;
use crate::sim::seed::{SeedChangedEvent, SeedResource};
use crate::sim::state::SimulationState;
use crate::sim::timeline::Timeline;
use bevy::prelude::*;

/// Erosionslauf und Start der Zeitleiste für einen geladenen Store.
pub fn prepare_simulation(
    store: &FeatureStore,
    settings: &SimulationSettings,
    seed: &SeedResource,
) -> SimulationResult<(ErosionHistory, Timeline)> {
    settings.validate()?;
    let snapshots = ErosionEngine::new(settings.erosion.clone())?.run(&store.wetlands)?;
    let history = ErosionHistory::new(snapshots, store.wetlands.total_area());
    let timeline = Timeline::start_with_rng(store, settings.timeline.clone(), seed.rng())?;
    Ok((history, timeline))
}

fn resolve_store(
    loaded: Option<&WetlandFeatures>,
    source: Option<&FeatureSourceHandle>,
) -> SimulationResult<FeatureStore> {
    if let Some(features) = loaded {
        return Ok(features.0.clone());
    }
    let source = source.ok_or_else(|| SimulationError::InvalidConfiguration {
        message: "no FeatureSourceHandle resource registered".to_string(),
    })?;
    FeatureStore::load(source.0.as_ref())
}

/// Läuft bei jedem Eintritt in `Initializing` (Start und nach Seed-Wechsel).
pub fn initialize_simulation_system(
    mut commands: Commands,
    settings: Res<SimulationSettings>,
    seed: Res<SeedResource>,
    source: Option<Res<FeatureSourceHandle>>,
    loaded: Option<Res<WetlandFeatures>>,
    mut next_state: ResMut<NextState<SimulationState>>,
    mut changed: EventWriter<TimelineChangedEvent>,
) {
    let result = resolve_store(loaded.as_deref(), source.as_deref()).and_then(|store| {
        prepare_simulation(&store, &settings, &seed).map(|prepared| (store, prepared))
    });

    match result {
        Ok((store, (history, timeline))) => {
            info!(
                "Simulation ready (seed {}): {} erosion snapshots, timeline at {}.",
                seed.seed,
                history.len(),
                timeline.current_year()
            );
            changed.send(TimelineChangedEvent::from_timeline(&timeline));
            commands.insert_resource(WetlandFeatures(store));
            commands.insert_resource(history);
            commands.insert_resource(ContaminationTimeline(timeline));
            next_state.set(SimulationState::Ready);
        }
        Err(err) => {
            error!("Simulation initialization failed: {}", err);
            next_state.set(SimulationState::Failed);
        }
    }
}

pub fn handle_advance_requests_system(
    mut requests: EventReader<AdvanceYearRequest>,
    features: Res<WetlandFeatures>,
    mut timeline: ResMut<ContaminationTimeline>,
    mut changed: EventWriter<TimelineChangedEvent>,
) {
    for _ in requests.read() {
        match timeline.0.advance(&features.0) {
            Ok(_) => {
                changed.send(TimelineChangedEvent::from_timeline(&timeline.0));
            }
            Err(err) if err.is_recoverable() => {
                info!("Advance ignored: {}", err);
            }
            Err(err) => {
                // Jahr und Cache sind unverändert, die Sitzung bleibt nutzbar.
                error!("Advancing the timeline failed: {}", err);
            }
        }
    }
}

pub fn handle_retreat_requests_system(
    mut requests: EventReader<RetreatYearRequest>,
    mut timeline: ResMut<ContaminationTimeline>,
    mut changed: EventWriter<TimelineChangedEvent>,
) {
    for _ in requests.read() {
        if !timeline.0.can_retreat() {
            debug!("Retreat ignored: already at {}.", timeline.0.current_year());
            continue;
        }
        timeline.0.retreat();
        changed.send(TimelineChangedEvent::from_timeline(&timeline.0));
    }
}

/// Neuer Seed: Ressource aktualisieren und alles neu initialisieren.
pub fn seed_changed_event_handler(
    mut events: EventReader<SeedChangedEvent>,
    mut seed_resource: ResMut<SeedResource>,
    mut next_state: ResMut<NextState<SimulationState>>,
) {
    let Some(event) = events.read().last() else {
        return;
    };
    info!(
        "SeedResource is being updated due to SeedChangedEvent: {}",
        event.new_seed
    );
    seed_resource.reset_with_new_seed(event.new_seed);
    next_state.set(SimulationState::Initializing);
}
