// src/sim/plugin.rs
//! Bevy-Anbindung: Ressourcen, Events, Zustände und Systeme der Simulation.

use super::resources::*;
use super::systems::*;
use crate::config::SimulationSettings;
use crate::sim::history::ErosionHistory;
use crate::sim::seed::{SeedChangedEvent, SeedResource};
use crate::sim::state::SimulationState;
use bevy::prelude::*;

/// Registriert alles, was eine headless Sitzung braucht.
///
/// Die Eingabe-Layer kommen aus einer `FeatureSourceHandle`-Ressource, die
/// vor dem ersten `update()` eingefügt sein muss.
#[derive(Debug, Clone, Default)]
pub struct SimulationPlugin {
    pub settings: SimulationSettings,
}

impl SimulationPlugin {
    pub fn new(settings: SimulationSettings) -> Self {
        Self { settings }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let seed = self
            .settings
            .timeline
            .seed
            .map_or_else(SeedResource::default, SeedResource::from_seed);

        app.insert_resource(self.settings.clone())
            .insert_resource(seed)
            .init_resource::<ErosionHistory>()
            .add_event::<AdvanceYearRequest>()
            .add_event::<RetreatYearRequest>()
            .add_event::<TimelineChangedEvent>()
            .add_event::<SeedChangedEvent>()
            .init_state::<SimulationState>()
            .add_systems(
                OnEnter(SimulationState::Initializing),
                initialize_simulation_system,
            )
            .add_systems(
                Update,
                (
                    seed_changed_event_handler,
                    (handle_advance_requests_system, handle_retreat_requests_system)
                        .chain()
                        .run_if(in_state(SimulationState::Ready)),
                ),
            );
    }
}
