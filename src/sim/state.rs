use bevy::prelude::*;

#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum SimulationState {
    #[default] // Startzustand
    Initializing,
    Ready,
    /// Laden oder Erosionslauf fehlgeschlagen; wartet auf neuen Seed.
    Failed,
}
