pub mod dispersion;
pub mod erosion;
pub mod history;
pub mod plugin;
pub mod resources;
pub mod seed;
pub mod state;
pub mod systems;
pub mod timeline;

pub use dispersion::{ContaminantPoint, DispersionEngine, Influence};
pub use erosion::{ErosionEngine, YearlySnapshot};
pub use history::ErosionHistory;
pub use plugin::SimulationPlugin;
pub use resources::{
    AdvanceYearRequest, ContaminationTimeline, FeatureSourceHandle, RetreatYearRequest,
    TimelineChangedEvent, WetlandFeatures,
};
pub use seed::{SeedChangedEvent, SeedResource};
pub use state::SimulationState;
pub use timeline::{Timeline, TimelinePosition};
