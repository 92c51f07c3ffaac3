pub mod measure;
pub mod sampling;
pub mod triangulation;

pub use sampling::InteriorSampler;
pub use triangulation::TriangleTable;
