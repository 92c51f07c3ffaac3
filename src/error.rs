// src/error.rs
use crate::features::FeatureLayer;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Failed to load {layer} features: {reason}")]
    FeatureLoad { layer: FeatureLayer, reason: String },

    #[error("Projection mismatch: {layer} uses '{found}', expected '{expected}'")]
    ProjectionMismatch {
        layer: FeatureLayer,
        expected: String,
        found: String,
    },

    #[error("Invalid geometry in feature {feature_index}: {reason}")]
    InvalidGeometry { feature_index: usize, reason: String },

    #[error("Timeline boundary reached at year {year}")]
    BoundaryReached { year: i32 },

    #[error("No interior point found in feature {feature_index} after {attempts} attempts")]
    SamplingExhausted { feature_index: usize, attempts: usize },

    #[error("Triangulation failed: {reason}")]
    TriangulationFailed { reason: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl SimulationError {
    /// Navigationsfehler sind für den Aufrufer ignorierbar.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SimulationError::BoundaryReached { .. })
    }
}

pub type SimulationResult<T> = Result<T, SimulationError>;
