// src/lib.rs
pub mod config;
pub mod error;
pub mod features;
pub mod geometry;
pub mod sim;

pub use error::{SimulationError, SimulationResult};
