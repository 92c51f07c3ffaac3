// src/config.rs

use crate::error::{SimulationError, SimulationResult};
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

/// Jährliche Flächenabnahme der Ciénegas (1 %).
pub const ANNUAL_RATE: f64 = 0.01;
/// Maximaler Anteil des Umfangs, um den ein Polygon pro Schritt schrumpfen darf.
pub const MAX_STEP_FRACTION: f64 = 0.2;
/// Jährliche Zunahme der Mikroplastik-Punkte.
pub const GROWTH_RATE: f64 = 1.1;
/// Einflussradius der Industrie in Projektionseinheiten (Meter bei EPSG:3857).
pub const INDUSTRIAL_RADIUS: f64 = 5000.0;
/// Einflussradius der Straßen in Projektionseinheiten.
pub const ROAD_RADIUS: f64 = 2000.0;
pub const START_YEAR: i32 = 2023;
pub const END_YEAR: i32 = 2027;
/// Punkte pro Ciénega im Batch-Modus.
pub const BATCH_SEED_COUNT: usize = 1000;
/// Punkte pro Ciénega im interaktiven Zeitverlauf.
pub const INITIAL_SEED_COUNT: usize = 10_000;
pub const DEFAULT_EROSION_HORIZON: u32 = 10;
pub const DEFAULT_BATCH_YEARS: u32 = 10;
pub const DEFAULT_MAX_SAMPLING_ATTEMPTS: usize = 10_000;

/// Konfiguration der Flächenreduktion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErosionConfig {
    /// Jahr, in dem die Reduktion bei 0 beginnt.
    pub start_year: i32,
    pub annual_rate: f64,
    pub max_step_fraction: f64,
    /// Anzahl der simulierten Jahre (Snapshots).
    pub horizon_years: u32,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            start_year: START_YEAR,
            annual_rate: ANNUAL_RATE,
            max_step_fraction: MAX_STEP_FRACTION,
            horizon_years: DEFAULT_EROSION_HORIZON,
        }
    }
}

impl ErosionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_year(mut self, year: i32) -> Self {
        self.start_year = year;
        self
    }

    pub fn with_annual_rate(mut self, rate: f64) -> Self {
        self.annual_rate = rate;
        self
    }

    pub fn with_max_step_fraction(mut self, fraction: f64) -> Self {
        self.max_step_fraction = fraction;
        self
    }

    pub fn with_horizon(mut self, years: u32) -> Self {
        self.horizon_years = years;
        self
    }

    pub fn validate(&self) -> SimulationResult<()> {
        if !(0.0..1.0).contains(&self.annual_rate) {
            return Err(SimulationError::InvalidConfiguration {
                message: format!("annual_rate must be in [0, 1), got {}", self.annual_rate),
            });
        }
        if !(self.max_step_fraction > 0.0 && self.max_step_fraction <= 1.0) {
            return Err(SimulationError::InvalidConfiguration {
                message: format!(
                    "max_step_fraction must be in (0, 1], got {}",
                    self.max_step_fraction
                ),
            });
        }
        Ok(())
    }
}

/// Strategien zur Erzeugung gleichverteilter Punkte innerhalb einer Ciénega.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingStrategy {
    /// Zufallspunkte in der Bounding Box, verworfen wenn außerhalb.
    /// Bricht nach `max_attempts` Versuchen mit `SamplingExhausted` ab.
    Rejection { max_attempts: usize },
    /// Flächengewichtete Auswahl eines Dreiecks der Triangulation; terminiert immer.
    Triangulated,
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        SamplingStrategy::Rejection {
            max_attempts: DEFAULT_MAX_SAMPLING_ATTEMPTS,
        }
    }
}

/// Konfiguration der Mikroplastik-Dispersion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispersionConfig {
    pub start_year: i32,
    pub growth_rate: f64,
    pub industrial_radius: f64,
    pub road_radius: f64,
    /// Punkte pro Ciénega im ersten Jahr des Batch-Laufs.
    pub batch_seed_count: usize,
    /// Anzahl der Jahre im Batch-Lauf.
    pub batch_years: u32,
    pub sampling: SamplingStrategy,
}

impl Default for DispersionConfig {
    fn default() -> Self {
        Self {
            start_year: START_YEAR,
            growth_rate: GROWTH_RATE,
            industrial_radius: INDUSTRIAL_RADIUS,
            road_radius: ROAD_RADIUS,
            batch_seed_count: BATCH_SEED_COUNT,
            batch_years: DEFAULT_BATCH_YEARS,
            sampling: SamplingStrategy::default(),
        }
    }
}

impl DispersionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_growth_rate(mut self, rate: f64) -> Self {
        self.growth_rate = rate;
        self
    }

    pub fn with_radii(mut self, industrial: f64, road: f64) -> Self {
        self.industrial_radius = industrial;
        self.road_radius = road;
        self
    }

    pub fn with_batch(mut self, seed_count: usize, years: u32) -> Self {
        self.batch_seed_count = seed_count;
        self.batch_years = years;
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingStrategy) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn validate(&self) -> SimulationResult<()> {
        if self.growth_rate <= 0.0 {
            return Err(SimulationError::InvalidConfiguration {
                message: format!("growth_rate must be positive, got {}", self.growth_rate),
            });
        }
        if self.industrial_radius <= 0.0 || self.road_radius <= 0.0 {
            return Err(SimulationError::InvalidConfiguration {
                message: "Influence radii must be positive.".to_string(),
            });
        }
        if let SamplingStrategy::Rejection { max_attempts: 0 } = self.sampling {
            return Err(SimulationError::InvalidConfiguration {
                message: "Rejection sampling needs at least one attempt.".to_string(),
            });
        }
        Ok(())
    }
}

/// Konfiguration des interaktiven Zeitverlaufs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    pub start_year: i32,
    pub end_year: i32,
    /// Punkte pro Ciénega im Startjahr.
    pub seed_count: usize,
    /// Punkte pro Ciénega für alle späteren Jahre.
    pub advance_seed_count: usize,
    pub dispersion: DispersionConfig,
    /// Optionaler Seed für reproduzierbare Läufe.
    pub seed: Option<u64>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            start_year: START_YEAR,
            end_year: END_YEAR,
            seed_count: INITIAL_SEED_COUNT,
            advance_seed_count: INITIAL_SEED_COUNT,
            dispersion: DispersionConfig::default(),
            seed: None,
        }
    }
}

impl TimelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_years(mut self, start_year: i32, end_year: i32) -> Self {
        self.start_year = start_year;
        self.end_year = end_year;
        self.dispersion.start_year = start_year;
        self
    }

    /// Setzt die Punktzahl für das Startjahr und alle späteren Jahre.
    pub fn with_seed_count(mut self, count: usize) -> Self {
        self.seed_count = count;
        self.advance_seed_count = count;
        self
    }

    /// Eigene Punktzahl für Jahre nach dem Startjahr, z.B. `BATCH_SEED_COUNT`.
    pub fn with_advance_seed_count(mut self, count: usize) -> Self {
        self.advance_seed_count = count;
        self
    }

    /// Punkte pro Ciénega für `year`.
    pub fn seed_count_for(&self, year: i32) -> usize {
        if year <= self.start_year {
            self.seed_count
        } else {
            self.advance_seed_count
        }
    }

    pub fn with_dispersion(mut self, dispersion: DispersionConfig) -> Self {
        self.dispersion = dispersion;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> SimulationResult<()> {
        if self.start_year > self.end_year {
            return Err(SimulationError::InvalidConfiguration {
                message: format!(
                    "start_year {} lies after end_year {}",
                    self.start_year, self.end_year
                ),
            });
        }
        self.dispersion.validate()
    }
}

/// Gesamtkonfiguration für die Bevy-App.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub erosion: ErosionConfig,
    pub timeline: TimelineConfig,
}

impl SimulationSettings {
    pub fn validate(&self) -> SimulationResult<()> {
        self.erosion.validate()?;
        self.timeline.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let settings = SimulationSettings::default();
        assert_eq!(settings.erosion.horizon_years, 10);
        assert_eq!(settings.timeline.seed_count, 10_000);
        assert_eq!(settings.timeline.advance_seed_count, 10_000);
        assert_eq!(settings.timeline.dispersion.batch_seed_count, 1000);
        assert_eq!(settings.timeline.start_year, 2023);
        assert_eq!(settings.timeline.end_year, 2027);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(ErosionConfig::new().with_annual_rate(1.0).validate().is_err());
        assert!(ErosionConfig::new().with_max_step_fraction(0.0).validate().is_err());
        assert!(DispersionConfig::new().with_radii(-1.0, 10.0).validate().is_err());
        assert!(
            DispersionConfig::new()
                .with_sampling(SamplingStrategy::Rejection { max_attempts: 0 })
                .validate()
                .is_err()
        );
        assert!(TimelineConfig::new().with_years(2030, 2023).validate().is_err());
    }

    #[test]
    fn test_seed_count_per_year() {
        let config = TimelineConfig::new().with_advance_seed_count(BATCH_SEED_COUNT);
        assert_eq!(config.seed_count_for(2023), 10_000);
        assert_eq!(config.seed_count_for(2024), 1000);
        assert_eq!(config.seed_count_for(2027), 1000);

        let uniform = TimelineConfig::new().with_seed_count(50);
        assert_eq!(uniform.seed_count_for(2023), 50);
        assert_eq!(uniform.seed_count_for(2026), 50);
    }

    #[test]
    fn test_with_years_keeps_dispersion_in_sync() {
        let config = TimelineConfig::new().with_years(2000, 2002);
        assert_eq!(config.dispersion.start_year, 2000);
    }
}
