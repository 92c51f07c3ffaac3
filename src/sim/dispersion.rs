// src/sim/dispersion.rs
//! Stochastische Verteilung von Mikroplastik-Punkten in den Ciénegas.

use crate::config::DispersionConfig;
use crate::error::SimulationResult;
use crate::features::{FeatureCollection, FeatureStore};
use crate::geometry::{InteriorSampler, measure};
use bevy::log::{info, warn};
use geo::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Quelle, deren Nähe einen Punkt als belastet klassifiziert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Influence {
    Industrial,
    Road,
}

/// Ein Mikroplastik-Punkt. Ein Punkt nahe Industrie und Straße erscheint
/// zweimal in der Ergebnisfolge, einmal pro Einfluss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContaminantPoint {
    pub location: Point<f64>,
    pub year: i32,
    pub influence: Influence,
}

/// `floor(seed_count * growth_rate^years_elapsed)`.
pub fn point_budget(seed_count: usize, years_elapsed: u32, growth_rate: f64) -> usize {
    let exponent = i32::try_from(years_elapsed).unwrap_or(i32::MAX);
    (seed_count as f64 * growth_rate.powi(exponent)).floor() as usize
}

#[derive(Debug, Clone, Default)]
pub struct DispersionEngine {
    config: DispersionConfig,
}

impl DispersionEngine {
    pub fn new(config: DispersionConfig) -> SimulationResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Punkte eines einzelnen Jahres.
    ///
    /// Fehlt eine der drei Collections, ist das Ergebnis leer und es wird
    /// nicht gesampelt. Reihenfolge: pro Ciénega, pro Sample, Industrie vor
    /// Straße.
    #[allow(clippy::too_many_arguments)]
    pub fn disperse<R: Rng + ?Sized>(
        &self,
        wetlands: Option<&FeatureCollection>,
        industries: Option<&FeatureCollection>,
        roads: Option<&FeatureCollection>,
        year: i32,
        seed_count: usize,
        years_elapsed: u32,
        rng: &mut R,
    ) -> SimulationResult<Vec<ContaminantPoint>> {
        let (Some(wetlands), Some(industries), Some(roads)) = (wetlands, industries, roads) else {
            warn!("Year {}: input layers unavailable, no contaminant points generated.", year);
            return Ok(Vec::new());
        };

        let mut points = Vec::new();
        self.disperse_into(
            &mut points,
            wetlands,
            industries,
            roads,
            year,
            point_budget(seed_count, years_elapsed, self.config.growth_rate),
            rng,
        )?;
        info!("Year {}: {} contaminant points generated.", year, points.len());
        Ok(points)
    }

    /// `disperse` auf einem vollständigen Store, `years_elapsed` aus dem Jahr abgeleitet.
    pub fn disperse_year<R: Rng + ?Sized>(
        &self,
        store: &FeatureStore,
        year: i32,
        seed_count: usize,
        rng: &mut R,
    ) -> SimulationResult<Vec<ContaminantPoint>> {
        let years_elapsed = u32::try_from(year - self.config.start_year).unwrap_or(0);
        self.disperse(
            Some(&store.wetlands),
            Some(&store.industries),
            Some(&store.roads),
            year,
            seed_count,
            years_elapsed,
            rng,
        )
    }

    /// Nicht-interaktiver Lauf über `batch_years` Jahre mit `batch_seed_count`
    /// Startpunkten; `years_elapsed` ist der Schleifenindex.
    pub fn disperse_batch<R: Rng + ?Sized>(
        &self,
        wetlands: Option<&FeatureCollection>,
        industries: Option<&FeatureCollection>,
        roads: Option<&FeatureCollection>,
        rng: &mut R,
    ) -> SimulationResult<Vec<ContaminantPoint>> {
        let (Some(wetlands), Some(industries), Some(roads)) = (wetlands, industries, roads) else {
            warn!("Batch dispersion skipped: input layers unavailable.");
            return Ok(Vec::new());
        };

        let mut points = Vec::new();
        for index in 0..self.config.batch_years {
            let year = self.config.start_year + index as i32;
            let budget = point_budget(self.config.batch_seed_count, index, self.config.growth_rate);
            self.disperse_into(&mut points, wetlands, industries, roads, year, budget, rng)?;
        }
        info!(
            "Batch dispersion over {} years complete: {} contaminant points generated.",
            self.config.batch_years,
            points.len()
        );
        Ok(points)
    }

    #[allow(clippy::too_many_arguments)]
    fn disperse_into<R: Rng + ?Sized>(
        &self,
        points: &mut Vec<ContaminantPoint>,
        wetlands: &FeatureCollection,
        industries: &FeatureCollection,
        roads: &FeatureCollection,
        year: i32,
        budget: usize,
        rng: &mut R,
    ) -> SimulationResult<()> {
        for (feature_index, wetland) in wetlands.iter().enumerate() {
            let sampler = InteriorSampler::new(&wetland.geometry, feature_index, self.config.sampling)?;
            for _ in 0..budget {
                let location = sampler.sample(rng)?;

                if measure::nearest_distance(industries.geometries(), &location)
                    < self.config.industrial_radius
                {
                    points.push(ContaminantPoint {
                        location,
                        year,
                        influence: Influence::Industrial,
                    });
                }
                if measure::nearest_distance(roads.geometries(), &location) < self.config.road_radius {
                    points.push(ContaminantPoint {
                        location,
                        year,
                        influence: Influence::Road,
                    });
                }
            }
        }
        Ok(())
    }
}
