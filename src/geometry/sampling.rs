// src/geometry/sampling.rs

use crate::config::SamplingStrategy;
use crate::error::{SimulationError, SimulationResult};
use crate::geometry::{measure, triangulation::TriangleTable};
use bevy::log::debug;
use geo::{BoundingRect, Geometry, Point, Rect};
use rand::Rng;

/// Erzeugt gleichverteilte Punkte im Inneren einer Ciénega.
pub struct InteriorSampler<'a> {
    geometry: &'a Geometry<f64>,
    feature_index: usize,
    method: SamplerMethod,
}

enum SamplerMethod {
    Rejection { bounds: Option<Rect<f64>>, max_attempts: usize },
    Triangulated(TriangleTable),
}

impl<'a> InteriorSampler<'a> {
    /// Bereitet den Sampler vor. Bei `Triangulated` wird die Triangulation einmalig aufgebaut.
    pub fn new(
        geometry: &'a Geometry<f64>,
        feature_index: usize,
        strategy: SamplingStrategy,
    ) -> SimulationResult<Self> {
        let method = match strategy {
            SamplingStrategy::Rejection { max_attempts } => SamplerMethod::Rejection {
                bounds: geometry.bounding_rect(),
                max_attempts,
            },
            SamplingStrategy::Triangulated => {
                let table = TriangleTable::from_polygons(measure::polygons(geometry))?;
                debug!(
                    "Feature {}: {} triangles, area {:.1}",
                    feature_index,
                    table.len(),
                    table.total_area()
                );
                SamplerMethod::Triangulated(table)
            }
        };
        Ok(Self {
            geometry,
            feature_index,
            method,
        })
    }

    /// Ein Punkt, der echt innerhalb der Geometrie liegt.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SimulationResult<Point<f64>> {
        match &self.method {
            SamplerMethod::Rejection {
                bounds,
                max_attempts,
            } => self.rejection_sample(*bounds, *max_attempts, rng),
            SamplerMethod::Triangulated(table) => {
                table
                    .sample(rng)
                    .ok_or(SimulationError::SamplingExhausted {
                        feature_index: self.feature_index,
                        attempts: 0,
                    })
            }
        }
    }

    fn rejection_sample<R: Rng + ?Sized>(
        &self,
        bounds: Option<Rect<f64>>,
        max_attempts: usize,
        rng: &mut R,
    ) -> SimulationResult<Point<f64>> {
        let exhausted = SimulationError::SamplingExhausted {
            feature_index: self.feature_index,
            attempts: max_attempts,
        };
        let Some(bounds) = bounds else {
            return Err(exhausted);
        };
        let (min, max) = (bounds.min(), bounds.max());

        for _ in 0..max_attempts {
            let candidate = Point::new(
                rng.random_range(min.x..=max.x),
                rng.random_range(min.y..=max.y),
            );
            if measure::contains_point(self.geometry, &candidate) {
                return Ok(candidate);
            }
        }
        Err(exhausted)
    }
}
