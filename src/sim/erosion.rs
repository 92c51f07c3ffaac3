// src/sim/erosion.rs
//! Jährliche Flächenreduktion der Ciénegas durch negatives Puffern.

use crate::config::ErosionConfig;
use crate::error::{SimulationError, SimulationResult};
use crate::features::{Feature, FeatureCollection};
use crate::geometry::measure;
use bevy::log::{debug, info};
use geo::{Area, Buffer, Geometry, GeometryCollection, MultiPolygon, Polygon};

/// Eingefrorener Zustand aller Ciénegas in einem simulierten Jahr.
#[derive(Debug, Clone, PartialEq)]
pub struct YearlySnapshot {
    pub year: i32,
    pub geometries: FeatureCollection,
}

impl YearlySnapshot {
    pub fn total_area(&self) -> f64 {
        self.geometries.total_area()
    }

    /// Prozentuale Abnahme gegenüber der Ausgangsfläche.
    pub fn reduction_percent(&self, original_area: f64) -> f64 {
        if original_area <= 0.0 {
            return 0.0;
        }
        (1.0 - self.total_area() / original_area) * 100.0
    }
}

/// Kumulierter Reduktionsfaktor `1 - (1 - rate)^(year - start_year)`.
///
/// Monoton steigend in `year`; Jahre vor `start_year` liefern 0.
pub fn cumulative_reduction_factor(year: i32, start_year: i32, annual_rate: f64) -> f64 {
    let elapsed = (year - start_year).max(0);
    1.0 - (1.0 - annual_rate).powi(elapsed)
}

/// Parameter, die für ein Jahr auf jedes Polygon angewendet werden.
#[derive(Debug, Clone, Copy)]
struct ReductionStep {
    factor: f64,
    area_reference: f64,
    max_step_fraction: f64,
}

impl ReductionStep {
    fn reduce_geometry(&self, geometry: &Geometry<f64>) -> Option<Geometry<f64>> {
        match geometry {
            Geometry::Polygon(polygon) => {
                let mut survivors = self.reduce_polygon(polygon);
                match survivors.len() {
                    0 => None,
                    1 => survivors.pop().map(Geometry::Polygon),
                    _ => Some(Geometry::MultiPolygon(MultiPolygon::new(survivors))),
                }
            }
            Geometry::MultiPolygon(multi) => {
                let survivors: Vec<Polygon<f64>> =
                    multi.0.iter().flat_map(|p| self.reduce_polygon(p)).collect();
                (!survivors.is_empty()).then(|| Geometry::MultiPolygon(MultiPolygon::new(survivors)))
            }
            Geometry::GeometryCollection(collection) => {
                let survivors: Vec<Geometry<f64>> = collection
                    .0
                    .iter()
                    .filter_map(|g| self.reduce_geometry(g))
                    .collect();
                (!survivors.is_empty())
                    .then(|| Geometry::GeometryCollection(GeometryCollection::new_from(survivors)))
            }
            // Punkte und Linien haben keine Fläche und gelten als kollabiert.
            _ => None,
        }
    }

    /// Schrumpft ein einfaches Polygon; kann in mehrere Teile zerfallen.
    fn reduce_polygon(&self, polygon: &Polygon<f64>) -> Vec<Polygon<f64>> {
        let area = polygon.unsigned_area();
        if area <= 0.0 {
            return Vec::new();
        }
        let adjusted = (self.factor * (self.area_reference / area)).min(self.max_step_fraction);
        let offset = adjusted * measure::perimeter(polygon);
        if offset <= 0.0 {
            return vec![polygon.clone()];
        }

        polygon
            .buffer(-offset)
            .0
            .into_iter()
            .filter(|p| p.unsigned_area() > 0.0)
            .collect()
    }
}

/// Erzeugt die Jahresfolge geschrumpfter Ciénegas.
#[derive(Debug, Clone, Default)]
pub struct ErosionEngine {
    config: ErosionConfig,
}

impl ErosionEngine {
    pub fn new(config: ErosionConfig) -> SimulationResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Läuft über den konfigurierten Horizont.
    pub fn run(&self, wetlands: &FeatureCollection) -> SimulationResult<Vec<YearlySnapshot>> {
        self.simulate_reduction(wetlands, self.config.horizon_years)
    }

    /// Ein Snapshot pro Jahr in `[start_year, start_year + horizon_years)`.
    ///
    /// Jeder Snapshot wird aus den ursprünglichen Geometrien mit dem
    /// kumulierten Faktor seines Jahres berechnet. Kollabierte Features fehlen
    /// im Snapshot.
    pub fn simulate_reduction(
        &self,
        wetlands: &FeatureCollection,
        horizon_years: u32,
    ) -> SimulationResult<Vec<YearlySnapshot>> {
        if horizon_years == 0 {
            return Ok(Vec::new());
        }
        validate_wetlands(wetlands)?;

        let area_total = wetlands.total_area();
        let area_reference = wetlands.max_feature_area().unwrap_or(0.0);
        info!(
            "Simulating erosion of {} wetlands over {} years (total area {:.1}, reference area {:.1})",
            wetlands.len(),
            horizon_years,
            area_total,
            area_reference
        );

        let mut snapshots = Vec::with_capacity(horizon_years as usize);
        for offset in 0..horizon_years {
            let year = self.config.start_year + offset as i32;
            let step = ReductionStep {
                factor: cumulative_reduction_factor(
                    year,
                    self.config.start_year,
                    self.config.annual_rate,
                ),
                area_reference,
                max_step_fraction: self.config.max_step_fraction,
            };

            let mut geometries = FeatureCollection::new(wetlands.crs.clone());
            for feature in wetlands {
                if let Some(geometry) = step.reduce_geometry(&feature.geometry) {
                    geometries.push(Feature {
                        geometry,
                        attributes: feature.attributes.clone(),
                    });
                }
            }

            let snapshot = YearlySnapshot { year, geometries };
            debug!(
                "Year {}: factor {:.4}, {} wetlands left, reduction {:.2}%",
                year,
                step.factor,
                snapshot.geometries.len(),
                snapshot.reduction_percent(area_total)
            );
            snapshots.push(snapshot);
        }

        Ok(snapshots)
    }
}

/// Flächen dienen als Divisor; Ciénegas ohne Fläche sind ungültig.
fn validate_wetlands(wetlands: &FeatureCollection) -> SimulationResult<()> {
    for (feature_index, feature) in wetlands.iter().enumerate() {
        if feature.area() <= 0.0 {
            return Err(SimulationError::InvalidGeometry {
                feature_index,
                reason: "wetland has zero area".to_string(),
            });
        }
        if measure::polygons(&feature.geometry)
            .iter()
            .any(|p| p.unsigned_area() <= 0.0)
        {
            return Err(SimulationError::InvalidGeometry {
                feature_index,
                reason: "wetland contains a polygon with zero area".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ANNUAL_RATE, START_YEAR};
    use approx::assert_relative_eq;
    use geo::{Point, Rect};

    fn square(x: f64, y: f64, size: f64) -> Polygon<f64> {
        Rect::new((x, y), (x + size, y + size)).to_polygon()
    }

    fn engine() -> ErosionEngine {
        ErosionEngine::new(ErosionConfig::default()).unwrap()
    }

    #[test]
    fn test_factor_is_monotonic() {
        let mut previous = cumulative_reduction_factor(START_YEAR, START_YEAR, ANNUAL_RATE);
        assert_relative_eq!(previous, 0.0);
        for year in START_YEAR + 1..START_YEAR + 30 {
            let factor = cumulative_reduction_factor(year, START_YEAR, ANNUAL_RATE);
            assert!(factor >= previous);
            previous = factor;
        }
        assert_relative_eq!(
            cumulative_reduction_factor(START_YEAR + 1, START_YEAR, ANNUAL_RATE),
            0.01,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_three_year_square_shrinks_every_year() {
        let wetlands = FeatureCollection::from_geometries(vec![square(0.0, 0.0, 100.0)]);
        let snapshots = engine().simulate_reduction(&wetlands, 3).unwrap();

        assert_eq!(snapshots.len(), 3);
        assert_eq!(
            snapshots.iter().map(|s| s.year).collect::<Vec<_>>(),
            vec![2023, 2024, 2025]
        );

        let areas: Vec<f64> = snapshots.iter().map(|s| s.total_area()).collect();
        assert!(areas[0] <= 10_000.0);
        for pair in areas.windows(2) {
            assert!(pair[1] < pair[0], "areas not decreasing: {:?}", areas);
        }
        // 2024: Offset 0.01 * 400 = 4 auf jeder Seite
        assert_relative_eq!(areas[1], 92.0 * 92.0, max_relative = 1e-4);
    }

    #[test]
    fn test_zero_horizon_is_empty() {
        let wetlands = FeatureCollection::from_geometries(vec![square(0.0, 0.0, 10.0)]);
        assert!(engine().simulate_reduction(&wetlands, 0).unwrap().is_empty());
    }

    #[test]
    fn test_zero_area_wetland_is_invalid() {
        let flat = Polygon::new(
            geo::LineString::from(vec![(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (0.0, 0.0)]),
            vec![],
        );
        let wetlands =
            FeatureCollection::from_geometries(vec![square(0.0, 0.0, 10.0), flat]);
        let result = engine().simulate_reduction(&wetlands, 2);
        assert!(matches!(
            result,
            Err(SimulationError::InvalidGeometry { feature_index: 1, .. })
        ));
    }

    #[test]
    fn test_snapshots_never_contain_empty_geometry() {
        let wetlands = FeatureCollection::from_geometries(vec![
            Geometry::Polygon(square(0.0, 0.0, 1000.0)),
            Geometry::MultiPolygon(MultiPolygon::new(vec![
                square(2000.0, 0.0, 50.0),
                square(2100.0, 0.0, 5.0),
            ])),
            Geometry::GeometryCollection(GeometryCollection::new_from(vec![
                square(3000.0, 0.0, 20.0).into(),
                Point::new(0.0, 0.0).into(),
            ])),
        ]);
        let snapshots = engine().simulate_reduction(&wetlands, 10).unwrap();
        for snapshot in &snapshots {
            for feature in &snapshot.geometries {
                assert!(feature.area() > 0.0, "year {} has collapsed geometry", snapshot.year);
            }
        }
    }

    #[test]
    fn test_small_fragment_step_is_capped() {
        // Kleines Fragment neben großer Ciénega: der Faktor wird auf 0.2 begrenzt,
        // im Startjahr (Faktor 0) bleibt das Fragment unverändert.
        let wetlands = FeatureCollection::from_geometries(vec![
            square(0.0, 0.0, 1000.0),
            square(5000.0, 0.0, 10.0),
        ]);
        let snapshots = engine().simulate_reduction(&wetlands, 2).unwrap();
        assert_eq!(snapshots[0].geometries.len(), 2);
        // 2024: Offset 0.2 * 40 = 8, 10 - 2 * 8 < 0, das Fragment kollabiert
        assert_eq!(snapshots[1].geometries.len(), 1);
    }

    #[test]
    fn test_reduction_percent() {
        let wetlands = FeatureCollection::from_geometries(vec![square(0.0, 0.0, 100.0)]);
        let snapshots = engine().simulate_reduction(&wetlands, 2).unwrap();
        let original = wetlands.total_area();
        assert_relative_eq!(snapshots[0].reduction_percent(original), 0.0, epsilon = 1e-9);
        assert_relative_eq!(
            snapshots[1].reduction_percent(original),
            (1.0 - 92.0 * 92.0 / 10_000.0) * 100.0,
            max_relative = 1e-4
        );
    }
}
