// src/features/collection.rs

use crate::error::{SimulationError, SimulationResult};
use crate::features::FeatureLayer;
use crate::geometry::measure;
use geo::Geometry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Web-Mercator, die gemeinsame planare Projektion aller Layer.
pub const DEFAULT_CRS: &str = "EPSG:3857";

/// Eine Geometrie mit ihrer Attributzeile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: Geometry<f64>,
    pub attributes: BTreeMap<String, String>,
}

impl Feature {
    pub fn new(geometry: impl Into<Geometry<f64>>) -> Self {
        Self {
            geometry: geometry.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn area(&self) -> f64 {
        measure::area(&self.geometry)
    }
}

/// Geordnete Folge von Features in einem gemeinsamen Koordinatensystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub crs: String,
    pub features: Vec<Feature>,
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new(DEFAULT_CRS)
    }
}

impl FeatureCollection {
    pub fn new(crs: impl Into<String>) -> Self {
        Self {
            crs: crs.into(),
            features: Vec::new(),
        }
    }

    /// Collection in der Standardprojektion aus reinen Geometrien.
    pub fn from_geometries<I, G>(geometries: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<Geometry<f64>>,
    {
        Self {
            crs: DEFAULT_CRS.to_string(),
            features: geometries.into_iter().map(Feature::new).collect(),
        }
    }

    pub fn push(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    pub fn geometries(&self) -> impl Iterator<Item = &Geometry<f64>> + '_ {
        self.features.iter().map(|f| &f.geometry)
    }

    /// Summe der Flächen aller Features.
    pub fn total_area(&self) -> f64 {
        self.features.iter().map(Feature::area).sum()
    }

    /// Größte Einzelfläche, `None` bei leerer Collection.
    pub fn max_feature_area(&self) -> Option<f64> {
        self.features.iter().map(Feature::area).reduce(f64::max)
    }

    /// Hängt mehrere Teil-Collections (z.B. Industrie nach Gemeinde und Sektor) aneinander.
    pub fn concat<I>(layer: FeatureLayer, parts: I) -> SimulationResult<Self>
    where
        I: IntoIterator<Item = FeatureCollection>,
    {
        let mut parts = parts.into_iter();
        let Some(mut merged) = parts.next() else {
            return Ok(Self::default());
        };
        for part in parts {
            if part.crs != merged.crs {
                return Err(SimulationError::ProjectionMismatch {
                    layer,
                    expected: merged.crs.clone(),
                    found: part.crs,
                });
            }
            merged.features.extend(part.features);
        }
        Ok(merged)
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{Rect, coord};

    fn square(x: f64, y: f64, size: f64) -> geo::Polygon<f64> {
        Rect::new(coord! { x: x, y: y }, coord! { x: x + size, y: y + size }).to_polygon()
    }

    #[test]
    fn test_area_statistics() {
        let collection =
            FeatureCollection::from_geometries(vec![square(0.0, 0.0, 10.0), square(50.0, 0.0, 20.0)]);
        assert_eq!(collection.len(), 2);
        assert_relative_eq!(collection.total_area(), 500.0);
        assert_relative_eq!(collection.max_feature_area().unwrap(), 400.0);
        assert!(FeatureCollection::default().max_feature_area().is_none());
    }

    #[test]
    fn test_concat_industry_parts() {
        let lerma = FeatureCollection::from_geometries(vec![geo::Point::new(0.0, 0.0)]);
        let ocoyoacac = FeatureCollection::from_geometries(vec![
            geo::Point::new(1.0, 0.0),
            geo::Point::new(2.0, 0.0),
        ]);
        let merged = FeatureCollection::concat(FeatureLayer::Industries, vec![lerma, ocoyoacac]).unwrap();
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_concat_rejects_mixed_projections() {
        let a = FeatureCollection::from_geometries(vec![geo::Point::new(0.0, 0.0)]);
        let mut b = FeatureCollection::new("EPSG:4326");
        b.push(Feature::new(geo::Point::new(-99.5, 19.3)).with_attribute("municipio", "Lerma"));
        let result = FeatureCollection::concat(FeatureLayer::Industries, vec![a, b]);
        assert!(matches!(result, Err(SimulationError::ProjectionMismatch { .. })));
    }
}
