// src/features/store.rs

use crate::error::{SimulationError, SimulationResult};
use crate::features::FeatureCollection;
use bevy::log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Die drei Layer, die eine Simulation gemeinsam konsumiert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureLayer {
    Industries,
    Roads,
    Wetlands,
}

impl fmt::Display for FeatureLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FeatureLayer::Industries => "industries",
            FeatureLayer::Roads => "roads",
            FeatureLayer::Wetlands => "wetlands",
        };
        write!(f, "{name}")
    }
}

/// Schnittstelle zum externen Loader (Shapefiles o.ä.).
///
/// Implementierungen liefern bereits reprojizierte Collections; ein Fehler
/// wird pro Layer gemeldet.
pub trait FeatureSource {
    fn load(&self, layer: FeatureLayer) -> Result<FeatureCollection, String>;
}

/// Quelle für bereits im Speicher vorliegende Collections.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    layers: HashMap<FeatureLayer, FeatureCollection>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, layer: FeatureLayer, collection: FeatureCollection) -> Self {
        self.layers.insert(layer, collection);
        self
    }
}

impl FeatureSource for InMemorySource {
    fn load(&self, layer: FeatureLayer) -> Result<FeatureCollection, String> {
        self.layers
            .get(&layer)
            .cloned()
            .ok_or_else(|| format!("no {layer} layer provided"))
    }
}

/// Unveränderlicher Satz aller Eingabe-Layer einer Simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureStore {
    pub wetlands: FeatureCollection,
    pub industries: FeatureCollection,
    pub roads: FeatureCollection,
}

impl FeatureStore {
    /// Erstellt den Store und prüft, dass alle Layer dieselbe Projektion teilen.
    pub fn new(
        wetlands: FeatureCollection,
        industries: FeatureCollection,
        roads: FeatureCollection,
    ) -> SimulationResult<Self> {
        for (layer, collection) in [
            (FeatureLayer::Industries, &industries),
            (FeatureLayer::Roads, &roads),
        ] {
            if collection.crs != wetlands.crs {
                return Err(SimulationError::ProjectionMismatch {
                    layer,
                    expected: wetlands.crs.clone(),
                    found: collection.crs.clone(),
                });
            }
        }
        Ok(Self {
            wetlands,
            industries,
            roads,
        })
    }

    /// Lädt Industrie, Straßen und Ciénegas (in dieser Reihenfolge) aus `source`.
    /// Bricht beim ersten fehlerhaften Layer ab.
    pub fn load<S: FeatureSource + ?Sized>(source: &S) -> SimulationResult<Self> {
        let load = |layer: FeatureLayer| -> SimulationResult<FeatureCollection> {
            let collection = source
                .load(layer)
                .map_err(|reason| SimulationError::FeatureLoad { layer, reason })?;
            info!("Loaded {} {} features.", collection.len(), layer);
            Ok(collection)
        };
        let industries = load(FeatureLayer::Industries)?;
        let roads = load(FeatureLayer::Roads)?;
        let wetlands = load(FeatureLayer::Wetlands)?;
        Self::new(wetlands, industries, roads)
    }

    pub fn layer(&self, layer: FeatureLayer) -> &FeatureCollection {
        match layer {
            FeatureLayer::Industries => &self.industries,
            FeatureLayer::Roads => &self.roads,
            FeatureLayer::Wetlands => &self.wetlands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Point};

    fn complete_source() -> InMemorySource {
        InMemorySource::new()
            .with_layer(
                FeatureLayer::Industries,
                FeatureCollection::from_geometries(vec![Point::new(0.0, 0.0)]),
            )
            .with_layer(
                FeatureLayer::Roads,
                FeatureCollection::from_geometries(vec![LineString::from(vec![
                    (0.0, 0.0),
                    (10.0, 0.0),
                ])]),
            )
            .with_layer(
                FeatureLayer::Wetlands,
                FeatureCollection::from_geometries(vec![geo::Rect::new(
                    (0.0, 0.0),
                    (5.0, 5.0),
                )
                .to_polygon()]),
            )
    }

    #[test]
    fn test_load_complete_source() {
        let store = FeatureStore::load(&complete_source()).unwrap();
        assert_eq!(store.layer(FeatureLayer::Industries).len(), 1);
        assert_eq!(store.layer(FeatureLayer::Roads).len(), 1);
        assert_eq!(store.layer(FeatureLayer::Wetlands).len(), 1);
    }

    #[test]
    fn test_missing_layer_reports_that_layer() {
        let source = InMemorySource::new().with_layer(
            FeatureLayer::Industries,
            FeatureCollection::from_geometries(vec![Point::new(0.0, 0.0)]),
        );
        match FeatureStore::load(&source) {
            Err(SimulationError::FeatureLoad { layer, .. }) => assert_eq!(layer, FeatureLayer::Roads),
            other => panic!("expected roads load failure, got {:?}", other),
        }
    }

    #[test]
    fn test_projection_mismatch_rejected() {
        let wetlands = FeatureCollection::new("EPSG:4326");
        let result = FeatureStore::new(
            wetlands,
            FeatureCollection::default(),
            FeatureCollection::default(),
        );
        assert!(matches!(
            result,
            Err(SimulationError::ProjectionMismatch {
                layer: FeatureLayer::Industries,
                ..
            })
        ));
    }
}
