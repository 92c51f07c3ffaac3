// src/geometry/measure.rs
//! Messfunktionen auf `geo::Geometry`: Fläche, Umfang, Enthaltensein, Abstand.

use geo::{Area, Contains, Distance, Euclidean, Geometry, Length, LineString, Point, Polygon};

/// Fläche (immer >= 0).
pub fn area(geometry: &Geometry<f64>) -> f64 {
    geometry.unsigned_area()
}

/// Umfang eines Polygons inklusive aller Löcher.
pub fn perimeter(polygon: &Polygon<f64>) -> f64 {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(|ring: &LineString<f64>| Euclidean.length(ring))
        .sum()
}

/// Alle einfachen Polygone einer (verschachtelten) Geometrie.
pub fn polygons(geometry: &Geometry<f64>) -> Vec<&Polygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => vec![polygon],
        Geometry::MultiPolygon(multi) => multi.0.iter().collect(),
        Geometry::GeometryCollection(collection) => collection.0.iter().flat_map(polygons).collect(),
        _ => Vec::new(),
    }
}

/// Echtes Enthaltensein: Punkte auf dem Rand zählen nicht.
pub fn contains_point(geometry: &Geometry<f64>, point: &Point<f64>) -> bool {
    match geometry {
        Geometry::Polygon(polygon) => polygon.contains(point),
        Geometry::MultiPolygon(multi) => multi.0.iter().any(|p| p.contains(point)),
        Geometry::Rect(rect) => rect.to_polygon().contains(point),
        Geometry::Triangle(triangle) => triangle.to_polygon().contains(point),
        Geometry::GeometryCollection(collection) => {
            collection.0.iter().any(|g| contains_point(g, point))
        }
        _ => false,
    }
}

/// Euklidischer Abstand eines Punktes zu einer beliebigen Geometrie.
///
/// Punkte innerhalb einer Fläche haben Abstand 0.
pub fn distance_to(geometry: &Geometry<f64>, point: &Point<f64>) -> f64 {
    Euclidean.distance(geometry, point)
}

/// Kleinster Abstand zu allen Geometrien einer Collection; leer ergibt `f64::INFINITY`.
pub fn nearest_distance<'a, I>(geometries: I, point: &Point<f64>) -> f64
where
    I: IntoIterator<Item = &'a Geometry<f64>>,
{
    geometries
        .into_iter()
        .map(|g| distance_to(g, point))
        .fold(f64::INFINITY, f64::min)
}
