// src/geometry/triangulation.rs

use crate::error::{SimulationError, SimulationResult};
use geo::{Contains, Coord, Point, Polygon};
use rand::Rng;
use spade::{ConstrainedDelaunayTriangulation, Point2, Triangulation};

/// Dreieck mit Fläche, Teil einer flächengewichteten Tabelle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedTriangle {
    pub vertices: [Coord<f64>; 3],
    pub area: f64,
}

impl WeightedTriangle {
    fn new(vertices: [Coord<f64>; 3]) -> Self {
        let [a, b, c] = vertices;
        let area = ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs() * 0.5;
        Self { vertices, area }
    }

    fn centroid(&self) -> Point<f64> {
        let [a, b, c] = self.vertices;
        Point::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
    }

    /// Gleichverteilter Punkt im Dreieck (Spiegelung am Parallelogramm).
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point<f64> {
        let [a, b, c] = self.vertices;
        let mut u: f64 = rng.random();
        let mut v: f64 = rng.random();
        if u + v > 1.0 {
            u = 1.0 - u;
            v = 1.0 - v;
        }
        Point::new(
            a.x + u * (b.x - a.x) + v * (c.x - a.x),
            a.y + u * (b.y - a.y) + v * (c.y - a.y),
        )
    }
}

/// Flächengewichtete Dreieckszerlegung einer Menge von Polygonen.
///
/// Grundlage ist eine eingeschränkte Delaunay-Triangulation pro Polygon;
/// Dreiecke außerhalb (Konkavitäten, Löcher) werden über ihren Schwerpunkt
/// aussortiert.
#[derive(Debug, Clone)]
pub struct TriangleTable {
    triangles: Vec<WeightedTriangle>,
    /// Kumulierte Flächen, monoton steigend.
    cumulative: Vec<f64>,
}

impl TriangleTable {
    pub fn from_polygons<'a, I>(polygons: I) -> SimulationResult<Self>
    where
        I: IntoIterator<Item = &'a Polygon<f64>>,
    {
        let mut triangles = Vec::new();
        for polygon in polygons {
            triangles.extend(triangulate_polygon(polygon)?);
        }

        let mut total = 0.0;
        let cumulative = triangles
            .iter()
            .map(|t| {
                total += t.area;
                total
            })
            .collect();

        Ok(Self {
            triangles,
            cumulative,
        })
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn total_area(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    /// Zieht einen gleichverteilten Punkt; `None` wenn keine Fläche vorhanden ist.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Point<f64>> {
        let total = self.total_area();
        if total <= 0.0 {
            return None;
        }
        let target = rng.random_range(0.0..total);
        let index = self
            .cumulative
            .partition_point(|&acc| acc <= target)
            .min(self.triangles.len() - 1);
        self.triangles.get(index).map(|t| t.sample(rng))
    }
}

fn triangulate_polygon(polygon: &Polygon<f64>) -> SimulationResult<Vec<WeightedTriangle>> {
    let mut cdt: ConstrainedDelaunayTriangulation<Point2<f64>> =
        ConstrainedDelaunayTriangulation::new();

    for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
        // Der letzte Punkt eines geschlossenen Rings wiederholt den ersten.
        let coords = if ring.is_closed() && ring.0.len() > 1 {
            &ring.0[..ring.0.len() - 1]
        } else {
            &ring.0[..]
        };

        let mut handles = Vec::with_capacity(coords.len());
        for coord in coords {
            let handle = cdt.insert(Point2::new(coord.x, coord.y)).map_err(|e| {
                SimulationError::TriangulationFailed {
                    reason: format!("Failed to insert vertex ({}, {}): {:?}", coord.x, coord.y, e),
                }
            })?;
            handles.push(handle);
        }

        for (i, &from) in handles.iter().enumerate() {
            let to = handles[(i + 1) % handles.len()];
            if from != to && cdt.can_add_constraint(from, to) {
                cdt.add_constraint(from, to);
            }
        }
    }

    let triangles = cdt
        .inner_faces()
        .map(|face| {
            let [a, b, c] = face.vertices().map(|v| {
                let p = v.position();
                Coord { x: p.x, y: p.y }
            });
            WeightedTriangle::new([a, b, c])
        })
        .filter(|t| t.area > 0.0 && polygon.contains(&t.centroid()))
        .collect();

    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{Area, polygon};
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_square_triangulation_covers_area() {
        let square = polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)];
        let table = TriangleTable::from_polygons([&square]).unwrap();
        assert_eq!(table.len(), 2);
        assert_relative_eq!(table.total_area(), 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_concave_polygon_excludes_notch() {
        // U-förmige Ciénega: die Kerbe darf nicht in der Tabelle landen
        let u_shape = polygon![
            (x: 0.0, y: 0.0), (x: 30.0, y: 0.0), (x: 30.0, y: 30.0), (x: 20.0, y: 30.0),
            (x: 20.0, y: 10.0), (x: 10.0, y: 10.0), (x: 10.0, y: 30.0), (x: 0.0, y: 30.0)
        ];
        let table = TriangleTable::from_polygons([&u_shape]).unwrap();
        assert_relative_eq!(table.total_area(), u_shape.unsigned_area(), epsilon = 1e-6);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let p = table.sample(&mut rng).unwrap();
            assert!(!(p.x() > 10.0 && p.x() < 20.0 && p.y() > 10.0));
        }
    }

    #[test]
    fn test_hole_excluded() {
        let donut = polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)],
            interiors: [[(x: 3.0, y: 3.0), (x: 7.0, y: 3.0), (x: 7.0, y: 7.0), (x: 3.0, y: 7.0)]],
        );
        let table = TriangleTable::from_polygons([&donut]).unwrap();
        assert_relative_eq!(table.total_area(), 84.0, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_table_yields_nothing() {
        let table = TriangleTable::from_polygons(std::iter::empty()).unwrap();
        assert_eq!(table.len(), 0);
        assert!(table.sample(&mut StdRng::seed_from_u64(1)).is_none());
    }
}
