// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{BezPath, Rect, Shape};

use crate::Projection;

/// A closed ring of `(longitude, latitude)` positions in degrees.
pub type Ring = Vec<(f64, f64)>;

/// Polygons, each an exterior ring followed by its holes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MultiPolygon(pub Vec<Vec<Ring>>);

impl MultiPolygon {
    /// Converts a GeoJSON `Polygon` or `MultiPolygon` geometry value.
    ///
    /// Returns `None` for other geometry types. Positions with fewer than two coordinates are
    /// skipped.
    pub fn from_geojson(value: &geojson::Value) -> Option<Self> {
        fn rings(polygon: &[Vec<Vec<f64>>]) -> Vec<Ring> {
            polygon
                .iter()
                .map(|ring| {
                    ring.iter()
                        .filter_map(|pos| match pos.as_slice() {
                            [lon, lat, ..] => Some((*lon, *lat)),
                            _ => None,
                        })
                        .collect()
                })
                .collect()
        }
        match value {
            geojson::Value::Polygon(polygon) => Some(Self(vec![rings(polygon)])),
            geojson::Value::MultiPolygon(polygons) => {
                Some(Self(polygons.iter().map(|p| rings(p)).collect()))
            }
            _ => None,
        }
    }

    /// Whether there are no rings at all.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Vec::is_empty)
    }
}

/// Renders [`MultiPolygon`]s through a projection.
#[derive(Clone, Copy, Debug)]
pub struct GeoPath<P> {
    projection: P,
}

impl<P: Projection> GeoPath<P> {
    /// Creates a path generator.
    pub fn new(projection: P) -> Self {
        Self { projection }
    }

    /// The projection.
    pub fn projection(&self) -> &P {
        &self.projection
    }

    /// Projects `shape` into a closed-subpath `BezPath` (even-odd and nonzero fills agree for
    /// well-formed GeoJSON rings).
    pub fn path(&self, shape: &MultiPolygon) -> BezPath {
        let mut path = BezPath::new();
        for ring in shape.0.iter().flatten() {
            if ring.len() < 3 {
                continue;
            }
            // GeoJSON repeats the first position at the end.
            let open = match (ring.first(), ring.last()) {
                (Some(a), Some(b)) if a == b => &ring[..ring.len() - 1],
                _ => &ring[..],
            };
            for projected in self.projection.project_ring(open) {
                let mut points = projected.into_iter();
                let Some(first) = points.next() else {
                    continue;
                };
                path.move_to(first);
                for p in points {
                    path.line_to(p);
                }
                path.close_path();
            }
        }
        path
    }

    /// Projected bounds of `shape`, or `None` if nothing of it is drawn.
    pub fn bounds(&self, shape: &MultiPolygon) -> Option<Rect> {
        let path = self.path(shape);
        if path.elements().is_empty() {
            None
        } else {
            Some(path.bounding_box())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AlbersUsa;

    fn square(lon0: f64, lat0: f64, lon1: f64, lat1: f64) -> Ring {
        vec![
            (lon0, lat0),
            (lon1, lat0),
            (lon1, lat1),
            (lon0, lat1),
            (lon0, lat0),
        ]
    }

    #[test]
    fn converts_polygon_and_multipolygon() {
        let poly = geojson::Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        ]]);
        let shape = MultiPolygon::from_geojson(&poly).unwrap();
        assert_eq!(shape.0.len(), 1);
        assert_eq!(shape.0[0][0].len(), 4);

        let multi = geojson::Value::MultiPolygon(vec![
            vec![vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 0.0]]],
            vec![vec![vec![5.0, 5.0], vec![6.0, 5.0], vec![5.0, 6.0], vec![5.0, 5.0]]],
        ]);
        assert_eq!(MultiPolygon::from_geojson(&multi).unwrap().0.len(), 2);

        let point = geojson::Value::Point(vec![0.0, 0.0]);
        assert!(MultiPolygon::from_geojson(&point).is_none());
    }

    #[test]
    fn path_drops_the_closing_position() {
        let geo = GeoPath::new(AlbersUsa::default());
        let shape = MultiPolygon(vec![vec![square(-99.0, 38.0, -97.0, 39.0)]]);
        let path = geo.path(&shape);
        // move_to + 3 line_to + close.
        assert_eq!(path.elements().len(), 5);
    }

    #[test]
    fn bounds_follow_projection() {
        let geo = GeoPath::new(AlbersUsa::default());
        let west = geo
            .bounds(&MultiPolygon(vec![vec![square(-110.0, 38.0, -108.0, 40.0)]]))
            .unwrap();
        let east = geo
            .bounds(&MultiPolygon(vec![vec![square(-85.0, 38.0, -83.0, 40.0)]]))
            .unwrap();
        assert!(west.x1 < east.x0);
        assert!(west.width() > 0.0 && west.height() > 0.0);
    }

    #[test]
    fn shapes_outside_the_insets_have_no_bounds() {
        let geo = GeoPath::new(AlbersUsa::default());
        let europe = MultiPolygon(vec![vec![square(0.0, 45.0, 5.0, 50.0)]]);
        assert!(geo.bounds(&europe).is_none());
    }
}
