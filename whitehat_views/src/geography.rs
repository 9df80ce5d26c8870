// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State outlines loaded from GeoJSON.

use std::io::Read;

use geojson::{FeatureCollection, GeoJson};
use whitehat_geo::MultiPolygon;

use crate::DataError;

/// One state outline.
#[derive(Clone, Debug, PartialEq)]
pub struct StateFeature {
    /// The feature's `NAME` property, as written (e.g. `New York`).
    pub name: String,
    /// Polygons in longitude/latitude degrees.
    pub shape: MultiPolygon,
}

/// The state outlines drawn by the map, in feature order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateGeography {
    /// Features with a `NAME` and polygonal geometry.
    pub features: Vec<StateFeature>,
}

impl StateGeography {
    /// Parses a GeoJSON `FeatureCollection`.
    pub fn from_geojson_str(json: &str) -> Result<Self, DataError> {
        let geojson: GeoJson = json.parse().map_err(Box::new)?;
        Self::from_geojson(geojson)
    }

    /// Parses a GeoJSON `FeatureCollection` from a reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, DataError> {
        let geojson = GeoJson::from_reader(reader).map_err(|e| Box::new(geojson::Error::from(e)))?;
        Self::from_geojson(geojson)
    }

    fn from_geojson(geojson: GeoJson) -> Result<Self, DataError> {
        match geojson {
            GeoJson::FeatureCollection(fc) => Ok(Self::from_feature_collection(&fc)),
            GeoJson::Feature(_) => Err(DataError::NotFeatureCollection("Feature")),
            GeoJson::Geometry(_) => Err(DataError::NotFeatureCollection("Geometry")),
        }
    }

    /// Collects polygonal features with a string `NAME` property; others are skipped.
    pub fn from_feature_collection(fc: &FeatureCollection) -> Self {
        let mut features = Vec::with_capacity(fc.features.len());
        for feature in &fc.features {
            let name = match feature.property("NAME") {
                Some(serde_json::Value::String(s)) => s.clone(),
                _ => {
                    tracing::warn!(id = ?feature.id, "skipping feature without a NAME");
                    continue;
                }
            };
            let Some(shape) = feature
                .geometry
                .as_ref()
                .and_then(|g| MultiPolygon::from_geojson(&g.value))
            else {
                tracing::warn!(%name, "skipping feature without polygon geometry");
                continue;
            };
            features.push(StateFeature { name, shape });
        }
        tracing::debug!(count = features.len(), "loaded state geography");
        Self { features }
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether there are no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"NAME": "Kansas"},
             "geometry": {"type": "Polygon", "coordinates": [[[-102,37],[-94.6,37],[-94.6,40],[-102,40],[-102,37]]]}},
            {"type": "Feature", "properties": {"NAME": "Nowhere"},
             "geometry": {"type": "Point", "coordinates": [0, 0]}},
            {"type": "Feature", "properties": {"GEO_ID": "x"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}}
        ]
    }"#;

    #[test]
    fn keeps_named_polygon_features() {
        let geo = StateGeography::from_geojson_str(STATES).unwrap();
        assert_eq!(geo.len(), 1);
        assert_eq!(geo.features[0].name, "Kansas");
        assert_eq!(geo.features[0].shape.0[0][0].len(), 5);
    }

    #[test]
    fn rejects_non_collections() {
        let single = r#"{"type": "Feature", "properties": {}, "geometry": null}"#;
        assert!(matches!(
            StateGeography::from_geojson_str(single),
            Err(DataError::NotFeatureCollection("Feature"))
        ));
        assert!(matches!(
            StateGeography::from_geojson_str("not json"),
            Err(DataError::GeoJson(_))
        ));
    }
}
