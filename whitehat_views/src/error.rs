// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Errors raised while loading a dataset or a states geography.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// The input could not be read.
    #[error("failed to read input")]
    Io(#[from] std::io::Error),
    /// The dataset is not valid JSON of the expected shape.
    #[error("invalid dataset JSON")]
    Json(#[from] serde_json::Error),
    /// The geography is not valid GeoJSON.
    #[error("invalid GeoJSON")]
    GeoJson(#[from] Box<geojson::Error>),
    /// The geography root is a single feature or geometry.
    #[error("expected a GeoJSON FeatureCollection, found a {0}")]
    NotFeatureCollection(&'static str),
}
