// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geographic projection for Whitehat maps.
//!
//! - [`ConicEqualArea`] is the Albers conic equal-area projection with d3's rotate/center/
//!   scale/translate pipeline and an optional clip extent.
//! - [`AlbersUsa`] composes three of them (lower 48, Alaska, Hawaii) into the familiar inset
//!   layout.
//! - [`GeoPath`] turns [`MultiPolygon`]s into `kurbo` paths and projected bounds.

mod clip;
mod path;
mod projection;

pub use path::{GeoPath, MultiPolygon, Ring};
pub use projection::{AlbersUsa, ConicEqualArea, Projection};
