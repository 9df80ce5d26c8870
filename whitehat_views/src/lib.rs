// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linked views of U.S. firearm death statistics.
//!
//! Two leaf components render into their own [`Canvas`]:
//!
//! - [`DeathRateBarChart`]: paired male/female bars of deaths per 100,000 people per state.
//! - [`ChoroplethMap`]: states colored by population per death, proportional city markers, a
//!   color legend, click-to-zoom and brushing.
//!
//! Neither component owns cross-view state. Brushed and zoomed state names live with the host
//! behind [`LinkedViewState`] and only change through its setters; the host feeds the brushed
//! state back into [`ChoroplethMap::apply_brushed_state`].
//!
//! Every operation is a synchronous `&mut self` call that returns the [`MarkDiff`]s it caused.
//! Zoom animations are sampled by the host through [`ChoroplethMap::advance`].
//!
//! [`MarkDiff`]: whitehat_core::MarkDiff

mod bar_chart;
mod canvas;
mod data;
mod error;
mod geography;
mod linked;
mod map;
mod pointer;
mod zoom;

pub use bar_chart::DeathRateBarChart;
pub use canvas::{Canvas, Tooltip, TooltipState};
pub use data::{CityRecord, Dataset, StateRates, StateRecord, display_name, normalize_state_name};
pub use error::DataError;
pub use geography::{StateFeature, StateGeography};
pub use linked::{LinkedViewState, SharedViewState};
pub use map::{ChoroplethMap, LEGEND_RATIOS, StateHighlight, legend_ramp_positions};
pub use pointer::{EventFlow, PointerEvent};
pub use zoom::{
    MAX_SCALE, ZOOM_IN_DURATION, ZOOM_OUT_DURATION, ZoomState, ZoomTransform, ZoomTransition,
    ease_cubic_in_out,
};
