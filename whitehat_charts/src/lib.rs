// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart building blocks for `whitehat_core`.
//!
//! This crate is a small, reusable layer above `whitehat_core`:
//! - **Scales** map data values into screen coordinates (linear, band) or colors
//!   (sequential, over the `RdYlGn` ramp).
//! - **Guides** (axes, legends) are built by generating `whitehat_core::Mark`s.
//! - **Series marks** (bars, points) generate one stable-identity mark per table row, with
//!   encodings that read the table so data changes re-evaluate in place.
//!
//! Text shaping and layout are out of scope; text marks store unshaped strings.

#![no_std]

extern crate alloc;

mod axis;
mod bar_mark;
mod color;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod legend;
mod point_mark;
mod rect_mark;
mod rule_mark;
mod scale;
mod symbol;
mod text_mark;
pub mod z_order;

pub use axis::{AxisOrient, AxisSpec, AxisStyle};
pub use bar_mark::BarMarkSpec;
pub use color::{RD_YL_GN, ScaleSequential, interpolate_rd_yl_gn, interpolate_rgb_basis};
pub use format::format_tick_with_step;
pub use legend::{LegendItem, LegendSwatches};
pub use point_mark::PointMarkSpec;
pub use rect_mark::RectMarkSpec;
pub use rule_mark::RuleMarkSpec;
pub use scale::{
    ScaleBand, ScaleBandSpec, ScaleLinear, ScaleLinearSpec, ScaleSpec, infer_domain_f64,
};
pub use symbol::Symbol;
pub use text_mark::TextMarkSpec;
pub use z_order::*;
