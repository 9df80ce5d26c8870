// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis mark generation.
//!
//! Axes follow d3's defaults: an outer-ticked domain path, 6px ticks, 3px label padding and
//! 10px labels. A single [`AxisSpec`] covers both supported orientations.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use kurbo::{BezPath, Rect};
use peniko::{Brush, Color};
use whitehat_core::{Mark, MarkId, TextAnchor, TextBaseline};

use crate::format::format_tick_with_step;
use crate::rule_mark::RuleMarkSpec;
use crate::scale::{ScaleBand, ScaleLinear, ScaleSpec};
use crate::z_order;

/// Axis styling.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisStyle {
    /// Paint for the domain path and tick marks.
    pub rule: Brush,
    /// Width of the domain path and tick marks.
    pub rule_width: f64,
    /// Fill paint for tick labels.
    pub label_fill: Brush,
    /// Font size for tick labels.
    pub label_font_size: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            rule: Brush::Solid(Color::BLACK),
            rule_width: 1.0,
            label_fill: Brush::Solid(Color::BLACK),
            label_font_size: 10.0,
        }
    }
}

/// Axis orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A horizontal axis along the bottom edge of the plot.
    Bottom,
    /// A vertical axis along the left edge of the plot.
    Left,
}

/// An axis specification.
#[derive(Clone)]
pub struct AxisSpec {
    /// Stable-id base; each generated mark uses a deterministic offset from this base.
    pub id_base: u64,
    /// The axis scale specification.
    pub scale: ScaleSpec,
    /// Axis placement relative to the plot.
    pub orient: AxisOrient,
    /// Approximate number of ticks for continuous scales.
    pub tick_count: usize,
    /// Tick length, also used for the outer ticks of the domain path.
    pub tick_size: f64,
    /// Gap between tick end and label.
    pub tick_padding: f64,
    /// Styling.
    pub style: AxisStyle,
    /// Optional tick label formatter, called with the tick value (the band index for band
    /// scales) and the tick step.
    pub tick_formatter: Option<Arc<dyn Fn(f64, f64) -> String>>,
}

impl core::fmt::Debug for AxisSpec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AxisSpec")
            .field("id_base", &self.id_base)
            .field("scale", &self.scale)
            .field("orient", &self.orient)
            .field("tick_count", &self.tick_count)
            .field("tick_size", &self.tick_size)
            .field("tick_padding", &self.tick_padding)
            .field("style", &self.style)
            .field("tick_formatter", &self.tick_formatter.is_some())
            .finish()
    }
}

impl AxisSpec {
    /// Creates a new axis specification with d3's defaults.
    pub fn new(id_base: u64, scale: impl Into<ScaleSpec>, orient: AxisOrient) -> Self {
        Self {
            id_base,
            scale: scale.into(),
            orient,
            tick_count: 10,
            tick_size: 6.0,
            tick_padding: 3.0,
            style: AxisStyle::default(),
            tick_formatter: None,
        }
    }

    /// Convenience constructor for a `bottom` axis.
    pub fn bottom(id_base: u64, scale: impl Into<ScaleSpec>) -> Self {
        Self::new(id_base, scale, AxisOrient::Bottom)
    }

    /// Convenience constructor for a `left` axis.
    pub fn left(id_base: u64, scale: impl Into<ScaleSpec>) -> Self {
        Self::new(id_base, scale, AxisOrient::Left)
    }

    /// Set the approximate tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    /// Set the tick size.
    pub fn with_tick_size(mut self, tick_size: f64) -> Self {
        self.tick_size = tick_size;
        self
    }

    /// Set the styling.
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    /// Set a custom tick formatter.
    pub fn with_tick_formatter(mut self, f: impl Fn(f64, f64) -> String + 'static) -> Self {
        self.tick_formatter = Some(Arc::new(f));
        self
    }

    /// Label band `i` with `labels[i]`; missing labels are empty.
    pub fn with_band_labels(self, labels: Vec<String>) -> Self {
        self.with_tick_formatter(move |v, _| {
            labels
                .get(discrete_index(v))
                .cloned()
                .unwrap_or_default()
        })
    }

    fn range(&self, plot: Rect) -> (f64, f64) {
        match self.orient {
            AxisOrient::Bottom => (plot.x0, plot.x1),
            AxisOrient::Left => (plot.y1, plot.y0),
        }
    }

    /// Returns the linear scale this axis draws for `plot`, or `None` for band axes.
    pub fn scale_linear(&self, plot: Rect) -> Option<ScaleLinear> {
        match self.scale {
            ScaleSpec::Linear(s) => Some(s.instantiate_resolved(self.range(plot), self.tick_count)),
            ScaleSpec::Band(_) => None,
        }
    }

    /// Returns the band scale this axis draws for `plot`, or `None` for linear axes.
    pub fn scale_band(&self, plot: Rect) -> Option<ScaleBand> {
        match self.scale {
            ScaleSpec::Band(s) => Some(s.instantiate(self.range(plot))),
            ScaleSpec::Linear(_) => None,
        }
    }

    /// Returns `(value, position)` pairs for every tick, plus the tick step.
    fn ticks(&self, plot: Rect) -> (Vec<(f64, f64)>, f64) {
        match self.scale {
            ScaleSpec::Linear(s) => {
                let scale = s.instantiate_resolved(self.range(plot), self.tick_count);
                let values = scale.ticks(self.tick_count);
                let step = tick_step(&values);
                (values.into_iter().map(|v| (v, scale.map(v))).collect(), step)
            }
            ScaleSpec::Band(s) => {
                let band = s.instantiate(self.range(plot));
                let ticks = (0..s.count).map(|i| (i as f64, band.center(i))).collect();
                (ticks, 1.0)
            }
        }
    }

    fn format_tick(&self, v: f64, step: f64) -> String {
        match &self.tick_formatter {
            Some(f) => (f)(v, step),
            None => format_tick_with_step(v, step),
        }
    }

    /// Generate axis marks along the matching edge of `plot`.
    pub fn marks(&self, plot: Rect) -> Vec<Mark> {
        let (r0, r1) = self.range(plot);
        let size = self.tick_size;
        let mut out = Vec::new();

        let mut domain = BezPath::new();
        match self.orient {
            AxisOrient::Bottom => {
                let y = plot.y1;
                domain.move_to((r0, y + size));
                domain.line_to((r0, y));
                domain.line_to((r1, y));
                domain.line_to((r1, y + size));
            }
            AxisOrient::Left => {
                let x = plot.x0;
                domain.move_to((x - size, r0));
                domain.line_to((x, r0));
                domain.line_to((x, r1));
                domain.line_to((x - size, r1));
            }
        }
        out.push(
            Mark::builder(MarkId::from_raw(self.id_base))
                .path()
                .z_index(z_order::AXIS_RULES)
                .path_const(domain)
                .fill_const(Color::TRANSPARENT)
                .stroke_brush_const(self.style.rule.clone())
                .stroke_width_const(self.style.rule_width)
                .build(),
        );

        let (ticks, step) = self.ticks(plot);
        let label_offset = size.max(0.0) + self.tick_padding;
        for (i, (value, pos)) in ticks.into_iter().enumerate() {
            let tick_id = MarkId::from_raw(self.id_base + 1 + i as u64);
            let label_id = MarkId::from_raw(self.id_base + 1000 + i as u64);
            let label = self.format_tick(value, step);
            let (tick, text) = match self.orient {
                AxisOrient::Bottom => {
                    let y = plot.y1;
                    (
                        RuleMarkSpec::vertical(tick_id, pos, y, y + size),
                        Mark::builder(label_id)
                            .text()
                            .x_const(pos)
                            .y_const(y + label_offset)
                            .text_anchor_middle()
                            .text_baseline(TextBaseline::Hanging),
                    )
                }
                AxisOrient::Left => {
                    let x = plot.x0;
                    (
                        RuleMarkSpec::horizontal(tick_id, pos, x - size, x),
                        Mark::builder(label_id)
                            .text()
                            .x_const(x - label_offset)
                            .y_const(pos)
                            .text_anchor(TextAnchor::End)
                            .text_baseline(TextBaseline::Middle),
                    )
                }
            };
            out.push(
                tick.with_stroke(self.style.rule.clone(), self.style.rule_width)
                    .with_z_index(z_order::AXIS_RULES)
                    .mark(),
            );
            out.push(
                text.z_index(z_order::AXIS_LABELS)
                    .text_const(label)
                    .font_size_const(self.style.label_font_size)
                    .fill_brush_const(self.style.label_fill.clone())
                    .build(),
            );
        }
        out
    }
}

fn tick_step(ticks: &[f64]) -> f64 {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(f64::INFINITY, f64::min);
    if step.is_finite() { step } else { 0.0 }
}

fn discrete_index(v: f64) -> usize {
    if !v.is_finite() || v < 0.0 {
        return 0;
    }
    let v = (v + 0.5).min(1_000_000.0);
    #[allow(
        clippy::cast_possible_truncation,
        reason = "value is clamped to a small non-negative range"
    )]
    {
        v as usize
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;
    use alloc::vec;

    use whitehat_core::{Encoding, MarkEncodings, MarkKind};

    use super::*;
    use crate::scale::{ScaleBandSpec, ScaleLinearSpec};

    fn labels(marks: &[Mark]) -> Vec<(f64, f64, String)> {
        marks
            .iter()
            .filter(|m| m.kind == MarkKind::Text)
            .filter_map(|m| {
                let MarkEncodings::Text(t) = &m.encodings else {
                    return None;
                };
                match (&t.x, &t.y, &t.text) {
                    (Encoding::Const(x), Encoding::Const(y), Encoding::Const(s)) => {
                        Some((*x, *y, s.clone()))
                    }
                    _ => None,
                }
            })
            .collect()
    }

    #[test]
    fn band_axis_labels_sit_under_band_centers() {
        let plot = Rect::new(50.0, 50.0, 149.0, 250.0);
        let spec = ScaleBandSpec::new(2).with_uniform_padding(0.2);
        let axis = AxisSpec::bottom(100, spec)
            .with_band_labels(vec!["AL".to_string(), "AK".to_string()]);
        let band = axis.scale_band(plot).unwrap();
        let found = labels(&axis.marks(plot));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].2, "AL");
        assert_eq!(found[1].2, "AK");
        assert!((found[0].0 - band.center(0)).abs() < 1e-9);
        assert!((found[0].1 - 259.0).abs() < 1e-9);
    }

    #[test]
    fn linear_axis_labels_cover_nice_domain() {
        let plot = Rect::new(50.0, 50.0, 400.0, 450.0);
        let axis = AxisSpec::left(200, ScaleLinearSpec::new((0.0, 9.3)).with_nice(true));
        let found = labels(&axis.marks(plot));
        let first = found.first().unwrap();
        let last = found.last().unwrap();
        assert_eq!(first.2, "0");
        assert_eq!(last.2, "10");
        assert!((first.1 - 450.0).abs() < 1e-9);
        assert!((last.1 - 50.0).abs() < 1e-9);
        // Labels are right-aligned left of the ticks.
        assert!(found.iter().all(|(x, _, _)| (*x - 41.0).abs() < 1e-9));
    }

    #[test]
    fn axis_ids_are_unique() {
        let plot = Rect::new(0.0, 0.0, 100.0, 100.0);
        let marks = AxisSpec::left(1, ScaleLinearSpec::new((0.0, 1.0))).marks(plot);
        let mut ids: Vec<u64> = marks.iter().map(|m| m.id.0).collect();
        let n = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), n);
    }
}
