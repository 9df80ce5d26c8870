// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend mark generation.
//!
//! A minimal "swatches + labels" legend: one column of color swatches, each optionally
//! labeled to its right.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use peniko::{Brush, Color};
use whitehat_core::{Mark, MarkId, TextAnchor, TextBaseline};

use crate::rect_mark::RectMarkSpec;
use crate::z_order;

/// A legend row.
#[derive(Clone, Debug)]
pub struct LegendItem {
    /// The label shown next to the swatch; empty labels emit no text mark.
    pub label: String,
    /// The swatch fill paint.
    pub fill: Brush,
}

impl LegendItem {
    /// Convenience constructor for a solid-color swatch.
    pub fn solid(label: impl Into<String>, color: Color) -> Self {
        Self {
            label: label.into(),
            fill: Brush::Solid(color),
        }
    }

    /// A swatch without a label.
    pub fn swatch(color: Color) -> Self {
        Self::solid(String::new(), color)
    }
}

/// A vertical column of color swatches with optional labels.
#[derive(Clone, Debug)]
pub struct LegendSwatches {
    /// Stable-id base; each generated mark uses a deterministic offset from this base.
    pub id_base: u64,
    /// Legend origin (top-left of the first swatch).
    pub x: f64,
    /// Legend origin (top-left of the first swatch).
    pub y: f64,
    /// Swatch width.
    pub swatch_width: f64,
    /// Swatch height.
    pub swatch_height: f64,
    /// Distance between the tops of consecutive swatches.
    pub row_step: f64,
    /// Horizontal gap between swatch and label.
    pub label_dx: f64,
    /// Label font size.
    pub font_size: f64,
    /// Label color.
    pub text_fill: Brush,
    /// Items in display order, top to bottom.
    pub items: Vec<LegendItem>,
}

impl LegendSwatches {
    /// Creates a legend with square 10px swatches stacked without gaps.
    pub fn new(id_base: u64, x: f64, y: f64, items: Vec<LegendItem>) -> Self {
        Self {
            id_base,
            x,
            y,
            swatch_width: 10.0,
            swatch_height: 10.0,
            row_step: 10.0,
            label_dx: 6.0,
            font_size: 10.0,
            text_fill: Brush::Solid(Color::BLACK),
            items,
        }
    }

    /// Sets the swatch size.
    pub fn with_swatch_size(mut self, width: f64, height: f64) -> Self {
        self.swatch_width = width;
        self.swatch_height = height;
        self
    }

    /// Sets the distance between the tops of consecutive swatches.
    pub fn with_row_step(mut self, row_step: f64) -> Self {
        self.row_step = row_step;
        self
    }

    /// Set the label font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// The top edge of the row at `index`.
    pub fn row_y(&self, index: usize) -> f64 {
        self.y + index as f64 * self.row_step
    }

    /// The y just past the last row; the next row would start here.
    pub fn end_y(&self) -> f64 {
        self.row_y(self.items.len())
    }

    /// Generate legend marks (swatch rect, plus a label text for labeled items).
    pub fn marks(&self) -> Vec<Mark> {
        let mut out = Vec::new();
        for (i, item) in self.items.iter().enumerate() {
            let y = self.row_y(i);
            out.push(
                RectMarkSpec::new(
                    MarkId::from_raw(self.id_base + i as u64),
                    Rect::new(self.x, y, self.x + self.swatch_width, y + self.swatch_height),
                )
                .with_fill(item.fill.clone())
                .with_z_index(z_order::LEGEND_SWATCHES)
                .mark(),
            );

            if item.label.is_empty() {
                continue;
            }
            out.push(
                Mark::builder(MarkId::from_raw(self.id_base + 1000 + i as u64))
                    .text()
                    .z_index(z_order::LEGEND_LABELS)
                    .x_const(self.x + self.swatch_width + self.label_dx)
                    .y_const(y + self.swatch_height * 0.5)
                    .text_const(item.label.clone())
                    .font_size_const(self.font_size)
                    .fill_brush_const(self.text_fill.clone())
                    .text_anchor(TextAnchor::Start)
                    .text_baseline(TextBaseline::Middle)
                    .build(),
            );
        }
        out
    }

    /// Bounds of the swatch column.
    pub fn swatch_bounds(&self) -> Rect {
        let last = self.items.len().saturating_sub(1);
        Rect::new(
            self.x,
            self.y,
            self.x + self.swatch_width,
            self.row_y(last) + self.swatch_height,
        )
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use peniko::color::palette::css;
    use whitehat_core::MarkKind;

    use super::*;

    #[test]
    fn swatches_stack_by_row_step_and_skip_empty_labels() {
        let legend = LegendSwatches::new(
            500,
            10.0,
            20.0,
            vec![
                LegendItem::swatch(css::RED),
                LegendItem::solid("high", css::GREEN),
                LegendItem::swatch(css::BLUE),
            ],
        )
        .with_swatch_size(20.0, 30.0)
        .with_row_step(30.0);

        let marks = legend.marks();
        assert_eq!(marks.iter().filter(|m| m.kind == MarkKind::Rect).count(), 3);
        assert_eq!(marks.iter().filter(|m| m.kind == MarkKind::Text).count(), 1);
        assert_eq!(legend.row_y(2), 80.0);
        assert_eq!(legend.end_y(), 110.0);
        assert_eq!(legend.swatch_bounds(), Rect::new(10.0, 20.0, 30.0, 110.0));
    }
}
