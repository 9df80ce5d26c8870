// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar mark generation.

extern crate alloc;

use alloc::vec::Vec;

use peniko::Brush;
use whitehat_core::{ColId, InputRef, Mark, MarkId, TableId};

use crate::scale::{ScaleBand, ScaleLinear};

/// A vertical bar mark derived from a table.
///
/// This generates one [`whitehat_core::MarkKind::Rect`] mark per row key, with bar geometry
/// derived from a numeric value and a baseline. Bars can occupy a slot of the band (for example
/// the left or right half), so several series can share one band scale.
#[derive(Clone, Debug)]
pub struct BarMarkSpec {
    /// Source table id.
    pub table: TableId,
    /// Column for bar values.
    pub y: ColId,
    /// Band scale used for bar positions along x.
    pub band: ScaleBand,
    /// Linear scale used for bar positions along y.
    pub y_scale: ScaleLinear,
    /// Baseline in data units (typically `0.0`).
    pub baseline: f64,
    /// Slot start within the band, as a fraction of the band width.
    pub slot_offset: f64,
    /// Slot width, as a fraction of the band width.
    pub slot_width: f64,
    /// Series index mixed into mark ids, so series over the same rows don't collide.
    pub series: u32,
    /// Fill paint for bars.
    pub fill: Brush,
    /// Rendering order hint (`whitehat_core::Mark::z_index`).
    pub z_index: i32,
}

impl BarMarkSpec {
    /// Creates a full-band bar mark spec with `baseline = 0` and a default fill.
    pub fn new(table: TableId, y: ColId, band: ScaleBand, y_scale: ScaleLinear) -> Self {
        Self {
            table,
            y,
            band,
            y_scale,
            baseline: 0.0,
            slot_offset: 0.0,
            slot_width: 1.0,
            series: 0,
            fill: Brush::default(),
            z_index: crate::z_order::SERIES_FILL,
        }
    }

    /// Sets the baseline in data units.
    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = baseline;
        self
    }

    /// Places bars in a slot of each band, both values as fractions of the band width.
    pub fn with_slot(mut self, offset: f64, width: f64) -> Self {
        self.slot_offset = offset;
        self.slot_width = width.max(0.0);
        self
    }

    /// Sets the series index.
    pub fn with_series(mut self, series: u32) -> Self {
        self.series = series;
        self
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// The mark id generated for `row_key`.
    pub fn mark_id(&self, row_key: u64) -> MarkId {
        MarkId::for_series_row(self.table, self.series, row_key)
    }

    /// Generates marks for the provided row keys.
    ///
    /// Mark identity is derived from `(table_id, series, row_key)` so it stays stable across
    /// frames. Missing or non-finite values draw a zero-height bar at the baseline.
    pub fn marks(&self, row_keys: &[u64]) -> Vec<Mark> {
        let table_id = self.table;
        let y_col = self.y;
        let band = self.band;
        let bw = band.band_width();
        let slot_dx = self.slot_offset * bw;
        let slot_w = self.slot_width * bw;
        let y_scale = self.y_scale;
        let baseline = self.baseline;
        let y0 = y_scale.map(baseline);
        let fill = self.fill.clone();
        let z_index = self.z_index;
        let value = move |v: Option<f64>| v.filter(|v| v.is_finite()).unwrap_or(baseline);

        row_keys
            .iter()
            .copied()
            .enumerate()
            .map(|(row, row_key)| {
                Mark::builder(self.mark_id(row_key))
                    .rect()
                    .z_index(z_index)
                    .x_const(band.x(row) + slot_dx)
                    .y_compute(
                        [InputRef::TableCol {
                            table: table_id,
                            col: y_col,
                        }],
                        move |ctx, _| {
                            let v = value(ctx.table_f64(table_id, row, y_col));
                            y_scale.map(v).min(y0)
                        },
                    )
                    .w_const(slot_w)
                    .h_compute(
                        [InputRef::TableCol {
                            table: table_id,
                            col: y_col,
                        }],
                        move |ctx, _| {
                            let v = value(ctx.table_f64(table_id, row, y_col));
                            (y_scale.map(v) - y0).abs()
                        },
                    )
                    .fill_brush_const(fill.clone())
                    .build()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::boxed::Box;
    use alloc::vec;

    use kurbo::Rect;
    use whitehat_core::{MarkPayload, Scene, TableData};

    use super::*;

    #[derive(Debug)]
    struct Rates(Vec<f64>);

    impl TableData for Rates {
        fn row_count(&self) -> usize {
            self.0.len()
        }

        fn f64(&self, row: usize, _col: ColId) -> Option<f64> {
            self.0.get(row).copied()
        }
    }

    #[test]
    fn half_band_bars_share_a_band_without_overlap() {
        let table = TableId(7);
        let band = ScaleBand::new((0.0, 100.0), 2);
        let y = ScaleLinear::new((0.0, 10.0), (100.0, 0.0));
        let left = BarMarkSpec::new(table, ColId(0), band, y).with_slot(0.0, 0.5);
        let right = BarMarkSpec::new(table, ColId(0), band, y)
            .with_slot(0.5, 0.5)
            .with_series(1);

        let mut scene = Scene::new();
        scene.set_table(table, vec![10, 11], Box::new(Rates(vec![5.0, f64::NAN])));
        let mut marks = left.marks(&[10, 11]);
        marks.extend(right.marks(&[10, 11]));
        assert_eq!(scene.tick(marks).len(), 4);

        let rect = |id| match scene.payload(id) {
            Some(MarkPayload::Rect(r)) => r.rect,
            other => panic!("expected a rect payload, got {other:?}"),
        };
        assert_eq!(rect(left.mark_id(10)), Rect::new(0.0, 50.0, 25.0, 100.0));
        assert_eq!(rect(right.mark_id(10)), Rect::new(25.0, 50.0, 50.0, 100.0));
        // NaN values collapse onto the baseline.
        assert_eq!(rect(left.mark_id(11)).height(), 0.0);
    }
}
