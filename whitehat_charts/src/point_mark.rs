// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point mark generation.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Affine;
use peniko::Brush;
use smallvec::SmallVec;
use whitehat_core::{ColId, InputRef, Mark, MarkId, SignalId, TableId};

use crate::scale::ScaleLinear;
use crate::symbol::Symbol;

/// A proportional-symbol mark derived from a table.
///
/// Positions are read in scene coordinates (already projected). The symbol radius comes from
/// `size_scale` applied to the `size` column. If a transform signal is set, each outline is
/// transformed by the signal's [`Affine`], so symbols pan and zoom with the rest of a view.
#[derive(Clone, Debug)]
pub struct PointMarkSpec {
    /// Source table id.
    pub table: TableId,
    /// Column for x positions.
    pub x: ColId,
    /// Column for y positions.
    pub y: ColId,
    /// Column for the sized value.
    pub size: ColId,
    /// Maps the sized value to a radius.
    pub size_scale: ScaleLinear,
    /// The glyph shape.
    pub symbol: Symbol,
    /// Fill paint.
    pub fill: Brush,
    /// Group opacity.
    pub opacity: f64,
    /// Optional `Affine` signal applied to every outline.
    pub transform: Option<SignalId>,
    /// Rendering order hint (`whitehat_core::Mark::z_index`).
    pub z_index: i32,
}

impl PointMarkSpec {
    /// Creates a circle mark spec with an opaque default fill.
    pub fn new(
        table: TableId,
        x: ColId,
        y: ColId,
        size: ColId,
        size_scale: ScaleLinear,
    ) -> Self {
        Self {
            table,
            x,
            y,
            size,
            size_scale,
            symbol: Symbol::Circle,
            fill: Brush::default(),
            opacity: 1.0,
            transform: None,
            z_index: crate::z_order::SERIES_POINTS,
        }
    }

    /// Sets the fill paint.
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Sets the group opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Sets the symbol shape.
    pub fn with_symbol(mut self, symbol: Symbol) -> Self {
        self.symbol = symbol;
        self
    }

    /// Transforms every outline by the `Affine` held in `signal`.
    pub fn with_transform_signal(mut self, signal: SignalId) -> Self {
        self.transform = Some(signal);
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// The untransformed radius for a sized value.
    pub fn radius(&self, value: f64) -> f64 {
        self.size_scale.map(value).max(0.0)
    }

    /// Generates marks for the provided row keys.
    ///
    /// Mark identity is derived from `(table_id, row_key)` so it stays stable across frames.
    pub fn marks(&self, row_keys: &[u64]) -> Vec<Mark> {
        let table_id = self.table;
        let (x_col, y_col, size_col) = (self.x, self.y, self.size);
        let size_scale = self.size_scale;
        let symbol = self.symbol;
        let transform = self.transform;
        let fill = self.fill.clone();
        let opacity = self.opacity;
        let z_index = self.z_index;

        let mut inputs: SmallVec<[InputRef; 4]> = [x_col, y_col, size_col]
            .into_iter()
            .map(|col| InputRef::TableCol {
                table: table_id,
                col,
            })
            .collect();
        if let Some(signal) = transform {
            inputs.push(InputRef::Signal { signal });
        }

        row_keys
            .iter()
            .copied()
            .enumerate()
            .map(|(row, row_key)| {
                Mark::builder(MarkId::for_row(table_id, row_key))
                    .path()
                    .z_index(z_index)
                    .path_compute(inputs.iter().copied(), move |ctx, _| {
                        let cx = ctx.table_f64(table_id, row, x_col).unwrap_or(0.0);
                        let cy = ctx.table_f64(table_id, row, y_col).unwrap_or(0.0);
                        let v = ctx.table_f64(table_id, row, size_col).unwrap_or(0.0);
                        let r = size_scale.map(v).max(0.0);
                        let mut path = symbol.path(cx, cy, 2.0 * r);
                        if let Some(signal) = transform {
                            let affine = ctx.signal::<Affine>(signal);
                            path.apply_affine(affine.unwrap_or(Affine::IDENTITY));
                        }
                        path
                    })
                    .fill_brush_const(fill.clone())
                    .opacity_const(opacity)
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

    use whitehat_core::{MarkPayload, Scene, TableData};

    use super::*;

    #[derive(Debug)]
    struct Cities {
        x: Vec<f64>,
        y: Vec<f64>,
        count: Vec<f64>,
    }

    impl TableData for Cities {
        fn row_count(&self) -> usize {
            self.x.len()
        }

        fn f64(&self, row: usize, col: ColId) -> Option<f64> {
            match col.0 {
                0 => self.x.get(row).copied(),
                1 => self.y.get(row).copied(),
                2 => self.count.get(row).copied(),
                _ => None,
            }
        }
    }

    #[test]
    fn circles_scale_with_value_and_follow_transform() {
        let table = TableId(3);
        let zoom = SignalId(9);
        let spec = PointMarkSpec::new(
            table,
            ColId(0),
            ColId(1),
            ColId(2),
            ScaleLinear::new((0.0, 100.0), (1.5, 10.0)),
        )
        .with_opacity(0.4)
        .with_transform_signal(zoom);

        let mut scene = Scene::new();
        scene.insert_signal(zoom, Affine::IDENTITY);
        scene.set_table(
            table,
            vec![1],
            Box::new(Cities {
                x: vec![50.0],
                y: vec![60.0],
                count: vec![100.0],
            }),
        );
        scene.tick(spec.marks(&[1]));
        let id = MarkId::for_row(table, 1);
        let b = scene.payload(id).and_then(MarkPayload::bounds).unwrap();
        // Flattened outlines are within the symbol tolerance of the true circle.
        assert!((b.width() - 20.0).abs() < 0.25);
        assert_eq!(scene.payload(id).map(|p| p.paint().opacity), Some(0.4));

        scene.set_signal(zoom, Affine::scale(2.0)).unwrap();
        assert_eq!(scene.update().len(), 1);
        let b = scene.payload(id).and_then(MarkPayload::bounds).unwrap();
        assert!((b.center().x - 100.0).abs() < 0.25);
        assert!((b.width() - 40.0).abs() < 0.5);
    }
}
