// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Symbol helpers for point-like marks.

use kurbo::{BezPath, Circle, Rect, Shape};

/// Curve flattening tolerance for symbol outlines, in scene units.
const TOLERANCE: f64 = 0.1;

/// A small set of symbol shapes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A circle.
    #[default]
    Circle,
    /// A square (axis-aligned).
    Square,
}

impl Symbol {
    /// Returns a path for this symbol centered at `cx, cy`, using `size` as the diameter/side.
    pub fn path(self, cx: f64, cy: f64, size: f64) -> BezPath {
        let half = size.max(0.0) * 0.5;
        match self {
            Self::Circle => Circle::new((cx, cy), half).to_path(TOLERANCE),
            Self::Square => {
                Rect::new(cx - half, cy - half, cx + half, cy + half).to_path(TOLERANCE)
            }
        }
    }

    /// Returns whether `(px, py)` lies inside the symbol centered at `cx, cy`.
    pub fn contains(self, cx: f64, cy: f64, size: f64, px: f64, py: f64) -> bool {
        let half = size.max(0.0) * 0.5;
        let (dx, dy) = (px - cx, py - cy);
        match self {
            Self::Circle => dx * dx + dy * dy <= half * half,
            Self::Square => dx.abs() <= half && dy.abs() <= half,
        }
    }
}
