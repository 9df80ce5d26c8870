// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sequential color scales.
//!
//! The ramp is d3's `interpolateRdYlGn`: a uniform RGB B-spline through the eleven-class
//! `RdYlGn` ColorBrewer scheme, from red (`t = 0`) through yellow to green (`t = 1`).

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use peniko::Color;

/// The eleven-class `RdYlGn` scheme, red to green.
pub const RD_YL_GN: [[u8; 3]; 11] = [
    [0xa5, 0x00, 0x26],
    [0xd7, 0x30, 0x27],
    [0xf4, 0x6d, 0x43],
    [0xfd, 0xae, 0x61],
    [0xfe, 0xe0, 0x8b],
    [0xff, 0xff, 0xbf],
    [0xd9, 0xef, 0x8b],
    [0xa6, 0xd9, 0x6a],
    [0x66, 0xbd, 0x63],
    [0x1a, 0x98, 0x50],
    [0x00, 0x68, 0x37],
];

/// Samples the `RdYlGn` ramp. `t` is clamped to `[0, 1]`; NaN samples the red end.
pub fn interpolate_rd_yl_gn(t: f64) -> Color {
    interpolate_rgb_basis(&RD_YL_GN, t)
}

/// Samples a uniform cubic B-spline through `colors`, per RGB channel.
///
/// The spline passes through the first and last colors exactly.
pub fn interpolate_rgb_basis(colors: &[[u8; 3]], t: f64) -> Color {
    match colors {
        [] => return Color::BLACK,
        [[r, g, b]] => return Color::from_rgb8(*r, *g, *b),
        _ => {}
    }
    let n = colors.len() - 1;
    let t = if t.is_nan() { 0.0 } else { t };
    let (i, t) = if t <= 0.0 {
        (0, 0.0)
    } else if t >= 1.0 {
        (n - 1, 1.0)
    } else {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "t is in (0, 1), so the index is below the color count"
        )]
        let i = (t * n as f64).floor() as usize;
        (i.min(n - 1), t)
    };
    let local = (t - i as f64 / n as f64) * n as f64;
    let channel = |c: usize| {
        let v1 = f64::from(colors[i][c]);
        let v2 = f64::from(colors[i + 1][c]);
        let v0 = if i > 0 {
            f64::from(colors[i - 1][c])
        } else {
            2.0 * v1 - v2
        };
        let v3 = if i < n - 1 {
            f64::from(colors[i + 2][c])
        } else {
            2.0 * v2 - v1
        };
        to_u8(basis(local, v0, v1, v2, v3))
    };
    Color::from_rgb8(channel(0), channel(1), channel(2))
}

fn basis(t1: f64, v0: f64, v1: f64, v2: f64, v3: f64) -> f64 {
    let t2 = t1 * t1;
    let t3 = t2 * t1;
    ((1.0 - 3.0 * t1 + 3.0 * t2 - t3) * v0
        + (4.0 - 6.0 * t2 + 3.0 * t3) * v1
        + (1.0 + 3.0 * t1 + 3.0 * t2 - 3.0 * t3) * v2
        + t3 * v3)
        / 6.0
}

fn to_u8(v: f64) -> u8 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "rounded and clamped to the u8 range"
    )]
    {
        v.round().clamp(0.0, 255.0) as u8
    }
}

/// A sequential scale: a linear domain mapped onto `[0, 1]` and fed to an interpolator.
///
/// Like d3's `scaleSequential`, the scale itself does not clamp; the interpolator does.
#[derive(Clone, Copy, Debug)]
pub struct ScaleSequential {
    domain: (f64, f64),
    interpolator: fn(f64) -> Color,
}

impl ScaleSequential {
    /// Creates a sequential scale.
    pub fn new(domain: (f64, f64), interpolator: fn(f64) -> Color) -> Self {
        Self {
            domain,
            interpolator,
        }
    }

    /// A sequential `RdYlGn` scale over `domain`.
    pub fn rd_yl_gn(domain: (f64, f64)) -> Self {
        Self::new(domain, interpolate_rd_yl_gn)
    }

    /// Returns the normalized position of `v` in the domain.
    ///
    /// A degenerate domain maps everything to the middle, `0.5`.
    pub fn normalize(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        if d1 == d0 {
            return 0.5;
        }
        (v - d0) / (d1 - d0)
    }

    /// Maps a value to a color.
    pub fn map(&self, v: f64) -> Color {
        (self.interpolator)(self.normalize(v))
    }
}
