// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tiny scale utilities.
//!
//! These types provide the coordinate mapping behavior the views need: a linear scale with a
//! "nice" domain policy and a band scale with d3-style padding semantics.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use whitehat_core::{ColId, TableData};

/// A scale specification (domain + options, no range yet).
#[derive(Clone, Copy, Debug)]
pub enum ScaleSpec {
    /// Continuous linear scale.
    Linear(ScaleLinearSpec),
    /// Discrete band scale.
    Band(ScaleBandSpec),
}

impl From<ScaleLinearSpec> for ScaleSpec {
    fn from(value: ScaleLinearSpec) -> Self {
        Self::Linear(value)
    }
}

impl From<ScaleBandSpec> for ScaleSpec {
    fn from(value: ScaleBandSpec) -> Self {
        Self::Band(value)
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

/// Specification for a linear scale (domain + options, no range yet).
#[derive(Clone, Copy, Debug)]
pub struct ScaleLinearSpec {
    /// Domain in data units.
    pub domain: (f64, f64),
    /// Whether to "nice" the domain based on tick generation.
    pub nice: bool,
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    ///
    /// A degenerate domain maps everything to the middle of the range.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return (r0 + r1) / 2.0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a value from range space back into domain space.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        let t = (y - r0) / denom;
        d0 + t * (d1 - d0)
    }

    /// Returns the minimum of the configured domain (as authored).
    pub fn domain_min(&self) -> f64 {
        self.domain.0
    }

    /// Returns the maximum of the configured domain (as authored).
    pub fn domain_max(&self) -> f64 {
        self.domain.1
    }

    /// Returns the configured range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns “nice-ish” tick values for the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

impl ScaleLinearSpec {
    /// Creates a new linear scale spec.
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            domain,
            nice: false,
        }
    }

    /// Enables or disables nice-domain behavior.
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// Returns the effective domain after applying `nice` (if enabled).
    ///
    /// The niced domain always contains the authored one.
    pub fn resolved_domain(&self, tick_count: usize) -> (f64, f64) {
        if !self.nice {
            return self.domain;
        }
        let (lo, hi) = self.domain;
        if tick_count == 0 || !lo.is_finite() || !hi.is_finite() || lo == hi {
            return self.domain;
        }
        nice_domain(lo, hi, tick_count)
    }

    /// Instantiates a concrete scale for a given output range.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleLinear {
        ScaleLinear::new(self.domain, range)
    }

    /// Instantiates a concrete scale using the `resolved_domain` (respecting `nice`).
    pub fn instantiate_resolved(&self, range: (f64, f64), tick_count: usize) -> ScaleLinear {
        ScaleLinear::new(self.resolved_domain(tick_count), range)
    }
}

fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let inc = tick_increment(min, max, count);
    if inc == 0.0 || !inc.is_finite() {
        return alloc::vec![min, max];
    }
    // Negative increments are inverted steps, which keeps fractional ticks exact.
    let (i0, i1) = if inc > 0.0 {
        ((min / inc).ceil(), (max / inc).floor())
    } else {
        ((min * -inc).ceil(), (max * -inc).floor())
    };
    let n_f = (i1 - i0).min(10_000.0);
    if n_f.is_nan() || n_f < 0.0 {
        return Vec::new();
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "guarded by the non-negative check and capped at 10k"
    )]
    let n = n_f as u64;
    (0..=n)
        .map(|i| {
            let k = i0 + i as f64;
            if inc > 0.0 { k * inc } else { k / -inc }
        })
        .collect()
}

/// Extends `(min, max)` outward to multiples of the tick increment, repeating until the
/// increment settles. Returns the input unchanged if it never settles.
fn nice_domain(min: f64, max: f64, count: usize) -> (f64, f64) {
    let (mut start, mut stop) = if min <= max { (min, max) } else { (max, min) };
    let mut prestep = 0.0;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if step == prestep {
            return if min <= max { (start, stop) } else { (stop, start) };
        }
        if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        prestep = step;
    }
    (min, max)
}

const SQRT_50: f64 = 7.0710678118654755;
const SQRT_10: f64 = 3.1622776601683795;

/// The tick spacing for `count` ticks over `[start, stop]`: a power of ten times 1, 2 or 5.
///
/// Spacings below one come back negated and inverted (`-10` for `0.1`).
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10_f64.powf(power);
    let factor = if error >= SQRT_50 {
        10.0
    } else if error >= SQRT_10 {
        5.0
    } else if error >= core::f64::consts::SQRT_2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10_f64.powf(power)
    } else {
        -10_f64.powf(-power) / factor
    }
}

/// A discrete band scale for categorical charts.
///
/// Padding follows d3: both paddings are fractions of the step, and leftover space is split
/// evenly on both sides (`align = 0.5`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBand {
    range: (f64, f64),
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
}

/// Specification for a band scale (count + padding, no range yet).
#[derive(Clone, Copy, Debug)]
pub struct ScaleBandSpec {
    /// Number of bands.
    pub count: usize,
    /// Inner padding as a fraction of the step, in `[0, 1]`.
    pub padding_inner: f64,
    /// Outer padding as a fraction of the step.
    pub padding_outer: f64,
}

impl ScaleBand {
    /// Creates a new band scale covering `count` bands over `range`, without padding.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range,
            count,
            padding_inner: 0.0,
            padding_outer: 0.0,
        }
    }

    /// Sets inner and outer padding as fractions of the step.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Returns the distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        let span = (r1 - r0).abs();
        span / (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0)
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the start position of the band at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        let step = self.step();
        let lo = r0.min(r1);
        let span = (r1 - r0).abs();
        let start = lo + (span - step * (n - self.padding_inner)) * 0.5;
        let slot = if r1 >= r0 {
            index
        } else {
            self.count.saturating_sub(index + 1)
        };
        start + step * slot as f64
    }

    /// Returns the center position of the band at `index`.
    pub fn center(&self, index: usize) -> f64 {
        self.x(index) + 0.5 * self.band_width()
    }
}

impl ScaleBandSpec {
    /// Creates a new band scale spec without padding.
    pub fn new(count: usize) -> Self {
        Self {
            count,
            padding_inner: 0.0,
            padding_outer: 0.0,
        }
    }

    /// Sets inner and outer padding to the same fraction (d3's `band.padding`).
    pub fn with_uniform_padding(self, padding: f64) -> Self {
        self.with_padding(padding, padding)
    }

    /// Sets inner and outer padding as fractions of the step.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.clamp(0.0, 1.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Instantiates a concrete scale for a given output range.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleBand {
        ScaleBand::new(range, self.count).with_padding(self.padding_inner, self.padding_outer)
    }
}

/// Infer a `(min, max)` domain for a numeric column.
///
/// Non-finite values are ignored. Returns `None` if no finite values are present.
pub fn infer_domain_f64(data: &dyn TableData, col: ColId) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let n = data.row_count();
    for row in 0..n {
        let Some(v) = data.f64(row, col) else {
            continue;
        };
        if !v.is_finite() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    #[derive(Debug)]
    struct Values(Vec<f64>);

    impl TableData for Values {
        fn row_count(&self) -> usize {
            self.0.len()
        }

        fn f64(&self, row: usize, _col: ColId) -> Option<f64> {
            self.0.get(row).copied()
        }
    }

    #[test]
    fn band_scale_matches_d3_padding() {
        let band = ScaleBandSpec::new(3)
            .with_uniform_padding(0.2)
            .instantiate((0.0, 100.0));
        assert!((band.step() - 31.25).abs() < 1e-9);
        assert!((band.band_width() - 25.0).abs() < 1e-9);
        assert!((band.x(0) - 6.25).abs() < 1e-9);
        assert!((band.x(2) - 68.75).abs() < 1e-9);
        // Outer gaps are equal.
        let right_gap = 100.0 - (band.x(2) + band.band_width());
        assert!((right_gap - band.x(0)).abs() < 1e-9);
    }

    #[test]
    fn reversed_band_range_reverses_order() {
        let band = ScaleBand::new((100.0, 0.0), 4);
        assert!(band.x(0) > band.x(3));
        assert!((band.x(3) - 0.0).abs() < 1e-9);
    }

    #[test]
    fn nice_domain_contains_authored_domain() {
        let spec = ScaleLinearSpec::new((0.0, 9.3)).with_nice(true);
        assert_eq!(spec.resolved_domain(10), (0.0, 10.0));

        let spec = ScaleLinearSpec::new((0.0, 27.4)).with_nice(true);
        let (lo, hi) = spec.resolved_domain(10);
        assert_eq!(lo, 0.0);
        assert!(hi >= 27.4);
    }

    #[test]
    fn nice_uses_sqrt_thresholds_and_settles() {
        // 1.45 per tick rounds up to 2, so 14.5 extends to 16 rather than 15.
        let spec = ScaleLinearSpec::new((0.0, 14.5)).with_nice(true);
        assert_eq!(spec.resolved_domain(10), (0.0, 16.0));

        let spec = ScaleLinearSpec::new((0.0, 0.93)).with_nice(true);
        assert_eq!(spec.resolved_domain(10), (0.0, 1.0));

        let ticks = ScaleLinear::new((0.0, 1.0), (0.0, 1.0)).ticks(10);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[3], 0.3);
    }

    #[test]
    fn degenerate_domain_maps_to_range_middle() {
        let s = ScaleLinear::new((10.0, 10.0), (1.0, 0.0));
        assert_eq!(s.map(10.0), 0.5);
        assert_eq!(s.map(3.0), 0.5);
    }

    #[test]
    fn linear_map_and_invert_round_trip_endpoints() {
        let s = ScaleLinear::new((0.0, 10.0), (450.0, 50.0));
        assert_eq!(s.map(0.0), 450.0);
        assert_eq!(s.map(10.0), 50.0);
        assert!((s.invert(250.0) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn infer_domain_skips_non_finite_values() {
        let data = Values(vec![3.0, f64::INFINITY, -1.0, f64::NAN, 7.5]);
        assert_eq!(infer_domain_f64(&data, ColId(0)), Some((-1.0, 7.5)));
        assert_eq!(infer_domain_f64(&Values(vec![f64::NAN]), ColId(0)), None);
    }
}
