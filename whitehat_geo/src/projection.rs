// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conic equal-area and Albers USA projections.
//!
//! Both follow d3-geo: input longitude is rotated, projected with the raw conic formula, then
//! scaled about the projected center and translated, with y pointing down.

use std::f64::consts::PI;

use kurbo::{Point, Rect};

use crate::clip::clip_ring;

/// Projects geographic coordinates (degrees) into screen space.
pub trait Projection {
    /// Projects a point, or returns `None` if it has no drawable position.
    fn project(&self, lon: f64, lat: f64) -> Option<Point>;

    /// Projects a closed ring, returning the screen-space rings it produces (possibly none).
    fn project_ring(&self, ring: &[(f64, f64)]) -> Vec<Vec<Point>>;
}

/// Albers conic equal-area projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConicEqualArea {
    parallels: (f64, f64),
    rotate: f64,
    center: (f64, f64),
    scale: f64,
    translate: Point,
    clip_extent: Option<Rect>,
    // Derived from `parallels`.
    n: f64,
    c: f64,
    r0: f64,
}

impl ConicEqualArea {
    /// Creates a projection with the given standard parallels (degrees), no rotation, a
    /// `(0, 0)` center, scale 1 and no translation.
    ///
    /// Parallels symmetric about the equator make the cone degenerate; they are nudged so
    /// the projection stays defined.
    pub fn new(parallels: (f64, f64)) -> Self {
        let mut out = Self {
            parallels,
            rotate: 0.0,
            center: (0.0, 0.0),
            scale: 1.0,
            translate: Point::ZERO,
            clip_extent: None,
            n: 0.0,
            c: 0.0,
            r0: 0.0,
        };
        out.derive();
        out
    }

    fn derive(&mut self) {
        let sy0 = self.parallels.0.to_radians().sin();
        let sy1 = self.parallels.1.to_radians().sin();
        let mut n = (sy0 + sy1) / 2.0;
        if n.abs() < 1e-6 {
            n = 1e-6_f64.copysign(n);
        }
        self.n = n;
        self.c = 1.0 + sy0 * (2.0 * n - sy0);
        self.r0 = self.c.sqrt() / n;
    }

    /// d3's `geoAlbers()`: the lower-48 defaults.
    pub fn albers() -> Self {
        Self::new((29.5, 45.5))
            .with_rotate(96.0)
            .with_center(-0.6, 38.7)
            .with_scale(1070.0)
            .with_translate(Point::new(480.0, 250.0))
    }

    /// Sets the longitude rotation in degrees (added to every input longitude).
    pub fn with_rotate(mut self, lambda: f64) -> Self {
        self.rotate = lambda;
        self
    }

    /// Sets the center, in rotated coordinates (degrees).
    pub fn with_center(mut self, lon: f64, lat: f64) -> Self {
        self.center = (lon, lat);
        self
    }

    /// Sets the scale.
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the screen position of the center.
    pub fn with_translate(mut self, translate: Point) -> Self {
        self.translate = translate;
        self
    }

    /// Restricts output to `extent`; points outside project to `None` and rings are clipped.
    pub fn with_clip_extent(mut self, extent: Option<Rect>) -> Self {
        self.clip_extent = extent;
        self
    }

    /// The scale.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The clip extent, if any.
    pub fn clip_extent(&self) -> Option<Rect> {
        self.clip_extent
    }

    fn raw(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let r = (self.c - 2.0 * self.n * phi.sin()).max(0.0).sqrt() / self.n;
        let a = lambda * self.n;
        (r * a.sin(), self.r0 - r * a.cos())
    }

    /// Projects without applying the clip extent.
    pub fn project_unclipped(&self, lon: f64, lat: f64) -> Option<Point> {
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }
        let lambda = wrap_pi((lon + self.rotate).to_radians());
        let (px, py) = self.raw(lambda, lat.to_radians());
        let (cx, cy) = self.raw(self.center.0.to_radians(), self.center.1.to_radians());
        let k = self.scale;
        Some(Point::new(
            self.translate.x + k * (px - cx),
            self.translate.y - k * (py - cy),
        ))
    }
}

fn wrap_pi(lambda: f64) -> f64 {
    if lambda > PI {
        lambda - 2.0 * PI
    } else if lambda < -PI {
        lambda + 2.0 * PI
    } else {
        lambda
    }
}

fn contains(extent: Rect, p: Point) -> bool {
    p.x >= extent.x0 && p.x <= extent.x1 && p.y >= extent.y0 && p.y <= extent.y1
}

impl Projection for ConicEqualArea {
    fn project(&self, lon: f64, lat: f64) -> Option<Point> {
        let p = self.project_unclipped(lon, lat)?;
        match self.clip_extent {
            Some(extent) if !contains(extent, p) => None,
            _ => Some(p),
        }
    }

    fn project_ring(&self, ring: &[(f64, f64)]) -> Vec<Vec<Point>> {
        let projected: Vec<Point> = ring
            .iter()
            .filter_map(|&(lon, lat)| self.project_unclipped(lon, lat))
            .collect();
        let projected = match self.clip_extent {
            Some(extent) => clip_ring(&projected, extent),
            None => projected,
        };
        if projected.len() < 3 {
            Vec::new()
        } else {
            vec![projected]
        }
    }
}

/// d3's `geoAlbersUsa`: lower 48 plus Alaska and Hawaii insets.
///
/// Each inset has a clip extent; a point belongs to the first inset (lower 48, Alaska,
/// Hawaii) whose extent contains its projection, and rings are drawn in every inset they
/// reach, clipped to that inset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlbersUsa {
    lower48: ConicEqualArea,
    alaska: ConicEqualArea,
    hawaii: ConicEqualArea,
}

/// Inset extents are shrunk by this much so adjacent insets never share an edge.
const EPSILON: f64 = 1e-6;

impl Default for AlbersUsa {
    fn default() -> Self {
        Self::new(1070.0, Point::new(480.0, 250.0))
    }
}

impl AlbersUsa {
    /// Creates the composite projection with the lower-48 scale `k`, centered at `translate`.
    pub fn new(k: f64, translate: Point) -> Self {
        let Point { x, y } = translate;
        let lower48 = ConicEqualArea::new((29.5, 45.5))
            .with_rotate(96.0)
            .with_center(-0.6, 38.7)
            .with_scale(k)
            .with_translate(translate)
            .with_clip_extent(Some(Rect::new(
                x - 0.455 * k,
                y - 0.238 * k,
                x + 0.455 * k,
                y + 0.238 * k,
            )));
        let alaska = ConicEqualArea::new((55.0, 65.0))
            .with_rotate(154.0)
            .with_center(-2.0, 58.5)
            .with_scale(k * 0.35)
            .with_translate(Point::new(x - 0.307 * k, y + 0.201 * k))
            .with_clip_extent(Some(Rect::new(
                x - 0.425 * k + EPSILON,
                y + 0.120 * k + EPSILON,
                x - 0.214 * k - EPSILON,
                y + 0.234 * k - EPSILON,
            )));
        let hawaii = ConicEqualArea::new((8.0, 18.0))
            .with_rotate(157.0)
            .with_center(-3.0, 19.9)
            .with_scale(k)
            .with_translate(Point::new(x - 0.205 * k, y + 0.212 * k))
            .with_clip_extent(Some(Rect::new(
                x - 0.214 * k + EPSILON,
                y + 0.166 * k + EPSILON,
                x - 0.115 * k - EPSILON,
                y + 0.234 * k - EPSILON,
            )));
        Self {
            lower48,
            alaska,
            hawaii,
        }
    }

    /// The lower-48 projection.
    pub fn lower48(&self) -> &ConicEqualArea {
        &self.lower48
    }

    /// The Alaska inset projection.
    pub fn alaska(&self) -> &ConicEqualArea {
        &self.alaska
    }

    /// The Hawaii inset projection.
    pub fn hawaii(&self) -> &ConicEqualArea {
        &self.hawaii
    }

    fn insets(&self) -> [&ConicEqualArea; 3] {
        [&self.lower48, &self.alaska, &self.hawaii]
    }
}

impl Projection for AlbersUsa {
    fn project(&self, lon: f64, lat: f64) -> Option<Point> {
        self.insets().into_iter().find_map(|p| p.project(lon, lat))
    }

    fn project_ring(&self, ring: &[(f64, f64)]) -> Vec<Vec<Point>> {
        self.insets()
            .into_iter()
            .flat_map(|p| p.project_ring(ring))
            .collect()
    }
}
