// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pan/zoom transforms and their animated transitions.

use std::time::Duration;

use kurbo::{Affine, Point, Rect, Size};

/// Largest magnification [`ZoomTransform::fit_bounds`] will pick.
pub const MAX_SCALE: f64 = 8.0;

/// Share of the viewport a fitted feature fills.
const FIT_PADDING: f64 = 0.9;

/// Duration of the animation into a zoomed feature.
pub const ZOOM_IN_DURATION: Duration = Duration::from_millis(750);

/// Duration of the animation back to the full view.
pub const ZOOM_OUT_DURATION: Duration = Duration::from_millis(300);

/// A uniform scale followed by a translation: `p' = k * p + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransform {
    /// Scale factor.
    pub k: f64,
    /// Horizontal translation.
    pub x: f64,
    /// Vertical translation.
    pub y: f64,
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ZoomTransform {
    /// No pan, no zoom.
    pub const IDENTITY: Self = Self {
        k: 1.0,
        x: 0.0,
        y: 0.0,
    };

    /// Creates a transform.
    pub fn new(k: f64, x: f64, y: f64) -> Self {
        Self { k, x, y }
    }

    /// Applies the transform.
    pub fn apply(self, p: Point) -> Point {
        Point::new(self.k * p.x + self.x, self.k * p.y + self.y)
    }

    /// Maps a transformed point back to untransformed coordinates.
    pub fn invert(self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    /// The equivalent affine.
    pub fn to_affine(self) -> Affine {
        Affine::new([self.k, 0.0, 0.0, self.k, self.x, self.y])
    }

    /// Centers `bounds` in `viewport`, scaled so it fills 90% of the tighter dimension.
    ///
    /// The scale is capped at [`MAX_SCALE`]. Degenerate viewports yield the identity.
    pub fn fit_bounds(bounds: Rect, viewport: Size) -> Self {
        let fill = (bounds.width() / viewport.width).max(bounds.height() / viewport.height);
        let k = (FIT_PADDING / fill).min(MAX_SCALE);
        if !k.is_finite() || k <= 0.0 {
            return Self::IDENTITY;
        }
        let c = bounds.center();
        Self {
            k,
            x: viewport.width / 2.0 - k * c.x,
            y: viewport.height / 2.0 - k * c.y,
        }
    }
}

/// d3's `easeCubicInOut`.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// An animation between two transforms.
///
/// The point under the viewport center moves linearly and the scale moves geometrically, both
/// on a cubic in-out clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomTransition {
    from: ZoomTransform,
    to: ZoomTransform,
    start: Duration,
    duration: Duration,
    viewport: Size,
}

impl ZoomTransition {
    /// Creates a transition starting at host time `start`.
    pub fn new(
        from: ZoomTransform,
        to: ZoomTransform,
        start: Duration,
        duration: Duration,
        viewport: Size,
    ) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            viewport,
        }
    }

    /// The end transform.
    pub fn target(&self) -> ZoomTransform {
        self.to
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Whether the transition has reached its target.
    pub fn is_finished(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }

    /// The transform displayed at `now`.
    pub fn sample(&self, now: Duration) -> ZoomTransform {
        let e = ease_cubic_in_out(self.progress(now));
        if e >= 1.0 {
            return self.to;
        }
        let c = Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0);
        let p = self.from.invert(c).lerp(self.to.invert(c), e);
        let k = (self.from.k.ln() * (1.0 - e) + self.to.k.ln() * e).exp();
        ZoomTransform {
            k,
            x: c.x - k * p.x,
            y: c.y - k * p.y,
        }
    }
}

/// A view's zoom toggle, the transform on screen and any running transition.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ZoomState {
    zoomed: bool,
    displayed: ZoomTransform,
    transition: Option<ZoomTransition>,
}

impl ZoomState {
    /// Not zoomed, identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last toggle zoomed in.
    pub fn is_zoomed(&self) -> bool {
        self.zoomed
    }

    /// The transform currently on screen.
    pub fn displayed(&self) -> ZoomTransform {
        self.displayed
    }

    /// Whether a transition is running.
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Where the view is heading: the running transition's target, else the displayed transform.
    pub fn target(&self) -> ZoomTransform {
        self.transition.map_or(self.displayed, |t| t.target())
    }

    /// Animates to `target` over [`ZOOM_IN_DURATION`] and marks the view zoomed.
    pub fn zoom_in(&mut self, target: ZoomTransform, viewport: Size, now: Duration) {
        self.start(target, ZOOM_IN_DURATION, viewport, now);
        self.zoomed = true;
    }

    /// Animates back to the identity over [`ZOOM_OUT_DURATION`].
    pub fn zoom_out(&mut self, viewport: Size, now: Duration) {
        self.start(ZoomTransform::IDENTITY, ZOOM_OUT_DURATION, viewport, now);
        self.zoomed = false;
    }

    /// A new transition starts from whatever is on screen at `now`, replacing any running one.
    fn start(&mut self, target: ZoomTransform, duration: Duration, viewport: Size, now: Duration) {
        self.advance(now);
        self.transition = Some(ZoomTransition::new(
            self.displayed,
            target,
            now,
            duration,
            viewport,
        ));
    }

    /// Samples the running transition. Returns whether the displayed transform changed.
    pub fn advance(&mut self, now: Duration) -> bool {
        let Some(transition) = self.transition else {
            return false;
        };
        let next = transition.sample(now);
        if transition.is_finished(now) {
            self.transition = None;
        }
        let changed = next != self.displayed;
        self.displayed = next;
        changed
    }

    /// Jumps back to the identity without animating.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
