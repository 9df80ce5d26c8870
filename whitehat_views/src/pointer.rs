// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use kurbo::Point;

/// A pointer event in canvas pixels, stamped with the host clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Pointer position.
    pub pos: Point,
    /// Host time of the event; animations started by it begin here.
    pub time: Duration,
}

impl PointerEvent {
    /// Creates an event.
    pub fn new(pos: impl Into<Point>, time: Duration) -> Self {
        Self {
            pos: pos.into(),
            time,
        }
    }

    /// An event at `(x, y)` at time zero.
    pub fn at(x: f64, y: f64) -> Self {
        Self::new((x, y), Duration::ZERO)
    }
}

/// Whether an event should keep propagating to enclosing handlers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventFlow {
    /// The event was not consumed.
    Continue,
    /// The event was consumed; enclosing handlers must not see it.
    Stop,
}
