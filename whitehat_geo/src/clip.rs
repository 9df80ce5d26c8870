// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polygon clipping against an axis-aligned rectangle (Sutherland–Hodgman).

use kurbo::{Point, Rect};

#[derive(Clone, Copy)]
enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    fn inside(self, r: Rect, p: Point) -> bool {
        match self {
            Self::Left => p.x >= r.x0,
            Self::Right => p.x <= r.x1,
            Self::Top => p.y >= r.y0,
            Self::Bottom => p.y <= r.y1,
        }
    }

    fn intersect(self, r: Rect, a: Point, b: Point) -> Point {
        match self {
            Self::Left | Self::Right => {
                let x = if matches!(self, Self::Left) { r.x0 } else { r.x1 };
                let t = (x - a.x) / (b.x - a.x);
                Point::new(x, a.y + t * (b.y - a.y))
            }
            Self::Top | Self::Bottom => {
                let y = if matches!(self, Self::Top) { r.y0 } else { r.y1 };
                let t = (y - a.y) / (b.y - a.y);
                Point::new(a.x + t * (b.x - a.x), y)
            }
        }
    }
}

/// Clips a closed ring (implicitly closed; the first point is not repeated) to `rect`.
///
/// Returns an empty vector when nothing of the ring lies inside.
pub(crate) fn clip_ring(ring: &[Point], rect: Rect) -> Vec<Point> {
    let mut out: Vec<Point> = ring.to_vec();
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        if out.is_empty() {
            break;
        }
        let input = std::mem::take(&mut out);
        let mut prev = input[input.len() - 1];
        for &cur in &input {
            let cur_in = edge.inside(rect, cur);
            let prev_in = edge.inside(rect, prev);
            if cur_in {
                if !prev_in {
                    out.push(edge.intersect(rect, prev, cur));
                }
                out.push(cur);
            } else if prev_in {
                out.push(edge.intersect(rect, prev, cur));
            }
            prev = cur;
        }
    }
    if out.len() < 3 { Vec::new() } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    #[test]
    fn inside_ring_is_unchanged() {
        let ring = square(1.0, 1.0, 2.0, 2.0);
        assert_eq!(clip_ring(&ring, Rect::new(0.0, 0.0, 10.0, 10.0)), ring);
    }

    #[test]
    fn outside_ring_is_dropped() {
        let ring = square(20.0, 20.0, 30.0, 30.0);
        assert!(clip_ring(&ring, Rect::new(0.0, 0.0, 10.0, 10.0)).is_empty());
    }

    #[test]
    fn straddling_ring_is_cut_at_the_edge() {
        let ring = square(5.0, 5.0, 15.0, 8.0);
        let clipped = clip_ring(&ring, Rect::new(0.0, 0.0, 10.0, 10.0));
        let max_x = clipped.iter().map(|p| p.x).fold(f64::MIN, f64::max);
        assert_eq!(max_x, 10.0);
        assert_eq!(clipped.len(), 4);
    }
}
