// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Evaluated mark payloads.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;

use kurbo::{BezPath, Point, Rect, Shape};
use peniko::Brush;

use crate::{MarkKind, TextAnchor, TextBaseline};

/// Evaluated paint.
#[derive(Clone, Debug, PartialEq)]
pub struct Paint {
    /// Fill brush.
    pub fill: Brush,
    /// Stroke brush.
    pub stroke: Brush,
    /// Stroke width.
    pub stroke_width: f64,
    /// Group opacity.
    pub opacity: f64,
}

/// Evaluated rect.
#[derive(Clone, Debug, PartialEq)]
pub struct RectPayload {
    /// Geometry. May have negative extent if the encodings produced one.
    pub rect: Rect,
    /// Paint.
    pub paint: Paint,
}

/// Evaluated text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPayload {
    /// Anchor position.
    pub pos: Point,
    /// Content.
    pub text: String,
    /// Font size.
    pub font_size: f64,
    /// Font weight.
    pub font_weight: u16,
    /// Rotation in degrees.
    pub angle: f64,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
    /// Vertical baseline.
    pub baseline: TextBaseline,
    /// Paint.
    pub paint: Paint,
}

/// Evaluated path.
#[derive(Clone, Debug, PartialEq)]
pub struct PathPayload {
    /// Geometry.
    pub path: BezPath,
    /// Paint.
    pub paint: Paint,
}

/// An evaluated mark.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkPayload {
    /// Rect payload.
    Rect(RectPayload),
    /// Text payload.
    Text(Box<TextPayload>),
    /// Path payload.
    Path(Box<PathPayload>),
}

impl MarkPayload {
    /// The payload's primitive kind.
    pub fn kind(&self) -> MarkKind {
        match self {
            Self::Rect(_) => MarkKind::Rect,
            Self::Text(_) => MarkKind::Text,
            Self::Path(_) => MarkKind::Path,
        }
    }

    /// The payload's paint.
    pub fn paint(&self) -> &Paint {
        match self {
            Self::Rect(r) => &r.paint,
            Self::Text(t) => &t.paint,
            Self::Path(p) => &p.paint,
        }
    }

    /// Geometric bounds, ignoring stroke.
    ///
    /// Text has no bounds without a text shaper, and empty paths have none either.
    pub fn bounds(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(r.rect.abs()),
            Self::Text(_) => None,
            Self::Path(p) => {
                if p.path.elements().is_empty() {
                    None
                } else {
                    Some(p.path.bounding_box())
                }
            }
        }
    }
}
