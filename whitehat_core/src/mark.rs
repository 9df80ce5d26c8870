// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marks and the mark builder.

extern crate alloc;

use alloc::boxed::Box;
use alloc::string::String;

use kurbo::{BezPath, Point, Rect};
use peniko::{Brush, Color};
use smallvec::SmallVec;

use crate::{
    Encoding, EvalCtx, InputRef, MarkId, MarkPayload, Paint, PathPayload, RectPayload,
    TextPayload,
};

/// The primitive a mark draws.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkKind {
    /// An axis-aligned rectangle.
    Rect,
    /// A single line of text.
    Text,
    /// An arbitrary path.
    Path,
}

/// Horizontal text anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// The text starts at `x`.
    #[default]
    Start,
    /// The text is centered on `x`.
    Middle,
    /// The text ends at `x`.
    End,
}

/// Vertical text baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// `y` is the alphabetic baseline.
    #[default]
    Alphabetic,
    /// `y` is the vertical center of the text.
    Middle,
    /// `y` is the top of the text.
    Hanging,
}

/// Paint encodings shared by every mark kind.
#[derive(Clone, Debug)]
pub struct PaintEncodings {
    /// Fill brush.
    pub fill: Encoding<Brush>,
    /// Stroke brush.
    pub stroke: Encoding<Brush>,
    /// Stroke width in scene units.
    pub stroke_width: Encoding<f64>,
    /// Group opacity in `[0, 1]`.
    pub opacity: Encoding<f64>,
}

impl Default for PaintEncodings {
    fn default() -> Self {
        Self {
            fill: Encoding::Const(Brush::default()),
            stroke: Encoding::Const(Brush::Solid(Color::TRANSPARENT)),
            stroke_width: Encoding::Const(0.0),
            opacity: Encoding::Const(1.0),
        }
    }
}

impl PaintEncodings {
    fn eval(&self, ctx: &EvalCtx<'_>, id: MarkId) -> Paint {
        Paint {
            fill: self.fill.eval(ctx, id),
            stroke: self.stroke.eval(ctx, id),
            stroke_width: self.stroke_width.eval(ctx, id),
            opacity: self.opacity.eval(ctx, id),
        }
    }

    fn inputs(&self) -> impl Iterator<Item = &InputRef> {
        self.fill
            .inputs()
            .iter()
            .chain(self.stroke.inputs())
            .chain(self.stroke_width.inputs())
            .chain(self.opacity.inputs())
    }
}

/// Rect mark encodings.
#[derive(Clone, Debug)]
pub struct RectEncodings {
    /// Left edge.
    pub x: Encoding<f64>,
    /// Top edge.
    pub y: Encoding<f64>,
    /// Width.
    pub w: Encoding<f64>,
    /// Height.
    pub h: Encoding<f64>,
    /// Paint.
    pub paint: PaintEncodings,
}

impl Default for RectEncodings {
    fn default() -> Self {
        Self {
            x: Encoding::Const(0.0),
            y: Encoding::Const(0.0),
            w: Encoding::Const(0.0),
            h: Encoding::Const(0.0),
            paint: PaintEncodings::default(),
        }
    }
}

/// Text mark encodings.
#[derive(Clone, Debug)]
pub struct TextEncodings {
    /// Anchor x.
    pub x: Encoding<f64>,
    /// Anchor y.
    pub y: Encoding<f64>,
    /// Text content.
    pub text: Encoding<String>,
    /// Font size in scene units.
    pub font_size: Encoding<f64>,
    /// CSS-style font weight (400 normal, 700 bold).
    pub font_weight: Encoding<u16>,
    /// Rotation in degrees around the anchor.
    pub angle: Encoding<f64>,
    /// Horizontal anchor.
    pub anchor: Encoding<TextAnchor>,
    /// Vertical baseline.
    pub baseline: Encoding<TextBaseline>,
    /// Paint.
    pub paint: PaintEncodings,
}

impl Default for TextEncodings {
    fn default() -> Self {
        Self {
            x: Encoding::Const(0.0),
            y: Encoding::Const(0.0),
            text: Encoding::Const(String::new()),
            font_size: Encoding::Const(10.0),
            font_weight: Encoding::Const(400),
            angle: Encoding::Const(0.0),
            anchor: Encoding::Const(TextAnchor::Start),
            baseline: Encoding::Const(TextBaseline::Alphabetic),
            paint: PaintEncodings::default(),
        }
    }
}

/// Path mark encodings.
#[derive(Clone, Debug)]
pub struct PathEncodings {
    /// Path geometry.
    pub path: Encoding<BezPath>,
    /// Paint.
    pub paint: PaintEncodings,
}

impl Default for PathEncodings {
    fn default() -> Self {
        Self {
            path: Encoding::Const(BezPath::new()),
            paint: PaintEncodings::default(),
        }
    }
}

/// Per-kind encodings of a mark.
#[derive(Clone, Debug)]
pub enum MarkEncodings {
    /// Rect encodings.
    Rect(RectEncodings),
    /// Text encodings.
    Text(Box<TextEncodings>),
    /// Path encodings.
    Path(Box<PathEncodings>),
}

impl MarkEncodings {
    fn paint_mut(&mut self) -> &mut PaintEncodings {
        match self {
            Self::Rect(r) => &mut r.paint,
            Self::Text(t) => &mut t.paint,
            Self::Path(p) => &mut p.paint,
        }
    }
}

/// A stable-identity visual primitive.
#[derive(Clone, Debug)]
pub struct Mark {
    /// Mark id.
    pub id: MarkId,
    /// Primitive kind.
    pub kind: MarkKind,
    /// Paint order; higher draws later.
    pub z_index: i32,
    /// Encodings.
    pub encodings: MarkEncodings,
}

impl Mark {
    /// Starts building a mark. Defaults to a rect.
    pub fn builder(id: MarkId) -> MarkBuilder {
        MarkBuilder {
            id,
            z_index: 0,
            encodings: MarkEncodings::Rect(RectEncodings::default()),
        }
    }

    /// Returns the deduplicated set of inputs read by this mark's encodings.
    pub fn inputs(&self) -> SmallVec<[InputRef; 4]> {
        let mut out: SmallVec<[InputRef; 4]> = SmallVec::new();
        let mut push = |input: &InputRef| {
            if !out.contains(input) {
                out.push(*input);
            }
        };
        match &self.encodings {
            MarkEncodings::Rect(r) => {
                r.x.inputs()
                    .iter()
                    .chain(r.y.inputs())
                    .chain(r.w.inputs())
                    .chain(r.h.inputs())
                    .chain(r.paint.inputs())
                    .for_each(&mut push);
            }
            MarkEncodings::Text(t) => {
                t.x.inputs()
                    .iter()
                    .chain(t.y.inputs())
                    .chain(t.text.inputs())
                    .chain(t.font_size.inputs())
                    .chain(t.font_weight.inputs())
                    .chain(t.angle.inputs())
                    .chain(t.anchor.inputs())
                    .chain(t.baseline.inputs())
                    .chain(t.paint.inputs())
                    .for_each(&mut push);
            }
            MarkEncodings::Path(p) => {
                p.path
                    .inputs()
                    .iter()
                    .chain(p.paint.inputs())
                    .for_each(&mut push);
            }
        }
        out
    }

    /// Evaluates every encoding into a concrete payload.
    pub fn evaluate(&self, ctx: &EvalCtx<'_>) -> MarkPayload {
        let id = self.id;
        match &self.encodings {
            MarkEncodings::Rect(r) => {
                let x = r.x.eval(ctx, id);
                let y = r.y.eval(ctx, id);
                let w = r.w.eval(ctx, id);
                let h = r.h.eval(ctx, id);
                MarkPayload::Rect(RectPayload {
                    rect: Rect::new(x, y, x + w, y + h),
                    paint: r.paint.eval(ctx, id),
                })
            }
            MarkEncodings::Text(t) => MarkPayload::Text(Box::new(TextPayload {
                pos: Point::new(t.x.eval(ctx, id), t.y.eval(ctx, id)),
                text: t.text.eval(ctx, id),
                font_size: t.font_size.eval(ctx, id),
                font_weight: t.font_weight.eval(ctx, id),
                angle: t.angle.eval(ctx, id),
                anchor: t.anchor.eval(ctx, id),
                baseline: t.baseline.eval(ctx, id),
                paint: t.paint.eval(ctx, id),
            })),
            MarkEncodings::Path(p) => MarkPayload::Path(Box::new(PathPayload {
                path: p.path.eval(ctx, id),
                paint: p.paint.eval(ctx, id),
            })),
        }
    }
}

/// Builder for [`Mark`].
///
/// Setters that do not apply to the current kind (for example `w_const` on a text mark) are
/// ignored, so switch kinds with [`MarkBuilder::rect`], [`MarkBuilder::text`] or
/// [`MarkBuilder::path`] first.
#[derive(Debug)]
#[must_use = "call `build` to produce a mark"]
pub struct MarkBuilder {
    id: MarkId,
    z_index: i32,
    encodings: MarkEncodings,
}

impl MarkBuilder {
    /// Switches to a rect mark.
    pub fn rect(mut self) -> Self {
        self.encodings = MarkEncodings::Rect(RectEncodings::default());
        self
    }

    /// Switches to a text mark.
    pub fn text(mut self) -> Self {
        self.encodings = MarkEncodings::Text(Box::default());
        self
    }

    /// Switches to a path mark.
    pub fn path(mut self) -> Self {
        self.encodings = MarkEncodings::Path(Box::default());
        self
    }

    /// Sets the paint order.
    pub fn z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Sets `x` (rect left edge or text anchor).
    pub fn x(mut self, x: Encoding<f64>) -> Self {
        match &mut self.encodings {
            MarkEncodings::Rect(r) => r.x = x,
            MarkEncodings::Text(t) => t.x = x,
            MarkEncodings::Path(_) => {}
        }
        self
    }

    /// Sets a constant `x`.
    pub fn x_const(self, x: f64) -> Self {
        self.x(Encoding::Const(x))
    }

    /// Sets a computed `x`.
    pub fn x_compute<I, F>(self, inputs: I, f: F) -> Self
    where
        I: IntoIterator<Item = InputRef>,
        F: Fn(&EvalCtx<'_>, MarkId) -> f64 + 'static,
    {
        self.x(Encoding::compute(inputs, f))
    }

    /// Sets `y` (rect top edge or text anchor).
    pub fn y(mut self, y: Encoding<f64>) -> Self {
        match &mut self.encodings {
            MarkEncodings::Rect(r) => r.y = y,
            MarkEncodings::Text(t) => t.y = y,
            MarkEncodings::Path(_) => {}
        }
        self
    }

    /// Sets a constant `y`.
    pub fn y_const(self, y: f64) -> Self {
        self.y(Encoding::Const(y))
    }

    /// Sets a computed `y`.
    pub fn y_compute<I, F>(self, inputs: I, f: F) -> Self
    where
        I: IntoIterator<Item = InputRef>,
        F: Fn(&EvalCtx<'_>, MarkId) -> f64 + 'static,
    {
        self.y(Encoding::compute(inputs, f))
    }

    /// Sets a constant rect width.
    pub fn w_const(mut self, w: f64) -> Self {
        if let MarkEncodings::Rect(r) = &mut self.encodings {
            r.w = Encoding::Const(w);
        }
        self
    }

    /// Sets a computed rect width.
    pub fn w_compute<I, F>(mut self, inputs: I, f: F) -> Self
    where
        I: IntoIterator<Item = InputRef>,
        F: Fn(&EvalCtx<'_>, MarkId) -> f64 + 'static,
    {
        if let MarkEncodings::Rect(r) = &mut self.encodings {
            r.w = Encoding::compute(inputs, f);
        }
        self
    }

    /// Sets a constant rect height.
    pub fn h_const(mut self, h: f64) -> Self {
        if let MarkEncodings::Rect(r) = &mut self.encodings {
            r.h = Encoding::Const(h);
        }
        self
    }

    /// Sets a computed rect height.
    pub fn h_compute<I, F>(mut self, inputs: I, f: F) -> Self
    where
        I: IntoIterator<Item = InputRef>,
        F: Fn(&EvalCtx<'_>, MarkId) -> f64 + 'static,
    {
        if let MarkEncodings::Rect(r) = &mut self.encodings {
            r.h = Encoding::compute(inputs, f);
        }
        self
    }

    /// Sets a solid fill color.
    pub fn fill_const(self, color: Color) -> Self {
        self.fill_brush_const(Brush::Solid(color))
    }

    /// Sets a constant fill brush.
    pub fn fill_brush_const(mut self, brush: Brush) -> Self {
        self.encodings.paint_mut().fill = Encoding::Const(brush);
        self
    }

    /// Sets a computed fill brush.
    pub fn fill_brush_compute<I, F>(mut self, inputs: I, f: F) -> Self
    where
        I: IntoIterator<Item = InputRef>,
        F: Fn(&EvalCtx<'_>, MarkId) -> Brush + 'static,
    {
        self.encodings.paint_mut().fill = Encoding::compute(inputs, f);
        self
    }

    /// Sets a constant stroke brush.
    pub fn stroke_brush_const(mut self, brush: Brush) -> Self {
        self.encodings.paint_mut().stroke = Encoding::Const(brush);
        self
    }

    /// Sets a constant stroke width.
    pub fn stroke_width_const(mut self, width: f64) -> Self {
        self.encodings.paint_mut().stroke_width = Encoding::Const(width);
        self
    }

    /// Sets a computed stroke width.
    pub fn stroke_width_compute<I, F>(mut self, inputs: I, f: F) -> Self
    where
        I: IntoIterator<Item = InputRef>,
        F: Fn(&EvalCtx<'_>, MarkId) -> f64 + 'static,
    {
        self.encodings.paint_mut().stroke_width = Encoding::compute(inputs, f);
        self
    }

    /// Sets a constant opacity.
    pub fn opacity_const(mut self, opacity: f64) -> Self {
        self.encodings.paint_mut().opacity = Encoding::Const(opacity);
        self
    }

    /// Sets a computed opacity.
    pub fn opacity_compute<I, F>(mut self, inputs: I, f: F) -> Self
    where
        I: IntoIterator<Item = InputRef>,
        F: Fn(&EvalCtx<'_>, MarkId) -> f64 + 'static,
    {
        self.encodings.paint_mut().opacity = Encoding::compute(inputs, f);
        self
    }

    /// Sets constant text content.
    pub fn text_const(mut self, text: impl Into<String>) -> Self {
        if let MarkEncodings::Text(t) = &mut self.encodings {
            t.text = Encoding::Const(text.into());
        }
        self
    }

    /// Sets a constant font size.
    pub fn font_size_const(mut self, size: f64) -> Self {
        if let MarkEncodings::Text(t) = &mut self.encodings {
            t.font_size = Encoding::Const(size);
        }
        self
    }

    /// Sets a constant font weight.
    pub fn font_weight_const(mut self, weight: u16) -> Self {
        if let MarkEncodings::Text(t) = &mut self.encodings {
            t.font_weight = Encoding::Const(weight);
        }
        self
    }

    /// Sets a constant rotation in degrees.
    pub fn angle_const(mut self, degrees: f64) -> Self {
        if let MarkEncodings::Text(t) = &mut self.encodings {
            t.angle = Encoding::Const(degrees);
        }
        self
    }

    /// Sets the text anchor.
    pub fn text_anchor(mut self, anchor: TextAnchor) -> Self {
        if let MarkEncodings::Text(t) = &mut self.encodings {
            t.anchor = Encoding::Const(anchor);
        }
        self
    }

    /// Centers the text on its anchor.
    pub fn text_anchor_middle(self) -> Self {
        self.text_anchor(TextAnchor::Middle)
    }

    /// Sets the text baseline.
    pub fn text_baseline(mut self, baseline: TextBaseline) -> Self {
        if let MarkEncodings::Text(t) = &mut self.encodings {
            t.baseline = Encoding::Const(baseline);
        }
        self
    }

    /// Sets constant path geometry.
    pub fn path_const(mut self, path: BezPath) -> Self {
        if let MarkEncodings::Path(p) = &mut self.encodings {
            p.path = Encoding::Const(path);
        }
        self
    }

    /// Sets computed path geometry.
    pub fn path_compute<I, F>(mut self, inputs: I, f: F) -> Self
    where
        I: IntoIterator<Item = InputRef>,
        F: Fn(&EvalCtx<'_>, MarkId) -> BezPath + 'static,
    {
        if let MarkEncodings::Path(p) = &mut self.encodings {
            p.path = Encoding::compute(inputs, f);
        }
        self
    }

    /// Finishes the mark.
    pub fn build(self) -> Mark {
        let kind = match &self.encodings {
            MarkEncodings::Rect(_) => MarkKind::Rect,
            MarkEncodings::Text(_) => MarkKind::Text,
            MarkEncodings::Path(_) => MarkKind::Path,
        };
        Mark {
            id: self.id,
            kind,
            z_index: self.z_index,
            encodings: self.encodings,
        }
    }
}
