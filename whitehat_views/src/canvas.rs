// Copyright 2025 the Whitehat Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Size};
use whitehat_core::Scene;

/// A host tooltip.
pub trait Tooltip {
    /// Shows the tooltip at the pointer.
    fn move_to_pointer(&mut self, pos: Point);
    /// Hides the tooltip.
    fn hide(&mut self);
    /// Replaces the tooltip content, one entry per line.
    fn set_content(&mut self, lines: Vec<String>);
}

/// A tooltip that just records its state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipState {
    /// Whether the tooltip is shown.
    pub visible: bool,
    /// Last pointer position.
    pub pos: Point,
    /// Content lines.
    pub lines: Vec<String>,
}

impl Tooltip for TooltipState {
    fn move_to_pointer(&mut self, pos: Point) {
        self.visible = true;
        self.pos = pos;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn set_content(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }
}

/// A drawing surface: a retained scene, its pixel size and a tooltip.
#[derive(Debug)]
pub struct Canvas<T> {
    /// Marks drawn on this surface.
    pub scene: Scene,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
    /// The surface's tooltip.
    pub tooltip: T,
}

impl<T: Tooltip> Canvas<T> {
    /// Creates an empty surface.
    pub fn new(width: f64, height: f64, tooltip: T) -> Self {
        Self {
            scene: Scene::new(),
            width,
            height,
            tooltip,
        }
    }

    /// The pixel size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Resizes the surface. Views must be rendered again afterwards.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}
