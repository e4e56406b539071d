//! Selection Box
//!
//! Turns pointer drags over the spectrum canvas into a selection rectangle in
//! canvas pixels. The rectangle is kept inside the canvas and never smaller
//! than one bar cell.

use egui::{Pos2, Vec2};
use reactor_core::{DisplayGeometry, Rect as SelectionRect};
use tracing::trace;

/// Pointer state for one frame, in canvas-local coordinates
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionInput {
    pub pointer_pos: Pos2,
    pub clicked: bool,
    pub dragged: bool,
    pub drag_delta: Vec2,
    pub drag_started: bool,
    pub drag_stopped: bool,
}

/// Outcome of a finished gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionEvent {
    /// Drag released; the constrained rectangle
    Selected(SelectionRect),
    /// Click without drag
    Cleared,
}

/// Drag state for selecting a region of the spectrum canvas
#[derive(Debug, Clone)]
pub struct SelectionBox {
    width: f64,
    height: f64,
    min_width: f64,
    min_height: f64,
    anchor: Option<(f64, f64)>,
    current: (f64, f64),
}

impl SelectionBox {
    /// Canvas of `width` x `height` with a minimum selection size
    pub fn new(width: f64, height: f64, min_width: f64, min_height: f64) -> Self {
        Self {
            width,
            height,
            min_width: min_width.clamp(0.0, width),
            min_height: min_height.clamp(0.0, height),
            anchor: None,
            current: (0.0, 0.0),
        }
    }

    /// Canvas of the geometry's size; minimum one bar width in both directions
    pub fn from_geometry(geometry: &DisplayGeometry) -> Self {
        Self::new(
            geometry.width(),
            geometry.height(),
            geometry.bar_width(),
            geometry.bar_width(),
        )
    }

    pub fn is_dragging(&self) -> bool {
        self.anchor.is_some()
    }

    /// Feed one frame of pointer input
    pub fn handle_interaction(&mut self, input: InteractionInput) -> Option<SelectionEvent> {
        let pos = self.clamp_point(input.pointer_pos);

        if input.drag_started {
            self.anchor = Some(pos);
            self.current = pos;
        } else if input.dragged && self.anchor.is_some() {
            self.current = pos;
        }

        if input.drag_stopped {
            let anchor = self.anchor.take()?;
            let rect = self.constrain(SelectionRect::from_corners(anchor, self.current));
            trace!("Selection drag finished: {:?}", rect);
            return Some(SelectionEvent::Selected(rect));
        }

        if input.clicked && self.anchor.is_none() {
            return Some(SelectionEvent::Cleared);
        }

        None
    }

    /// Rectangle of the drag in progress
    pub fn preview(&self) -> Option<SelectionRect> {
        self.anchor
            .map(|anchor| self.constrain(SelectionRect::from_corners(anchor, self.current)))
    }

    /// Normalize, enforce the minimum size and keep inside the canvas
    pub fn constrain(&self, rect: SelectionRect) -> SelectionRect {
        let rect = rect.normalized();
        let (x, width) = fit_span(rect.x, rect.width, self.min_width, self.width);
        let (y, height) = fit_span(rect.y, rect.height, self.min_height, self.height);
        SelectionRect::new(x, y, width, height)
    }

    fn clamp_point(&self, pos: Pos2) -> (f64, f64) {
        (
            f64::from(pos.x).clamp(0.0, self.width),
            f64::from(pos.y).clamp(0.0, self.height),
        )
    }
}

/// Fit `[start, start + len]` into `[0, limit]` with at least `min` length
fn fit_span(start: f64, len: f64, min: f64, limit: f64) -> (f64, f64) {
    let start = if start.is_finite() { start } else { 0.0 };
    let len = if len.is_finite() { len } else { 0.0 };

    let start = start.clamp(0.0, limit);
    let end = (start + len).clamp(0.0, limit);
    let len = (end - start).max(min);
    let start = start.min(limit - len).max(0.0);
    (start, len)
}
