//! Transient alignment guides shown while an object is being dragged.

use kurbo::{Line, Point, Size};
use serde::{Deserialize, Serialize};

/// Direction a guide line runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Constant x, spans the canvas height.
    Vertical,
    /// Constant y, spans the canvas width.
    Horizontal,
}

/// A single alignment guide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuideLine {
    pub orientation: Orientation,
    /// x for vertical guides, y for horizontal ones.
    pub coordinate: f64,
}

impl GuideLine {
    pub fn vertical(x: f64) -> Self {
        Self {
            orientation: Orientation::Vertical,
            coordinate: x,
        }
    }

    pub fn horizontal(y: f64) -> Self {
        Self {
            orientation: Orientation::Horizontal,
            coordinate: y,
        }
    }

    /// The guide as a segment across the whole canvas.
    pub fn segment(&self, canvas: Size) -> Line {
        match self.orientation {
            Orientation::Vertical => Line::new(
                Point::new(self.coordinate, 0.0),
                Point::new(self.coordinate, canvas.height),
            ),
            Orientation::Horizontal => Line::new(
                Point::new(0.0, self.coordinate),
                Point::new(canvas.width, self.coordinate),
            ),
        }
    }

    /// Whether two guides would draw on top of each other.
    pub fn coincides(&self, other: &GuideLine) -> bool {
        self.orientation == other.orientation
            && (self.coordinate - other.coordinate).abs() < GUIDE_EPSILON
    }
}

/// Coordinates closer than this are treated as the same line.
pub(crate) const GUIDE_EPSILON: f64 = 1e-6;

/// Owns the guides displayed for the current drag frame.
#[derive(Debug, Clone, Default)]
pub struct GuideLineRegistry {
    guides: Vec<GuideLine>,
    needs_render: bool,
}

impl GuideLineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every guide. Safe to call when already empty.
    pub fn clear(&mut self) {
        if !self.guides.is_empty() {
            self.guides.clear();
            self.needs_render = true;
        }
    }

    /// Append a guide and mark the registry for render.
    pub fn add(&mut self, guide: GuideLine) {
        self.guides.push(guide);
        self.needs_render = true;
    }

    /// Swap in the guides for a new frame.
    pub fn replace(&mut self, guides: impl IntoIterator<Item = GuideLine>) {
        self.clear();
        for guide in guides {
            self.add(guide);
        }
    }

    pub fn guides(&self) -> &[GuideLine] {
        &self.guides
    }

    pub fn len(&self) -> usize {
        self.guides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guides.is_empty()
    }

    /// Report whether guides changed since the last call, and reset the flag.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.needs_render)
    }
}
