//! Snap functionality for aligning a dragged object to the grid, the canvas
//! center and the other objects on the canvas.
//!
//! Each axis is resolved independently. Object alignments take precedence over
//! the canvas center, which takes precedence over the grid. Among object
//! alignments on one axis the nearest wins, and equal distances keep the one
//! found first (objects in scene order, tests in [`Alignment::ALL`] order).

use crate::guides::{GUIDE_EPSILON, GuideLine};
use crate::scene::SceneModel;
use crate::shapes::ShapeId;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Grid size for snapping.
pub const GRID_SIZE: f64 = 5.0;

/// Distance (in canvas pixels) below which an alignment engages.
pub const SNAP_THRESHOLD: f64 = 5.0;

/// Tunables for the snap engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Grid pitch; zero or negative disables grid snapping.
    pub grid_size: f64,
    /// Alignments engage when strictly closer than this.
    pub threshold: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            threshold: SNAP_THRESHOLD,
        }
    }
}

/// Result of a grid snap.
#[derive(Debug, Clone, Copy)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    if grid_size.is_nan() || grid_size <= 0.0 {
        return SnapResult::none(point);
    }
    let snapped_x = (point.x / grid_size).round() * grid_size;
    let snapped_y = (point.y / grid_size).round() * grid_size;

    SnapResult {
        point: Point::new(snapped_x, snapped_y),
        snapped_x: true,
        snapped_y: true,
    }
}

/// One of the pairwise alignment tests between the dragged object and another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    CenterX,
    CenterY,
    LeftToLeft,
    RightToRight,
    /// Dragged left edge meets the other's right edge.
    LeftToRight,
    /// Dragged right edge meets the other's left edge.
    RightToLeft,
    TopToTop,
    BottomToBottom,
    TopToBottom,
    BottomToTop,
}

impl Alignment {
    /// Evaluation order.
    pub const ALL: [Alignment; 10] = [
        Alignment::CenterX,
        Alignment::CenterY,
        Alignment::LeftToLeft,
        Alignment::RightToRight,
        Alignment::LeftToRight,
        Alignment::RightToLeft,
        Alignment::TopToTop,
        Alignment::BottomToBottom,
        Alignment::TopToBottom,
        Alignment::BottomToTop,
    ];

    pub fn axis(self) -> Axis {
        match self {
            Alignment::CenterX
            | Alignment::LeftToLeft
            | Alignment::RightToRight
            | Alignment::LeftToRight
            | Alignment::RightToLeft => Axis::X,
            _ => Axis::Y,
        }
    }

    /// Which edge (or center) of the dragged object and of the other object
    /// this test lines up.
    fn anchors(self) -> (Anchor, Anchor) {
        match self {
            Alignment::CenterX | Alignment::CenterY => (Anchor::Center, Anchor::Center),
            Alignment::LeftToLeft | Alignment::TopToTop => (Anchor::Start, Anchor::Start),
            Alignment::RightToRight | Alignment::BottomToBottom => (Anchor::End, Anchor::End),
            Alignment::LeftToRight | Alignment::TopToBottom => (Anchor::Start, Anchor::End),
            Alignment::RightToLeft | Alignment::BottomToTop => (Anchor::End, Anchor::Start),
        }
    }
}

/// Horizontal or vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy)]
enum Anchor {
    Start,
    Center,
    End,
}

/// Extent of a rect along one axis.
#[derive(Debug, Clone, Copy)]
struct Span {
    start: f64,
    len: f64,
}

impl Span {
    fn of(rect: Rect, axis: Axis) -> Self {
        match axis {
            Axis::X => Span {
                start: rect.x0,
                len: rect.width(),
            },
            Axis::Y => Span {
                start: rect.y0,
                len: rect.height(),
            },
        }
    }

    fn at(self, anchor: Anchor) -> f64 {
        match anchor {
            Anchor::Start => self.start,
            Anchor::Center => self.start + self.len / 2.0,
            Anchor::End => self.start + self.len,
        }
    }

    /// Start coordinate that puts `anchor` at `target`.
    fn start_for(self, anchor: Anchor, target: f64) -> f64 {
        match anchor {
            Anchor::Start => target,
            Anchor::Center => target - self.len / 2.0,
            Anchor::End => target - self.len,
        }
    }
}

/// What decided the final coordinate on an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapSource {
    /// Nearest grid multiple (or the raw coordinate if the grid is disabled).
    Grid,
    /// Centered on the canvas.
    CanvasCenter,
    /// Aligned with `others[index]`.
    Object { index: usize, alignment: Alignment },
}

/// A possible alignment on one axis.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    /// Resulting start coordinate of the dragged object.
    start: f64,
    /// Where the guide is drawn.
    guide_at: f64,
    distance: f64,
    source: SnapSource,
}

/// Output of [`SnapEngine::compute`].
#[derive(Debug, Clone, PartialEq)]
pub struct SnapOutcome {
    /// New top-left of the dragged object.
    pub position: Point,
    /// Guides to display for this frame.
    pub guides: Vec<GuideLine>,
    pub source_x: SnapSource,
    pub source_y: SnapSource,
}

impl SnapOutcome {
    /// Whether x was aligned to something other than the grid.
    pub fn aligned_x(&self) -> bool {
        self.source_x != SnapSource::Grid
    }

    /// Whether y was aligned to something other than the grid.
    pub fn aligned_y(&self) -> bool {
        self.source_y != SnapSource::Grid
    }
}

/// Pure alignment computation for a dragged object.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapEngine {
    config: SnapConfig,
}

impl SnapEngine {
    pub fn new(config: SnapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> SnapConfig {
        self.config
    }

    /// Compute where `moving` should land given the other objects' bounds.
    ///
    /// Distances are measured from the unsnapped `moving` rect. Rects with
    /// non-finite coordinates in `others` are ignored.
    pub fn compute(&self, moving: Rect, others: &[Rect], canvas: Size) -> SnapOutcome {
        let grid = snap_to_grid(moving.origin(), self.config.grid_size).point;
        let canvas_rect = Rect::from_origin_size(Point::ZERO, canvas);

        let (x, source_x, guides_x) =
            self.resolve_axis(Axis::X, moving, others, canvas_rect, grid.x);
        let (y, source_y, guides_y) =
            self.resolve_axis(Axis::Y, moving, others, canvas_rect, grid.y);

        let mut guides = guides_x;
        guides.extend(guides_y);

        SnapOutcome {
            position: Point::new(x, y),
            guides,
            source_x,
            source_y,
        }
    }

    /// Write a computed position to the scene.
    /// Returns false if the object no longer exists.
    pub fn apply<S: SceneModel + ?Sized>(
        scene: &mut S,
        id: ShapeId,
        outcome: &SnapOutcome,
    ) -> bool {
        scene.set_position(id, outcome.position)
    }

    fn resolve_axis(
        &self,
        axis: Axis,
        moving: Rect,
        others: &[Rect],
        canvas: Rect,
        grid_start: f64,
    ) -> (f64, SnapSource, Vec<GuideLine>) {
        let span = Span::of(moving, axis);
        let threshold = self.config.threshold;

        let canvas_candidate = {
            let target = Span::of(canvas, axis).at(Anchor::Center);
            let distance = (span.at(Anchor::Center) - target).abs();
            (distance < threshold).then_some(Candidate {
                start: span.start_for(Anchor::Center, target),
                guide_at: target,
                distance,
                source: SnapSource::CanvasCenter,
            })
        };

        let mut object_candidates = Vec::new();
        for (index, other) in others.iter().enumerate() {
            if !is_finite_rect(other) {
                continue;
            }
            let other_span = Span::of(*other, axis);
            for alignment in Alignment::ALL.into_iter().filter(|a| a.axis() == axis) {
                let (own, theirs) = alignment.anchors();
                let target = other_span.at(theirs);
                let distance = (span.at(own) - target).abs();
                if distance < threshold {
                    object_candidates.push(Candidate {
                        start: span.start_for(own, target),
                        guide_at: target,
                        distance,
                        source: SnapSource::Object { index, alignment },
                    });
                }
            }
        }

        // Ties keep the earliest candidate.
        let nearest_object = object_candidates
            .iter()
            .fold(None::<&Candidate>, |best, c| match best {
                Some(b) if b.distance <= c.distance => Some(b),
                _ => Some(c),
            });

        let Some(winner) = nearest_object.or(canvas_candidate.as_ref()).copied() else {
            return (grid_start, SnapSource::Grid, Vec::new());
        };

        let mut guides: Vec<GuideLine> = Vec::new();
        let holding = canvas_candidate.iter().chain(object_candidates.iter());
        for candidate in holding.filter(|c| (c.start - winner.start).abs() < GUIDE_EPSILON) {
            let guide = match axis {
                Axis::X => GuideLine::vertical(candidate.guide_at),
                Axis::Y => GuideLine::horizontal(candidate.guide_at),
            };
            if !guides.iter().any(|g| g.coincides(&guide)) {
                guides.push(guide);
            }
        }

        (winner.start, winner.source, guides)
    }
}

fn is_finite_rect(rect: &Rect) -> bool {
    rect.x0.is_finite() && rect.y0.is_finite() && rect.x1.is_finite() && rect.y1.is_finite()
}
