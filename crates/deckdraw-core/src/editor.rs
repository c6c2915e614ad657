//! Interaction controller: selection, snapped dragging and history.

use crate::config::EditorConfig;
use crate::guides::{GuideLine, GuideLineRegistry};
use crate::history::HistoryManager;
use crate::scene::{SceneDocument, SceneError, SceneModel};
use crate::shapes::{SerializableColor, Shape, ShapeId};
use crate::snap::{SnapEngine, SnapOutcome};
use crate::style::{ShapeFactory, ShapeKind};
use kurbo::{Point, Rect, Size, Vec2};

/// Pointer slack when picking objects.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Moves shorter than this are not committed to history.
const MOVE_EPSILON: f64 = 1e-9;

/// State for the object currently being dragged.
#[derive(Debug, Clone, Copy)]
struct DragState {
    id: ShapeId,
    /// Pointer position relative to the object's top-left at press time.
    grab_offset: Vec2,
    /// Top-left before the drag started.
    original: Point,
}

/// Drives a [`SceneModel`] from pointer and keyboard events.
///
/// Every committed mutation records one snapshot. Drag frames only move the
/// object and refresh the guides; the snapshot is taken on commit.
#[derive(Debug)]
pub struct Editor<S: SceneModel = SceneDocument> {
    scene: S,
    canvas: Size,
    snap: SnapEngine,
    guides: GuideLineRegistry,
    history: HistoryManager,
    factory: ShapeFactory,
    selection: Option<ShapeId>,
    drag: Option<DragState>,
}

impl Editor<SceneDocument> {
    /// Create an editor over an empty document.
    pub fn new(config: EditorConfig) -> Self {
        let scene = SceneDocument::new().with_background(config.background_color);
        Self::with_scene(scene, config)
    }
}

impl<S: SceneModel> Editor<S> {
    /// Create an editor over an existing scene. Its current state becomes the
    /// oldest history entry.
    pub fn with_scene(scene: S, config: EditorConfig) -> Self {
        let canvas = config.canvas_size();
        let mut editor = Self {
            scene,
            canvas,
            snap: SnapEngine::new(config.snap),
            guides: GuideLineRegistry::new(),
            history: HistoryManager::with_limit(config.history_limit),
            factory: ShapeFactory::new(config.style, canvas),
            selection: None,
            drag: None,
        };
        editor.record("initial state");
        editor
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn into_scene(self) -> S {
        self.scene
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn factory(&self) -> &ShapeFactory {
        &self.factory
    }

    /// Guides for the current drag frame.
    pub fn guides(&self) -> &[GuideLine] {
        self.guides.guides()
    }

    /// Report whether the guide overlay changed since the last call.
    pub fn take_guide_render_request(&mut self) -> bool {
        self.guides.take_render_request()
    }

    pub fn selection(&self) -> Option<ShapeId> {
        self.selection
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Add a toolbar shape centered on the canvas and select it.
    pub fn add_shape(&mut self, kind: ShapeKind) -> ShapeId {
        let shape = self.factory.create(kind);
        self.insert(shape)
    }

    /// Add a toolbar shape with its bounding box at `top_left` and select it.
    pub fn add_shape_at(&mut self, kind: ShapeKind, top_left: Point) -> ShapeId {
        let shape = self.factory.create_at(kind, top_left);
        self.insert(shape)
    }

    /// Add a text box centered on the canvas and select it.
    pub fn add_text(&mut self, content: impl Into<String>) -> ShapeId {
        let shape = self.factory.create_text(content);
        self.insert(shape)
    }

    fn insert(&mut self, shape: Shape) -> ShapeId {
        self.cancel_drag();
        log::debug!("Adding {} {}", shape.kind_name(), shape.id());
        let id = self.scene.add_object(shape);
        self.selection = Some(id);
        self.record("add");
        id
    }

    /// Select the topmost object under `point`, or clear the selection.
    pub fn select_at(&mut self, point: Point) -> Option<ShapeId> {
        self.selection = self.scene.object_at(point, HIT_TOLERANCE);
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Start dragging the object under `point`.
    ///
    /// Returns false if nothing draggable is there. An active drag is
    /// cancelled first.
    pub fn begin_drag(&mut self, point: Point) -> bool {
        if self.drag.is_some() {
            log::warn!("Drag started while another was active; cancelling the old one");
            self.cancel_drag();
        }

        let Some(id) = self.select_at(point) else {
            return false;
        };
        let Some(shape) = self.scene.object(id) else {
            return false;
        };
        if shape.is_locked() {
            log::debug!("Ignoring drag on locked {} {}", shape.kind_name(), id);
            return false;
        }

        let original = shape.bounds().origin();
        self.drag = Some(DragState {
            id,
            grab_offset: point - original,
            original,
        });
        log::debug!("Drag started on {} at {:?}", id, original);
        true
    }

    /// Move the dragged object to follow `point`, snapped.
    ///
    /// Returns the applied outcome, or `None` when no drag is active. A drag
    /// whose object has since been locked is cancelled.
    pub fn drag_to(&mut self, point: Point) -> Option<SnapOutcome> {
        let drag = self.drag?;
        let Some(shape) = self.scene.object(drag.id) else {
            log::warn!("Dragged object {} disappeared; dropping drag", drag.id);
            self.drag = None;
            self.guides.clear();
            return None;
        };
        let (locked, bounds) = (shape.is_locked(), shape.bounds());
        if locked {
            log::warn!("Dragged object {} was locked; cancelling drag", drag.id);
            self.cancel_drag();
            return None;
        }

        let moving = Rect::from_origin_size(point - drag.grab_offset, bounds.size());
        let others: Vec<Rect> = self
            .scene
            .object_ids()
            .into_iter()
            .filter(|&id| id != drag.id)
            .filter_map(|id| self.scene.object(id).and_then(Shape::snap_bounds))
            .collect();

        let outcome = self.snap.compute(moving, &others, self.canvas);
        SnapEngine::apply(&mut self.scene, drag.id, &outcome);
        self.guides.replace(outcome.guides.iter().copied());
        Some(outcome)
    }

    /// Finish the active drag. Records history only if the object moved.
    pub fn commit_drag(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        self.guides.clear();

        let moved = self
            .scene
            .bounds_of(drag.id)
            .is_some_and(|b| (b.origin() - drag.original).hypot() > MOVE_EPSILON);
        if moved {
            self.record("move");
        } else {
            log::debug!("Drag on {} ended without movement", drag.id);
        }
        moved
    }

    /// Abort the active drag, putting the object back where it started.
    pub fn cancel_drag(&mut self) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        self.scene.set_position(drag.id, drag.original);
        self.guides.clear();
        log::debug!("Drag on {} cancelled", drag.id);
        true
    }

    /// Cancel a drag if one is active, otherwise drop the selection.
    pub fn escape(&mut self) {
        if !self.cancel_drag() {
            self.clear_selection();
        }
    }

    /// Remove the selected object.
    pub fn delete_selected(&mut self) -> bool {
        self.cancel_drag();
        let Some(id) = self.selection.take() else {
            return false;
        };
        if self.scene.remove_object(id).is_none() {
            log::warn!("Selected object {} was already gone", id);
            return false;
        }
        self.record("delete");
        true
    }

    /// Restore the previous snapshot. Returns false at the oldest entry.
    pub fn undo(&mut self) -> bool {
        self.cancel_drag();
        let Some(snapshot) = self.history.undo() else {
            log::debug!("Nothing to undo");
            return false;
        };
        self.scene.restore(snapshot);
        self.after_restore();
        true
    }

    /// Re-apply the next snapshot. Returns false at the newest entry.
    pub fn redo(&mut self) -> bool {
        self.cancel_drag();
        let Some(snapshot) = self.history.redo() else {
            log::debug!("Nothing to redo");
            return false;
        };
        self.scene.restore(snapshot);
        self.after_restore();
        true
    }

    fn after_restore(&mut self) {
        self.guides.clear();
        let scene = &self.scene;
        self.selection = self.selection.filter(|&id| scene.object(id).is_some());
        log::debug!("Restored history entry {:?}", self.history.cursor());
    }

    /// Fill color for shapes created from now on.
    pub fn set_current_color(&mut self, color: SerializableColor) {
        self.factory.set_fill_color(color);
    }

    /// Change the fill of an existing object.
    pub fn set_fill(&mut self, id: ShapeId, color: SerializableColor) -> Result<(), SceneError> {
        self.cancel_drag();
        if !self
            .scene
            .update_object(id, &mut |shape| shape.style_mut().fill_color = Some(color))
        {
            return Err(SceneError::NotFound(id));
        }
        self.record("fill");
        Ok(())
    }

    /// Lock or unlock an object. Locked objects cannot be dragged.
    pub fn set_locked(&mut self, id: ShapeId, locked: bool) -> Result<(), SceneError> {
        self.cancel_drag();
        if !self.scene.update_object(id, &mut |shape| shape.set_locked(locked)) {
            return Err(SceneError::NotFound(id));
        }
        self.record("lock");
        Ok(())
    }

    /// Change the canvas background. Returns false if the color is unchanged.
    pub fn set_background_color(&mut self, color: SerializableColor) -> bool {
        self.cancel_drag();
        if self.scene.background_color() == color {
            return false;
        }
        self.scene.set_background_color(color);
        self.record("background");
        true
    }

    fn record(&mut self, reason: &str) {
        let snapshot = self.scene.snapshot();
        log::debug!("Recording {} ({} objects)", reason, snapshot.len());
        self.history.record(snapshot);
    }
}
