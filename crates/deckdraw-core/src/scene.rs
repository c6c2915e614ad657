//! Scene document and the interface the editor drives it through.

use crate::history::HistorySnapshot;
use crate::shapes::{SerializableColor, Shape, ShapeId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use uuid::Uuid;

/// Errors for id-addressed scene operations.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Object not found: {0}")]
    NotFound(ShapeId),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Everything the editor needs from the object store behind the canvas.
pub trait SceneModel {
    /// Object ids back to front.
    fn object_ids(&self) -> Vec<ShapeId>;

    fn object(&self, id: ShapeId) -> Option<&Shape>;

    /// Topmost object hit at `point`.
    fn object_at(&self, point: Point, tolerance: f64) -> Option<ShapeId>;

    fn bounds_of(&self, id: ShapeId) -> Option<Rect> {
        self.object(id).map(Shape::bounds)
    }

    /// Move an object so its bounding box starts at `top_left`.
    /// Returns false if the object does not exist.
    fn set_position(&mut self, id: ShapeId, top_left: Point) -> bool;

    /// Add an object on top of the stack.
    fn add_object(&mut self, shape: Shape) -> ShapeId;

    fn remove_object(&mut self, id: ShapeId) -> Option<Shape>;

    /// Mutate an object in place. Returns false if the object does not exist.
    fn update_object(&mut self, id: ShapeId, update: &mut dyn FnMut(&mut Shape)) -> bool;

    fn background_color(&self) -> SerializableColor;

    fn set_background_color(&mut self, color: SerializableColor);

    /// Capture the full scene state.
    fn snapshot(&self) -> HistorySnapshot;

    /// Replace the scene with a captured state.
    fn restore(&mut self, snapshot: &HistorySnapshot);

    /// Ask the host to redraw.
    fn request_render(&mut self);
}

/// In-memory scene: shapes keyed by id plus their stacking order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Unique document identifier.
    pub id: String,
    /// Document name.
    pub name: String,
    /// All shapes in the document, keyed by ID.
    pub shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    pub z_order: Vec<ShapeId>,
    pub background_color: SerializableColor,
    #[serde(skip)]
    needs_render: bool,
}

impl Default for SceneDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            shapes: HashMap::new(),
            z_order: Vec::new(),
            background_color: SerializableColor::white(),
            needs_render: false,
        }
    }

    pub fn with_background(mut self, color: SerializableColor) -> Self {
        self.background_color = color;
        self
    }

    /// Shapes back to front.
    pub fn shapes_ordered(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// All shapes under `point`, topmost first.
    pub fn shapes_at_point(&self, point: Point, tolerance: f64) -> Vec<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .filter(|id| {
                self.shapes
                    .get(*id)
                    .is_some_and(|shape| shape.hit_test(point, tolerance))
            })
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Report whether a redraw was requested since the last call, and reset the flag.
    pub fn take_render_request(&mut self) -> bool {
        std::mem::take(&mut self.needs_render)
    }

    /// Serialize document to JSON.
    pub fn to_json(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize document from JSON, repairing a z-order that disagrees with
    /// the shape map. Duplicate entries keep their first position.
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let mut doc: Self = serde_json::from_str(json)?;

        let before = doc.z_order.len();
        let shapes = &doc.shapes;
        let mut seen = HashSet::new();
        doc.z_order.retain(|id| shapes.contains_key(id) && seen.insert(*id));
        if doc.z_order.len() != before {
            log::warn!(
                "Dropped {} unknown or duplicate z-order entries",
                before - doc.z_order.len()
            );
        }

        let mut unordered: Vec<ShapeId> = doc
            .shapes
            .keys()
            .filter(|id| !doc.z_order.contains(*id))
            .copied()
            .collect();
        if !unordered.is_empty() {
            log::warn!("Appending {} shapes missing from z-order", unordered.len());
            unordered.sort();
            doc.z_order.extend(unordered);
        }

        Ok(doc)
    }
}

impl SceneModel for SceneDocument {
    fn object_ids(&self) -> Vec<ShapeId> {
        self.z_order.clone()
    }

    fn object(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    fn object_at(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        self.shapes_at_point(point, tolerance).into_iter().next()
    }

    fn set_position(&mut self, id: ShapeId, top_left: Point) -> bool {
        let Some(shape) = self.shapes.get_mut(&id) else {
            return false;
        };
        shape.set_position(top_left);
        self.needs_render = true;
        true
    }

    fn add_object(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        if self.shapes.insert(id, shape).is_none() {
            self.z_order.push(id);
        }
        self.needs_render = true;
        id
    }

    fn remove_object(&mut self, id: ShapeId) -> Option<Shape> {
        self.z_order.retain(|&shape_id| shape_id != id);
        let removed = self.shapes.remove(&id);
        if removed.is_some() {
            self.needs_render = true;
        }
        removed
    }

    fn update_object(&mut self, id: ShapeId, update: &mut dyn FnMut(&mut Shape)) -> bool {
        let Some(shape) = self.shapes.get_mut(&id) else {
            return false;
        };
        update(shape);
        self.needs_render = true;
        true
    }

    fn background_color(&self) -> SerializableColor {
        self.background_color
    }

    fn set_background_color(&mut self, color: SerializableColor) {
        self.background_color = color;
        self.needs_render = true;
    }

    fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot::new(self.shapes_ordered().cloned().collect(), self.background_color)
    }

    fn restore(&mut self, snapshot: &HistorySnapshot) {
        self.shapes.clear();
        self.z_order.clear();
        self.background_color = snapshot.background_color;
        for shape in &snapshot.objects {
            let id = shape.id();
            self.z_order.push(id);
            self.shapes.insert(id, shape.clone());
        }
        self.request_render();
    }

    fn request_render(&mut self) {
        self.needs_render = true;
    }
}
