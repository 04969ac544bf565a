//! Shape store: the ordered shape collection and its mutation operations.

use crate::shapes::{Shape, ShapeId, ShapeKind, ShapeStyle};
use crate::sync::DeltaEvent;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors from shape store operations.
///
/// These are local misuse errors (stale ids), recovered by the caller;
/// nothing here is transient or retriable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("shape not found: {0}")]
    NotFound(ShapeId),
}

/// Owns all shapes on the canvas.
///
/// Shapes are kept in insertion order (`z_order`, back to front), which is
/// also the render order. Every successful mutation queues a [`DeltaEvent`]
/// for the sync gateway; remote updates are applied through the
/// `apply_remote_*` methods, which bypass the queue so they are not echoed
/// back to the service they came from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShapeStore {
    /// All shapes, keyed by ID.
    shapes: HashMap<ShapeId, Shape>,
    /// Z-order of shapes (back to front).
    z_order: Vec<ShapeId>,
    /// Outbound deltas not yet drained by the gateway.
    #[serde(skip)]
    pending: Vec<DeltaEvent>,
}

impl ShapeStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shape from a descriptor, appending it to the z-order.
    ///
    /// Returns the freshly assigned id.
    pub fn create(&mut self, kind: ShapeKind, position: Point, style: ShapeStyle) -> ShapeId {
        self.insert(Shape::from_kind(kind, position, style))
    }

    /// Append an already-built shape.
    pub fn insert(&mut self, shape: Shape) -> ShapeId {
        let id = shape.id();
        self.pending.push(DeltaEvent::for_shape(&shape));
        self.z_order.push(id);
        self.shapes.insert(id, shape);
        id
    }

    /// Move a shape to a new canvas position.
    ///
    /// Positions must stay finite; a non-finite position leaves the shape
    /// where it is.
    pub fn move_to(&mut self, id: ShapeId, position: Point) -> Result<(), StoreError> {
        let shape = self.shapes.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if !position.is_finite() {
            log::warn!("dropping non-finite position update for shape {id}");
            return Ok(());
        }
        shape.set_position(position);
        self.pending.push(DeltaEvent::for_shape(shape));
        Ok(())
    }

    /// Remove a shape, preserving the order of the remaining shapes.
    pub fn remove(&mut self, id: ShapeId) -> Result<Shape, StoreError> {
        let shape = self.shapes.remove(&id).ok_or(StoreError::NotFound(id))?;
        self.z_order.retain(|&shape_id| shape_id != id);
        self.pending.push(DeltaEvent::ShapeRemoved { id });
        Ok(shape)
    }

    /// Get a shape by ID.
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    /// Iterate shapes in z-order (back to front), safe to render directly.
    pub fn list(&self) -> impl Iterator<Item = &Shape> {
        self.z_order.iter().filter_map(|id| self.shapes.get(id))
    }

    /// Find the front-most shape at a canvas point.
    pub fn shape_at(&self, point: Point, tolerance: f64) -> Option<ShapeId> {
        self.z_order
            .iter()
            .rev()
            .find(|&&id| {
                self.shapes
                    .get(&id)
                    .is_some_and(|s| s.hit_test(point, tolerance))
            })
            .copied()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Get the number of shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Take all queued outbound deltas, oldest first.
    pub fn drain_deltas(&mut self) -> Vec<DeltaEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Apply a remote shape creation or mutation (last-write-wins per field).
    ///
    /// Unknown ids are created as new shapes; known ids keep their z-order
    /// slot and take the remote position, geometry and style. No delta is
    /// queued for remote updates.
    pub fn apply_remote_changed(
        &mut self,
        id: ShapeId,
        kind: ShapeKind,
        position: Point,
        style: ShapeStyle,
    ) {
        if !position.is_finite() {
            log::warn!("dropping remote update with non-finite position for shape {id}");
            return;
        }
        let shape = Shape::from_kind_with_id(id, kind, position, style);
        if self.shapes.insert(id, shape).is_none() {
            self.z_order.push(id);
        }
    }

    /// Apply a remote shape removal. Removing an already-gone id is a no-op.
    pub fn apply_remote_removed(&mut self, id: ShapeId) {
        if self.shapes.remove(&id).is_some() {
            self.z_order.retain(|&shape_id| shape_id != id);
        }
    }

    /// Serialize the store to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a store from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
