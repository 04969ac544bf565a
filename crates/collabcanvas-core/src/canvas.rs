//! Canvas session state and pointer event routing.

use crate::camera::{Camera, clamp_scale};
use crate::input::{MouseButton, PointerEvent};
use crate::shapes::ShapeId;
use crate::store::ShapeStore;
use crate::sync::DeltaEvent;
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Vec2};

/// Hit-test tolerance in screen pixels, divided by the current scale so
/// shapes stay equally grabbable at any zoom level.
pub const HIT_TOLERANCE: f64 = 4.0;

/// A single continuous pointer interaction, press to release or cancel.
#[derive(Debug, Clone, Default, PartialEq)]
enum Gesture {
    #[default]
    Idle,
    /// Dragging a shape with the select tool.
    DragShape {
        id: ShapeId,
        /// Committed position to restore on cancel.
        start_position: Point,
        /// Canvas-space offset from the pointer to the shape's anchor,
        /// kept constant so the shape does not jump under the pointer.
        grab_offset: Vec2,
    },
    /// Panning the viewport from empty canvas.
    Pan {
        /// Committed offset to restore on cancel.
        start_offset: Vec2,
        start_pointer: Point,
    },
}

/// Runtime canvas session: camera, shapes, tools and the in-flight gesture.
///
/// All pointer and wheel input funnels through [`Canvas::handle_pointer`],
/// one event at a time in host delivery order. Nothing here blocks,
/// suspends or performs I/O.
#[derive(Debug, Default)]
pub struct Canvas {
    /// Camera for the view transform.
    pub camera: Camera,
    /// The shape collection.
    pub store: ShapeStore,
    /// Tool state machine.
    pub tools: ToolManager,
    /// In-flight gesture, if any.
    gesture: Gesture,
    /// Committed viewport deltas not yet drained by the gateway.
    pending: Vec<DeltaEvent>,
}

impl Canvas {
    /// Create a new canvas session with an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool (explicit user action).
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tools.set_tool(tool);
    }

    /// Whether a gesture is currently in flight.
    pub fn is_gesture_active(&self) -> bool {
        self.gesture != Gesture::Idle
    }

    /// Hit tolerance in canvas units at the current zoom.
    fn hit_tolerance(&self) -> f64 {
        HIT_TOLERANCE / self.camera.scale
    }

    /// Reduce one pointer or wheel event.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
            } => self.pointer_up(position),
            PointerEvent::Cancel => self.pointer_cancel(),
            PointerEvent::Scroll { delta, .. } => {
                if self.camera.wheel_zoom(delta.y) {
                    self.pending.push(DeltaEvent::for_viewport(&self.camera));
                }
            }
            // Secondary buttons are not routed anywhere yet
            PointerEvent::Down { .. } | PointerEvent::Up { .. } => {}
        }
    }

    fn pointer_down(&mut self, position: Point) {
        let canvas_point = self.camera.screen_to_canvas(position);
        let tolerance = self.hit_tolerance();

        if let Some(kind) = self.tools.current_tool.placement_kind() {
            // Placement tools only act on empty canvas
            if self.store.shape_at(canvas_point, tolerance).is_none() {
                self.store
                    .create(kind, canvas_point, self.tools.current_style);
                self.tools.placement_committed();
            }
            return;
        }

        match self.store.shape_at(canvas_point, tolerance) {
            Some(id) => {
                if let Some(shape) = self.store.get(id) {
                    let start_position = shape.position();
                    self.gesture = Gesture::DragShape {
                        id,
                        start_position,
                        grab_offset: start_position - canvas_point,
                    };
                }
            }
            None => {
                self.gesture = Gesture::Pan {
                    start_offset: self.camera.offset,
                    start_pointer: position,
                };
            }
        }
    }

    fn pointer_move(&mut self, position: Point) {
        match self.gesture {
            Gesture::DragShape { id, grab_offset, .. } => {
                let target = self.camera.screen_to_canvas(position) + grab_offset;
                if self.store.move_to(id, target).is_err() {
                    // Shape vanished mid-drag (e.g. removed remotely)
                    log::debug!("dragged shape {id} no longer exists, aborting gesture");
                    self.gesture = Gesture::Idle;
                }
            }
            Gesture::Pan {
                start_offset,
                start_pointer,
            } => {
                self.camera.offset = start_offset + (position - start_pointer);
            }
            Gesture::Idle => {}
        }
    }

    fn pointer_up(&mut self, position: Point) {
        match std::mem::take(&mut self.gesture) {
            Gesture::DragShape { .. } => {
                // Each drag move already committed and emitted its delta
            }
            Gesture::Pan {
                start_offset,
                start_pointer,
            } => {
                self.camera.offset = start_offset + (position - start_pointer);
                self.pending.push(DeltaEvent::for_viewport(&self.camera));
            }
            Gesture::Idle => {}
        }
    }

    /// Abort the in-flight gesture, restoring the pre-gesture committed
    /// state. No partial commit survives.
    fn pointer_cancel(&mut self) {
        match std::mem::take(&mut self.gesture) {
            Gesture::DragShape {
                id, start_position, ..
            } => {
                // Peers saw the live drag deltas; the restore emits too
                if let Err(err) = self.store.move_to(id, start_position) {
                    log::debug!("rollback skipped: {err}");
                }
            }
            Gesture::Pan { start_offset, .. } => {
                self.camera.offset = start_offset;
            }
            Gesture::Idle => {}
        }
    }

    /// Apply an externally-sourced delta as if it had originated locally.
    ///
    /// Last write wins at the field level; nothing is echoed back.
    pub fn apply_remote(&mut self, event: DeltaEvent) {
        match event {
            DeltaEvent::ShapeChanged {
                id,
                kind,
                position,
                style,
            } => {
                self.store.apply_remote_changed(id, kind, position, style);
            }
            DeltaEvent::ShapeRemoved { id } => {
                if matches!(self.gesture, Gesture::DragShape { id: drag_id, .. } if drag_id == id)
                {
                    self.gesture = Gesture::Idle;
                }
                self.store.apply_remote_removed(id);
            }
            DeltaEvent::ViewportChanged { scale, offset } => {
                self.camera.scale =
                    clamp_scale(scale, self.camera.min_scale, self.camera.max_scale);
                self.camera.offset = offset;
            }
        }
    }

    /// Take every outbound delta committed since the last drain, shape
    /// deltas first, then viewport deltas.
    pub fn drain_deltas(&mut self) -> Vec<DeltaEvent> {
        let mut deltas = self.store.drain_deltas();
        deltas.append(&mut self.pending);
        deltas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{MIN_SCALE, ZOOM_FACTOR};
    use crate::shapes::{Shape, ShapeKind, ShapeStyle};

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Up {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn scroll(delta_y: f64) -> PointerEvent {
        PointerEvent::Scroll {
            position: Point::ZERO,
            delta: Vec2::new(0.0, delta_y),
        }
    }

    fn canvas_with_rect() -> (Canvas, ShapeId) {
        let mut canvas = Canvas::new();
        let id = canvas.store.create(
            ShapeKind::rectangle(),
            Point::new(140.0, 80.0),
            ShapeStyle::default(),
        );
        canvas.drain_deltas();
        (canvas, id)
    }

    #[test]
    fn test_select_drag_moves_shape() {
        let (mut canvas, id) = canvas_with_rect();

        // Grab inside the rectangle, 10 units from its corner
        canvas.handle_pointer(down(150.0, 90.0));
        assert!(canvas.is_gesture_active());

        canvas.handle_pointer(moved(200.0, 120.0));
        canvas.handle_pointer(up(200.0, 120.0));

        // Shape followed the pointer, keeping the grab offset
        let shape = canvas.store.get(id).unwrap();
        assert_eq!(shape.position(), Point::new(190.0, 110.0));
        assert!(!canvas.is_gesture_active());

        let deltas = canvas.drain_deltas();
        assert!(deltas
            .iter()
            .all(|d| matches!(d, DeltaEvent::ShapeChanged { .. })));
        assert!(!deltas.is_empty());
    }

    #[test]
    fn test_drag_respects_zoom() {
        let (mut canvas, id) = canvas_with_rect();
        canvas.camera.scale = 2.0;

        // Rectangle corner (140, 80) sits at screen (280, 160)
        canvas.handle_pointer(down(300.0, 200.0));
        canvas.handle_pointer(moved(320.0, 220.0));
        canvas.handle_pointer(up(320.0, 220.0));

        // 20 screen pixels = 10 canvas units at scale 2
        let shape = canvas.store.get(id).unwrap();
        assert_eq!(shape.position(), Point::new(150.0, 90.0));
    }

    #[test]
    fn test_drag_cancel_rolls_back() {
        let (mut canvas, id) = canvas_with_rect();

        canvas.handle_pointer(down(150.0, 90.0));
        canvas.handle_pointer(moved(400.0, 400.0));
        canvas.handle_pointer(PointerEvent::Cancel);

        let shape = canvas.store.get(id).unwrap();
        assert_eq!(shape.position(), Point::new(140.0, 80.0));
        assert!(!canvas.is_gesture_active());
    }

    #[test]
    fn test_pan_from_empty_canvas() {
        let mut canvas = Canvas::new();

        canvas.handle_pointer(down(100.0, 100.0));
        canvas.handle_pointer(moved(130.0, 80.0));
        assert_eq!(canvas.camera.offset, Vec2::new(30.0, -20.0));

        canvas.handle_pointer(up(130.0, 80.0));
        assert_eq!(canvas.camera.offset, Vec2::new(30.0, -20.0));

        // Exactly one viewport delta on commit
        let deltas = canvas.drain_deltas();
        assert_eq!(
            deltas,
            vec![DeltaEvent::ViewportChanged {
                scale: 1.0,
                offset: Vec2::new(30.0, -20.0),
            }]
        );
    }

    #[test]
    fn test_pan_cancel_restores_offset() {
        let mut canvas = Canvas::new();
        canvas.camera.offset = Vec2::new(5.0, 5.0);

        canvas.handle_pointer(down(0.0, 0.0));
        canvas.handle_pointer(moved(50.0, 50.0));
        canvas.handle_pointer(PointerEvent::Cancel);

        assert_eq!(canvas.camera.offset, Vec2::new(5.0, 5.0));
        assert!(canvas.drain_deltas().is_empty());
    }

    #[test]
    fn test_wheel_zoom_emits_viewport_delta() {
        let mut canvas = Canvas::new();
        canvas.handle_pointer(scroll(120.0));
        assert!((canvas.camera.scale - 1.0 / ZOOM_FACTOR).abs() < 1e-12);

        let deltas = canvas.drain_deltas();
        assert_eq!(deltas.len(), 1);
        assert!(matches!(deltas[0], DeltaEvent::ViewportChanged { .. }));
    }

    #[test]
    fn test_wheel_zoom_at_floor_emits_nothing() {
        let mut canvas = Canvas::new();
        for _ in 0..20 {
            canvas.handle_pointer(scroll(120.0));
        }
        assert!((canvas.camera.scale - MIN_SCALE).abs() < f64::EPSILON);
        canvas.drain_deltas();

        canvas.handle_pointer(scroll(120.0));
        assert!(canvas.drain_deltas().is_empty());
    }

    #[test]
    fn test_circle_tool_places_at_canvas_point_and_reverts() {
        let mut canvas = Canvas::new();
        canvas.camera.offset = Vec2::new(40.0, 20.0);
        canvas.camera.scale = 1.25;
        canvas.set_tool(ToolKind::Circle);

        let screen = Point::new(240.0, 160.0);
        let expected = canvas.camera.screen_to_canvas(screen);
        canvas.handle_pointer(PointerEvent::Down {
            position: screen,
            button: MouseButton::Left,
        });

        assert_eq!(canvas.store.len(), 1);
        let shape = canvas.store.list().next().unwrap();
        assert!(matches!(shape, Shape::Circle(_)));
        assert!((shape.position().x - expected.x).abs() < 1e-10);
        assert!((shape.position().y - expected.y).abs() < 1e-10);
        assert_eq!(canvas.tools.current_tool, ToolKind::Select);

        // No gesture begins on a placement click
        assert!(!canvas.is_gesture_active());
    }

    #[test]
    fn test_placement_on_existing_shape_is_noop() {
        let (mut canvas, _) = canvas_with_rect();
        canvas.set_tool(ToolKind::Text);

        canvas.handle_pointer(down(150.0, 90.0));
        assert_eq!(canvas.store.len(), 1);
        // Tool stays armed since nothing was placed
        assert_eq!(canvas.tools.current_tool, ToolKind::Text);
    }

    #[test]
    fn test_creation_scenario_rect_then_circle() {
        let mut canvas = Canvas::new();
        canvas.set_tool(ToolKind::Rectangle);
        canvas.handle_pointer(down(140.0, 80.0));
        canvas.set_tool(ToolKind::Circle);
        // Place the circle outside the rectangle's footprint
        canvas.handle_pointer(down(320.0, 220.0));

        let shapes: Vec<&Shape> = canvas.store.list().collect();
        assert_eq!(shapes.len(), 2);
        assert!(matches!(shapes[0], Shape::Rectangle(_)));
        assert!(matches!(shapes[1], Shape::Circle(_)));
        assert_eq!(shapes[0].position(), Point::new(140.0, 80.0));
        assert_eq!(shapes[1].position(), Point::new(320.0, 220.0));
    }

    #[test]
    fn test_remote_shape_change_applies_without_echo() {
        let mut canvas = Canvas::new();
        let remote = DeltaEvent::ShapeChanged {
            id: uuid::Uuid::new_v4(),
            kind: ShapeKind::Circle { radius: 70.0 },
            position: Point::new(320.0, 220.0),
            style: ShapeStyle::default(),
        };
        canvas.apply_remote(remote);

        assert_eq!(canvas.store.len(), 1);
        assert!(canvas.drain_deltas().is_empty());
    }

    #[test]
    fn test_remote_viewport_change_is_clamped() {
        let mut canvas = Canvas::new();
        canvas.apply_remote(DeltaEvent::ViewportChanged {
            scale: 9.0,
            offset: Vec2::new(1.0, 2.0),
        });
        assert!((canvas.camera.scale - canvas.camera.max_scale).abs() < f64::EPSILON);
        assert_eq!(canvas.camera.offset, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_remote_removal_aborts_active_drag() {
        let (mut canvas, id) = canvas_with_rect();
        canvas.handle_pointer(down(150.0, 90.0));
        assert!(canvas.is_gesture_active());

        canvas.apply_remote(DeltaEvent::ShapeRemoved { id });
        assert!(!canvas.is_gesture_active());
        assert!(canvas.store.is_empty());

        // A stray move after the abort must not resurrect the shape
        canvas.handle_pointer(moved(200.0, 200.0));
        assert!(canvas.store.is_empty());
    }

    #[test]
    fn test_right_button_is_ignored() {
        let (mut canvas, id) = canvas_with_rect();
        canvas.handle_pointer(PointerEvent::Down {
            position: Point::new(150.0, 90.0),
            button: MouseButton::Right,
        });
        assert!(!canvas.is_gesture_active());
        canvas.handle_pointer(moved(300.0, 300.0));
        assert_eq!(canvas.store.get(id).unwrap().position(), Point::new(140.0, 80.0));
    }
}
