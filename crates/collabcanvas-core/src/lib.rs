//! Collabcanvas Core Library
//!
//! Platform-agnostic viewport and shape interaction engine for the
//! Collabcanvas multi-user whiteboard: coordinate transforms, the shape
//! store, the tool state machine, and the sync gateway boundary.
//! Rendering, chrome, transport and authentication live in external
//! collaborators that consume this crate.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod input;
pub mod shapes;
pub mod store;
pub mod sync;
pub mod tools;

pub use camera::{Camera, MAX_SCALE, MIN_SCALE, ZOOM_FACTOR, clamp_scale};
pub use canvas::Canvas;
pub use config::{ConfigError, IdentityConfig, SyncConfig};
pub use input::{MouseButton, PointerEvent};
pub use shapes::{
    Circle, Rectangle, SerializableColor, Shape, ShapeId, ShapeKind, ShapeStyle, ShapeTrait, Text,
};
pub use store::{ShapeStore, StoreError};
pub use sync::{ConnectionState, DeltaEvent, Participant, SyncGateway};
pub use tools::{ToolKind, ToolManager};
