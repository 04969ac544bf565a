//! Camera module for pan/zoom transforms.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed zoom scale.
pub const MIN_SCALE: f64 = 0.6;
/// Largest allowed zoom scale.
pub const MAX_SCALE: f64 = 2.0;
/// Multiplicative step applied per wheel tick.
pub const ZOOM_FACTOR: f64 = 1.05;

/// Clamp a candidate scale into `[min, max]`.
///
/// Pure and idempotent: values already in range pass through unchanged.
pub fn clamp_scale(candidate: f64, min: f64, max: f64) -> f64 {
    candidate.clamp(min, max)
}

/// Camera manages the view transform for the canvas.
///
/// It handles panning (translation) and zooming (scaling) operations,
/// converting between screen coordinates and canvas coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan), in screen-space units.
    pub offset: Vec2,
    /// Current zoom scale.
    pub scale: f64,
    /// Minimum allowed scale.
    pub min_scale: f64,
    /// Maximum allowed scale.
    pub max_scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            scale: 1.0,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the affine transform for rendering.
    ///
    /// This transform converts canvas coordinates to screen coordinates.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Get the inverse transform for input handling.
    ///
    /// This transform converts screen coordinates to canvas coordinates.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to canvas coordinates.
    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a canvas point to screen coordinates.
    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Pan the camera by a delta in screen coordinates.
    ///
    /// The offset is unbounded; only scale is clamped.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Apply one wheel tick of zoom, anchored at the viewport origin.
    ///
    /// Scrolling down (`delta_y > 0`) zooms out, anything else zooms in.
    /// Returns true if the scale actually changed.
    pub fn wheel_zoom(&mut self, delta_y: f64) -> bool {
        let candidate = if delta_y > 0.0 {
            self.scale / ZOOM_FACTOR
        } else {
            self.scale * ZOOM_FACTOR
        };
        let new_scale = clamp_scale(candidate, self.min_scale, self.max_scale);
        if (new_scale - self.scale).abs() < f64::EPSILON {
            return false;
        }
        self.scale = new_scale;
        true
    }

    /// Reset camera to default position and scale.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.scale = 1.0;
    }
}
