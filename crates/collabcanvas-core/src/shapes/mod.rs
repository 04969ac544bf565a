//! Shape definitions for the canvas.

mod circle;
mod rectangle;
mod text;

pub use circle::Circle;
pub use rectangle::Rectangle;
pub use text::Text;

use kurbo::{BezPath, Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse a hex color string (`#rgb`, `#rrggbb` or `#rrggbbaa`).
    ///
    /// Unparseable input falls back to black, matching how upstream style
    /// strings are treated.
    pub fn from_hex(color: &str) -> Self {
        if let Some(hex) = color.strip_prefix('#') {
            let hex = hex.trim();
            match hex.len() {
                3 => {
                    let r = u8::from_str_radix(&hex[0..1], 16).unwrap_or(0) * 17;
                    let g = u8::from_str_radix(&hex[1..2], 16).unwrap_or(0) * 17;
                    let b = u8::from_str_radix(&hex[2..3], 16).unwrap_or(0) * 17;
                    return Self::new(r, g, b, 255);
                }
                6 => {
                    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                    return Self::new(r, g, b, 255);
                }
                8 => {
                    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                    let a = u8::from_str_radix(&hex[6..8], 16).unwrap_or(255);
                    return Self::new(r, g, b, a);
                }
                _ => {}
            }
        }
        Self::black()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Style properties for shapes.
///
/// Immutable after creation: drags move a shape, they never restyle it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Fill color.
    pub fill: SerializableColor,
    /// Drop shadow blur radius (None = no shadow).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_blur: Option<f64>,
}

impl ShapeStyle {
    /// Shadow blur applied to newly placed shapes.
    pub const DEFAULT_SHADOW_BLUR: f64 = 10.0;

    /// Create a solid style with no shadow.
    pub fn solid(fill: SerializableColor) -> Self {
        Self {
            fill,
            shadow_blur: None,
        }
    }

    /// Get the fill color as a peniko Color.
    pub fn fill(&self) -> Color {
        self.fill.into()
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: SerializableColor::from_hex("#4C5FD5"),
            shadow_blur: Some(Self::DEFAULT_SHADOW_BLUR),
        }
    }
}

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Wire-facing shape descriptor: the variant plus its geometric parameters.
///
/// This is what travels in delta events; `position` and `style` are carried
/// alongside it, so a remote peer can reconstruct the full shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeKind {
    Rectangle { width: f64, height: f64 },
    Circle { radius: f64 },
    Text { content: String },
}

impl ShapeKind {
    /// Default-sized rectangle descriptor.
    pub fn rectangle() -> Self {
        Self::Rectangle {
            width: Rectangle::DEFAULT_WIDTH,
            height: Rectangle::DEFAULT_HEIGHT,
        }
    }

    /// Default-sized circle descriptor.
    pub fn circle() -> Self {
        Self::Circle {
            radius: Circle::DEFAULT_RADIUS,
        }
    }

    /// Empty text descriptor.
    pub fn text() -> Self {
        Self::Text {
            content: String::new(),
        }
    }
}

/// Common trait for all shapes.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Get the bounding box in canvas coordinates.
    fn bounds(&self) -> Rect;

    /// Check if a point (in canvas coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;

    /// Get the drag anchor position in canvas coordinates.
    fn position(&self) -> Point;

    /// Move the drag anchor to a new canvas position.
    fn set_position(&mut self, position: Point);

    /// Get the outline path for the rendering layer.
    fn to_path(&self) -> BezPath;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;
}

/// Enum wrapper for all shape types (for storage and serialization).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Rectangle),
    Circle(Circle),
    Text(Text),
}

impl Shape {
    /// Build a shape from a wire descriptor with a fresh id.
    pub fn from_kind(kind: ShapeKind, position: Point, style: ShapeStyle) -> Self {
        Self::from_kind_with_id(Uuid::new_v4(), kind, position, style)
    }

    /// Build a shape from a wire descriptor, keeping a remote peer's id.
    pub fn from_kind_with_id(
        id: ShapeId,
        kind: ShapeKind,
        position: Point,
        style: ShapeStyle,
    ) -> Self {
        match kind {
            ShapeKind::Rectangle { width, height } => {
                let mut rect = Rectangle::new(position, width, height);
                rect.id = id;
                rect.style = style;
                Shape::Rectangle(rect)
            }
            ShapeKind::Circle { radius } => {
                let mut circle = Circle::new(position, radius);
                circle.id = id;
                circle.style = style;
                Shape::Circle(circle)
            }
            ShapeKind::Text { content } => {
                let mut text = Text::new(position, content);
                text.id = id;
                text.style = style;
                Shape::Text(text)
            }
        }
    }

    /// Get the wire descriptor for this shape.
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(s) => ShapeKind::Rectangle {
                width: s.width,
                height: s.height,
            },
            Shape::Circle(s) => ShapeKind::Circle { radius: s.radius },
            Shape::Text(s) => ShapeKind::Text {
                content: s.content.clone(),
            },
        }
    }

    pub fn id(&self) -> ShapeId {
        match self {
            Shape::Rectangle(s) => s.id(),
            Shape::Circle(s) => s.id(),
            Shape::Text(s) => s.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rectangle(s) => s.bounds(),
            Shape::Circle(s) => s.bounds(),
            Shape::Text(s) => s.bounds(),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            Shape::Rectangle(s) => s.hit_test(point, tolerance),
            Shape::Circle(s) => s.hit_test(point, tolerance),
            Shape::Text(s) => s.hit_test(point, tolerance),
        }
    }

    pub fn position(&self) -> Point {
        match self {
            Shape::Rectangle(s) => s.position(),
            Shape::Circle(s) => s.position(),
            Shape::Text(s) => s.position(),
        }
    }

    pub fn set_position(&mut self, position: Point) {
        match self {
            Shape::Rectangle(s) => s.set_position(position),
            Shape::Circle(s) => s.set_position(position),
            Shape::Text(s) => s.set_position(position),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Shape::Rectangle(s) => s.to_path(),
            Shape::Circle(s) => s.to_path(),
            Shape::Text(s) => s.to_path(),
        }
    }

    pub fn style(&self) -> &ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style(),
            Shape::Circle(s) => s.style(),
            Shape::Text(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        match self {
            Shape::Rectangle(s) => s.style_mut(),
            Shape::Circle(s) => s.style_mut(),
            Shape::Text(s) => s.style_mut(),
        }
    }
}
