//! Tool system: the flat tool state machine that routes pointer input.

use crate::shapes::{ShapeKind, ShapeStyle};
use serde::{Deserialize, Serialize};

/// Available tools.
///
/// A flat enumeration: any tool can follow any other, transitions happen
/// only through explicit user selection, and the session starts on
/// `Select`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Circle,
    Text,
}

impl ToolKind {
    /// The default-sized shape descriptor this tool places, if any.
    pub fn placement_kind(&self) -> Option<ShapeKind> {
        match self {
            ToolKind::Select => None,
            ToolKind::Rectangle => Some(ShapeKind::rectangle()),
            ToolKind::Circle => Some(ShapeKind::circle()),
            ToolKind::Text => Some(ShapeKind::text()),
        }
    }
}

/// Tracks the active tool and the style applied to newly placed shapes.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Style applied to new shapes.
    pub current_style: ShapeStyle,
}

impl ToolManager {
    /// Create a new tool manager with the select tool active.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool (explicit user action only).
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
    }

    /// Whether the active tool places shapes on empty-canvas clicks.
    pub fn is_placement(&self) -> bool {
        self.current_tool.placement_kind().is_some()
    }

    /// A placement was committed; the tool reverts to `Select`.
    ///
    /// One placement per tool activation: repeated placement requires
    /// re-picking the tool.
    pub fn placement_committed(&mut self) {
        self.current_tool = ToolKind::Select;
    }
}
