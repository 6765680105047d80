use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::{SketchError, SketchResult};
use crate::stroke::Paint;

pub const MIN_BRUSH_WIDTH: u32 = 1;
pub const MAX_BRUSH_WIDTH: u32 = 50;

/// Which tool the user has picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Fill,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Brush, ToolKind::Eraser, ToolKind::Fill];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Brush => "Brush",
            ToolKind::Eraser => "Eraser",
            ToolKind::Fill => "Fill",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ToolKind::Brush => "🖌",
            ToolKind::Eraser => "⌫",
            ToolKind::Fill => "🪣",
        }
    }
}

/// The active tool together with the settings it draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Brush { color: Rgba<u8>, width: u32 },
    Eraser { color: Rgba<u8>, width: u32 },
    Fill { color: Rgba<u8> },
}

impl Tool {
    pub fn new(kind: ToolKind, color: Rgba<u8>, width: u32) -> Self {
        match kind {
            ToolKind::Brush => Tool::Brush { color, width },
            ToolKind::Eraser => Tool::Eraser { color, width },
            ToolKind::Fill => Tool::Fill { color },
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Tool::Brush { .. } => ToolKind::Brush,
            Tool::Eraser { .. } => ToolKind::Eraser,
            Tool::Fill { .. } => ToolKind::Fill,
        }
    }

    pub fn color(&self) -> Rgba<u8> {
        match self {
            Tool::Brush { color, .. } | Tool::Eraser { color, .. } | Tool::Fill { color } => *color,
        }
    }

    /// Line width for stroking tools
    pub fn width(&self) -> Option<u32> {
        match self {
            Tool::Brush { width, .. } | Tool::Eraser { width, .. } => Some(*width),
            Tool::Fill { .. } => None,
        }
    }

    /// How a stroke made with this tool affects pixels
    pub fn paint(&self) -> Option<Paint> {
        match self {
            Tool::Brush { color, .. } => Some(Paint::Color(*color)),
            Tool::Eraser { .. } => Some(Paint::Erase),
            Tool::Fill { .. } => None,
        }
    }
}

pub fn validate_brush_width(width: u32) -> SketchResult<u32> {
    if (MIN_BRUSH_WIDTH..=MAX_BRUSH_WIDTH).contains(&width) {
        Ok(width)
    } else {
        Err(SketchError::InvalidBrushWidth(width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_carries_settings() {
        let red = Rgba([255, 0, 0, 255]);
        let brush = Tool::new(ToolKind::Brush, red, 8);
        assert_eq!(brush.width(), Some(8));
        assert_eq!(brush.paint(), Some(Paint::Color(red)));

        let eraser = Tool::new(ToolKind::Eraser, red, 12);
        assert_eq!(eraser.paint(), Some(Paint::Erase));
        assert_eq!(eraser.color(), red);

        let fill = Tool::new(ToolKind::Fill, red, 8);
        assert_eq!(fill.width(), None);
        assert_eq!(fill.paint(), None);
        assert_eq!(fill.kind(), ToolKind::Fill);
    }

    #[test]
    fn test_brush_width_bounds() {
        assert!(validate_brush_width(1).is_ok());
        assert!(validate_brush_width(50).is_ok());
        assert!(matches!(validate_brush_width(0), Err(SketchError::InvalidBrushWidth(0))));
        assert!(matches!(validate_brush_width(51), Err(SketchError::InvalidBrushWidth(51))));
    }
}
