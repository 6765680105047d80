use egui::Vec2;

use crate::error::SketchResult;
use crate::session::SketchSession;
use crate::tools::ToolKind;

/// Actions the UI issues against a sketch session
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SelectTool(ToolKind),
    /// Width in CSS pixels, 1..=50
    SetBrushWidth(u32),
    /// Hex color string, `#RRGGBB` or `#RGB`
    SetColor(String),
    /// Open or close the color picker overlay
    SetPickerOpen(bool),
    Undo,
    /// Erase the whole drawing (undoable)
    Clear,
    /// The canvas changed size on screen
    Resize { size: Vec2, pixels_per_point: f32 },
}

impl Command {
    pub fn execute(&self, session: &mut SketchSession) -> SketchResult<()> {
        match self {
            Command::SelectTool(kind) => session.select_tool(*kind),
            Command::SetBrushWidth(width) => session.set_brush_width(*width)?,
            Command::SetColor(color) => session.set_color(color)?,
            Command::SetPickerOpen(open) => session.set_picker_open(*open),
            Command::Undo => {
                session.undo();
            }
            Command::Clear => session.clear(),
            Command::Resize {
                size,
                pixels_per_point,
            } => session.resize(*size, *pixels_per_point),
        }
        Ok(())
    }
}
