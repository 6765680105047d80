use egui::{Pos2, Vec2};
use image::{Rgba, RgbaImage};

use crate::color::parse_hex_color;
use crate::command::Command;
use crate::config::SketchConfig;
use crate::error::SketchResult;
use crate::export::{ExportBackground, ExportedImage};
use crate::fill::FillOutcome;
use crate::grid::{self, GridLayer};
use crate::history::{History, HistoryState};
use crate::input::InputEvent;
use crate::stroke::Stroke;
use crate::surface::RasterSurface;
use crate::tools::{validate_brush_width, Tool, ToolKind};

/// Result of an undo request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    Restored,
    NothingToUndo,
}

/// One drawing session: the surface, its undo history and the tool state.
///
/// The UI keeps a reference to the session and drives it with
/// [`InputEvent`]s and [`Command`]s; all mutable drawing state lives here.
#[derive(Debug)]
pub struct SketchSession {
    surface: RasterSurface,
    grid: GridLayer,
    history: History,
    tool_kind: ToolKind,
    color: Rgba<u8>,
    brush_width: u32,
    picker_open: bool,
    /// The gesture in progress, if any
    stroke: Option<Stroke>,
    export_background: ExportBackground,
    /// Rendered grid, reused until the surface is resized
    grid_image: Option<RgbaImage>,
}

impl Default for SketchSession {
    fn default() -> Self {
        Self {
            surface: RasterSurface::new(),
            grid: GridLayer::default(),
            history: History::new(),
            tool_kind: ToolKind::Brush,
            color: Rgba([0, 0, 0, 255]),
            brush_width: 8,
            picker_open: false,
            stroke: None,
            export_background: ExportBackground::White,
            grid_image: None,
        }
    }
}

impl SketchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SketchConfig) -> SketchResult<Self> {
        Ok(Self {
            grid: config.grid_layer()?,
            history: History::with_limit(config.history_limit),
            tool_kind: config.default_tool,
            color: parse_hex_color(&config.color)?,
            brush_width: validate_brush_width(config.brush_width)?,
            export_background: config.export_background,
            ..Self::default()
        })
    }

    pub fn execute(&mut self, command: &Command) -> SketchResult<()> {
        log::debug!("Executing {:?}", command);
        command.execute(self)
    }

    // ---- surface -------------------------------------------------------

    /// Resize the surface; drawing and history are discarded
    pub fn resize(&mut self, size: Vec2, pixels_per_point: f32) {
        self.surface.resize(size, pixels_per_point);
        self.history.clear();
        self.stroke = None;
        self.grid_image = None;
    }

    /// Record where the surface's top-left corner sits on screen
    pub fn set_origin(&mut self, origin: Pos2) {
        self.surface.set_origin(origin);
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn grid(&self) -> &GridLayer {
        &self.grid
    }

    /// The drawing composited over the grid, for display only
    pub fn display_image(&mut self) -> Option<RgbaImage> {
        let buffer = self.surface.buffer()?;
        let (width, height) = buffer.dimensions();
        let scale = self.surface.scale();
        let grid = &self.grid;
        let background = self
            .grid_image
            .get_or_insert_with(|| grid.render(width, height, scale));
        Some(grid::composite(background, buffer))
    }

    // ---- tool state ----------------------------------------------------

    pub fn tool(&self) -> Tool {
        Tool::new(self.tool_kind, self.color, self.brush_width)
    }

    pub fn tool_kind(&self) -> ToolKind {
        self.tool_kind
    }

    pub fn select_tool(&mut self, kind: ToolKind) {
        if kind != self.tool_kind {
            log::info!("Tool changed: {} -> {}", self.tool_kind.name(), kind.name());
        }
        self.tool_kind = kind;
    }

    pub fn brush_width(&self) -> u32 {
        self.brush_width
    }

    pub fn set_brush_width(&mut self, width: u32) -> SketchResult<()> {
        self.brush_width = validate_brush_width(width)?;
        Ok(())
    }

    pub fn color(&self) -> Rgba<u8> {
        self.color
    }

    pub fn set_color(&mut self, hex: &str) -> SketchResult<()> {
        self.color = parse_hex_color(hex)?;
        Ok(())
    }

    pub fn picker_open(&self) -> bool {
        self.picker_open
    }

    /// Opening the picker abandons any gesture in progress
    pub fn set_picker_open(&mut self, open: bool) {
        if open {
            self.stroke = None;
        }
        self.picker_open = open;
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_some()
    }

    // ---- input ---------------------------------------------------------

    /// Route one input event. Returns true if any pixel changed.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        if self.picker_open {
            log::trace!("Ignoring {:?} while the color picker is open", event);
            return false;
        }

        let local = self.surface.to_local_point(event.position());
        let touch_id = event.touch_id();

        match event {
            InputEvent::PointerDown { .. } | InputEvent::TouchStart { .. } => {
                self.begin_gesture(local, touch_id)
            }
            InputEvent::PointerMove { .. } | InputEvent::TouchMove { .. } => {
                self.continue_gesture(local, touch_id)
            }
            InputEvent::PointerUp { .. }
            | InputEvent::PointerLeave { .. }
            | InputEvent::TouchEnd { .. }
            | InputEvent::TouchCancel { .. } => {
                self.end_gesture(touch_id);
                false
            }
        }
    }

    fn begin_gesture(&mut self, local: Pos2, touch_id: Option<u64>) -> bool {
        if self.stroke.is_some() || !self.surface.is_ready() || !self.surface.contains(local) {
            return false;
        }

        let tool = self.tool();
        match (tool.paint(), tool.width()) {
            (Some(paint), Some(width)) => {
                if let Some(buffer) = self.surface.buffer() {
                    self.history.snapshot(buffer);
                }
                self.stroke = Some(Stroke::begin(local, touch_id));
                // A press without movement still leaves a dot
                self.surface.draw_segment(local, local, width as f32, paint) > 0
            }
            _ => !self.flood_fill(local).is_noop(),
        }
    }

    fn continue_gesture(&mut self, local: Pos2, touch_id: Option<u64>) -> bool {
        let tool = self.tool();
        let Some(stroke) = &mut self.stroke else {
            log::trace!("Ignoring move at {:?} with no active gesture", local);
            return false;
        };
        if stroke.touch_id() != touch_id {
            return false;
        }
        let (Some(paint), Some(width)) = (tool.paint(), tool.width()) else {
            return false;
        };
        let (from, to) = stroke.advance(local);
        self.surface.draw_segment(from, to, width as f32, paint) > 0
    }

    fn end_gesture(&mut self, touch_id: Option<u64>) {
        if self.stroke.is_some_and(|s| s.touch_id() == touch_id) {
            self.stroke = None;
        }
    }

    // ---- operations ----------------------------------------------------

    /// Fill the region under a surface-local point with the current color.
    ///
    /// A snapshot is pushed only when the fill will actually change pixels.
    pub fn flood_fill(&mut self, local: Pos2) -> FillOutcome {
        let Some(target) = self.surface.fill_target(local) else {
            return FillOutcome::default();
        };
        if target == self.color {
            return FillOutcome::default();
        }
        if let Some(buffer) = self.surface.buffer() {
            self.history.snapshot(buffer);
        }
        self.surface.fill(local, self.color)
    }

    /// Restore the most recent snapshot
    pub fn undo(&mut self) -> UndoOutcome {
        self.stroke = None;
        match self.history.undo() {
            Some(snapshot) => {
                if !self.surface.restore(&snapshot) {
                    return UndoOutcome::NothingToUndo;
                }
                log::info!("Undo ({} steps remaining)", self.history.len());
                UndoOutcome::Restored
            }
            None => UndoOutcome::NothingToUndo,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn history_state(&self) -> HistoryState {
        self.history.state()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Erase the drawing; the previous content stays on the undo stack
    pub fn clear(&mut self) {
        let Some(buffer) = self.surface.buffer() else {
            return;
        };
        self.history.snapshot(buffer);
        self.stroke = None;
        self.surface.clear();
        log::info!("Canvas cleared");
    }

    /// Flatten and encode the drawing for the query service
    pub fn export(&self) -> SketchResult<ExportedImage> {
        self.surface.export(self.export_background)
    }

    pub fn export_background(&self) -> ExportBackground {
        self.export_background
    }

    pub fn set_export_background(&mut self, background: ExportBackground) {
        self.export_background = background;
    }
}
