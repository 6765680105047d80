use egui::{pos2, vec2, Color32, Rect, Sense};

use crate::color::{from_color32, parse_hex_color, to_color32, to_hex};
use crate::command::Command;
use crate::config::SketchConfig;
use crate::error::SketchError;
use crate::export::{ExportedImage, QueryRequest};
use crate::input::InputHandler;
use crate::session::SketchSession;
use crate::texture_manager::{to_color_image, TextureGenerationError, TextureManager};
use crate::tools::{ToolKind, MAX_BRUSH_WIDTH, MIN_BRUSH_WIDTH};

const ACCENT: Color32 = Color32::from_rgb(0x00, 0x80, 0x60);

/// Height of the status line above the search button
const STATUS_HEIGHT: f32 = 18.0;

/// We derive Deserialize/Serialize so tool settings survive a restart.
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct SketchApp {
    config: SketchConfig,
    #[serde(skip)]
    session: SketchSession,
    #[serde(skip)]
    input: InputHandler,
    #[serde(skip)]
    textures: TextureManager,
    /// Message shown above the search button
    #[serde(skip)]
    status: Option<String>,
    #[serde(skip)]
    last_export: Option<ExportedImage>,
}

impl Default for SketchApp {
    fn default() -> Self {
        Self::with_config(SketchConfig::default())
    }
}

impl SketchApp {
    /// Called once before the first frame.
    ///
    /// An explicit `config` wins over settings persisted by a previous run.
    pub fn new(cc: &eframe::CreationContext<'_>, config: Option<SketchConfig>) -> Self {
        let config = config
            .or_else(|| {
                cc.storage
                    .and_then(|storage| eframe::get_value::<SketchApp>(storage, eframe::APP_KEY))
                    .map(|app| app.config)
            })
            .unwrap_or_default();
        Self::with_config(config)
    }

    pub fn with_config(config: SketchConfig) -> Self {
        let session = SketchSession::from_config(&config).unwrap_or_else(|err| {
            log::warn!("Invalid configuration, using defaults: {}", err);
            SketchSession::new()
        });
        Self {
            config,
            session,
            input: InputHandler::default(),
            textures: TextureManager::new(),
            status: None,
            last_export: None,
        }
    }

    pub fn session(&self) -> &SketchSession {
        &self.session
    }

    pub fn last_export(&self) -> Option<&ExportedImage> {
        self.last_export.as_ref()
    }

    fn run(&mut self, command: Command) {
        if let Err(err) = self.session.execute(&command) {
            log::warn!("{:?} failed: {}", command, err);
            self.status = Some(err.to_string());
        }
    }

    /// Export the sketch and prepare the request for the query service
    fn search(&mut self) {
        match self.session.export() {
            Ok(export) => {
                match QueryRequest::new(&export).to_json() {
                    Ok(body) => {
                        log::info!(
                            "Prepared query request for {} ({} bytes)",
                            export.id,
                            body.len()
                        );
                        self.status = Some(format!(
                            "Sketch captured ({}x{}), searching...",
                            export.width, export.height
                        ));
                    }
                    Err(err) => {
                        log::error!("Failed to serialize query request: {}", err);
                        self.status = Some(format!("Error: {err}. Please try again."));
                    }
                }
                self.last_export = Some(export);
            }
            Err(SketchError::EmptyDrawing) => {
                self.status = Some("Please draw something first.".to_string());
            }
            Err(err) => {
                log::error!("Search failed: {}", err);
                self.status = Some(format!("Error capturing drawing: {err}"));
            }
        }
    }

    /// Copy the live tool settings back into the persisted config
    fn sync_config(&mut self) {
        self.config.default_tool = self.session.tool_kind();
        self.config.brush_width = self.session.brush_width();
        self.config.color = to_hex(self.session.color());
    }

    fn toolbar(&self, ui: &mut egui::Ui, commands: &mut Vec<Command>) {
        ui.horizontal(|ui| {
            for kind in ToolKind::ALL {
                let label = format!("{} {}", kind.icon(), kind.name());
                if ui.selectable_label(self.session.tool_kind() == kind, label).clicked() {
                    commands.push(Command::SelectTool(kind));
                }
            }

            ui.separator();

            if ui.button("🎨 Color").clicked() {
                commands.push(Command::SetPickerOpen(!self.session.picker_open()));
            }
            let (swatch, _) = ui.allocate_exact_size(vec2(18.0, 18.0), Sense::hover());
            ui.painter().rect_filled(swatch, 3.0, to_color32(self.session.color()));

            ui.separator();

            if ui
                .add_enabled(self.session.can_undo(), egui::Button::new("⟲ Undo"))
                .clicked()
            {
                commands.push(Command::Undo);
            }
            if ui.button("🗑 Clear").clicked() {
                commands.push(Command::Clear);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Brush Size:");
            let mut width = self.session.brush_width();
            let slider =
                egui::Slider::new(&mut width, MIN_BRUSH_WIDTH..=MAX_BRUSH_WIDTH).suffix("px");
            if ui.add(slider).changed() {
                commands.push(Command::SetBrushWidth(width));
            }
        });
    }

    fn color_picker(&self, ctx: &egui::Context, commands: &mut Vec<Command>) {
        egui::Window::new("Color")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("palette_grid").spacing([6.0, 6.0]).show(ui, |ui| {
                    for (i, swatch) in self.config.palette.iter().enumerate() {
                        let Ok(color) = parse_hex_color(swatch) else {
                            continue;
                        };
                        let button = egui::Button::new("")
                            .fill(to_color32(color))
                            .min_size(vec2(28.0, 28.0));
                        if ui.add(button).on_hover_text(swatch).clicked() {
                            commands.push(Command::SetColor(swatch.clone()));
                            commands.push(Command::SetPickerOpen(false));
                        }
                        if i % 4 == 3 {
                            ui.end_row();
                        }
                    }
                });

                ui.separator();

                let mut custom = to_color32(self.session.color());
                if egui::color_picker::color_edit_button_srgba(
                    ui,
                    &mut custom,
                    egui::color_picker::Alpha::Opaque,
                )
                .changed()
                {
                    commands.push(Command::SetColor(to_hex(from_color32(custom))));
                }

                if ui.button("Close").clicked() {
                    commands.push(Command::SetPickerOpen(false));
                }
            });
    }
}

impl eframe::App for SketchApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.sync_config();
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show_panels(ctx);
    }
}

impl SketchApp {
    fn show_panels(&mut self, ctx: &egui::Context) {
        let mut commands = Vec::new();

        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z)) {
            commands.push(Command::Undo);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(4.0);
            self.toolbar(ui, &mut commands);
            ui.add_space(4.0);
        });

        if self.session.picker_open() {
            self.color_picker(ctx, &mut commands);
        }

        let mut search_clicked = false;
        egui::TopBottomPanel::bottom("search_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            // The row is always reserved so a new message never shrinks the canvas
            let status = self.status.as_deref().unwrap_or_default();
            ui.add_sized(
                [ui.available_width(), STATUS_HEIGHT],
                egui::Label::new(status).truncate(),
            );
            let label = egui::RichText::new("Search Products").color(Color32::WHITE);
            let button = egui::Button::new(label)
                .fill(ACCENT)
                .min_size(vec2(ui.available_width(), 32.0));
            search_clicked = ui.add(button).clicked();
            ui.add_space(4.0);
        });

        for command in commands {
            self.run(command);
        }
        if search_clicked {
            self.search();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::drag());
            let rect = response.rect;

            let pixels_per_point = ctx.pixels_per_point();
            let surface = self.session.surface();
            if surface.size() != rect.size() || surface.scale() != pixels_per_point {
                let resize = Command::Resize {
                    size: rect.size(),
                    pixels_per_point,
                };
                if let Err(err) = self.session.execute(&resize) {
                    log::warn!("Resize failed: {}", err);
                }
            }
            self.session.set_origin(rect.min);
            self.input.set_canvas_rect(rect);

            for event in self.input.process_input(ctx) {
                self.session.handle_event(event);
            }

            let revision = self.session.surface().revision();
            let session = &mut self.session;
            let texture = self.textures.get_or_update(ctx, revision, || {
                session
                    .display_image()
                    .ok_or(TextureGenerationError::Unavailable)
                    .and_then(|image| to_color_image(&image))
            });

            match texture {
                Ok(texture_id) => {
                    let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
                    painter.image(texture_id, rect, uv, Color32::WHITE);
                }
                Err(err) => {
                    log::trace!("Canvas texture unavailable: {}", err);
                    painter.rect_filled(rect, 0.0, Color32::WHITE);
                }
            }

            if response.hovered() {
                ctx.set_cursor_icon(egui::CursorIcon::Crosshair);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputEvent;

    #[test]
    fn test_search_without_drawing_prompts_user() {
        let mut app = SketchApp::default();
        app.run(Command::Resize {
            size: vec2(40.0, 40.0),
            pixels_per_point: 1.0,
        });
        app.search();
        assert_eq!(app.status.as_deref(), Some("Please draw something first."));
        assert!(app.last_export().is_none());
    }

    #[test]
    fn test_search_after_drawing_exports() {
        let mut app = SketchApp::default();
        app.run(Command::Resize {
            size: vec2(40.0, 40.0),
            pixels_per_point: 1.0,
        });
        app.session.handle_event(InputEvent::PointerDown { position: pos2(10.0, 10.0) });
        app.session.handle_event(InputEvent::PointerUp { position: pos2(10.0, 10.0) });
        app.search();
        let export = app.last_export().unwrap();
        assert_eq!((export.width, export.height), (40, 40));
    }

    fn run_frame(app: &mut SketchApp, ctx: &egui::Context) {
        let input = egui::RawInput {
            screen_rect: Some(Rect::from_min_size(pos2(0.0, 0.0), vec2(900.0, 700.0))),
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| app.show_panels(ctx));
    }

    #[test]
    fn test_status_message_keeps_drawing() {
        let ctx = egui::Context::default();
        let mut app = SketchApp::default();
        run_frame(&mut app, &ctx);
        run_frame(&mut app, &ctx);
        let size = app.session().surface().size();
        assert!(app.session().surface().is_ready());

        let dot = app.session().surface().origin() + vec2(10.0, 10.0);
        app.session.handle_event(InputEvent::PointerDown { position: dot });
        app.session.handle_event(InputEvent::PointerUp { position: dot });
        app.search();
        assert!(app.status.is_some());

        run_frame(&mut app, &ctx);
        run_frame(&mut app, &ctx);
        assert_eq!(app.session().surface().size(), size);
        assert!(!app.session().surface().is_blank());
        assert!(app.session().can_undo());
    }

    #[test]
    fn test_invalid_command_sets_status() {
        let mut app = SketchApp::default();
        app.run(Command::SetColor("not a color".to_string()));
        assert!(app.status.is_some());
        assert_eq!(app.session().color(), image::Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_save_syncs_tool_settings() {
        let mut app = SketchApp::default();
        app.run(Command::SelectTool(ToolKind::Fill));
        app.run(Command::SetBrushWidth(30));
        app.run(Command::SetColor("#4ECDC4".to_string()));
        app.sync_config();
        assert_eq!(app.config.default_tool, ToolKind::Fill);
        assert_eq!(app.config.brush_width, 30);
        assert_eq!(app.config.color, "#4ECDC4");
    }
}
