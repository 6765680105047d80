use egui::{pos2, vec2};
use image::Rgba;
use shop_a_sketch::{
    Command, ExportBackground, InputEvent, QueryRequest, SketchError, SketchSession, ToolKind,
};

fn decode(session: &SketchSession) -> image::RgbaImage {
    let export = session.export().unwrap();
    let bytes = export.png_bytes().unwrap();
    image::load_from_memory(&bytes).unwrap().to_rgba8()
}

#[test]
fn test_blank_surface_reports_empty_drawing() {
    let mut session = SketchSession::new();
    session.resize(vec2(30.0, 30.0), 1.0);
    assert!(matches!(session.export(), Err(SketchError::EmptyDrawing)));
}

#[test]
fn test_unsized_surface_reports_unavailable() {
    let session = SketchSession::new();
    assert!(matches!(session.export(), Err(SketchError::BufferUnavailable)));
}

#[test]
fn test_single_dot_exports() {
    let mut session = SketchSession::new();
    session.resize(vec2(30.0, 30.0), 1.0);
    session.handle_event(InputEvent::PointerDown { position: pos2(15.0, 15.0) });
    session.handle_event(InputEvent::PointerUp { position: pos2(15.0, 15.0) });

    let export = session.export().unwrap();
    assert!(export.data_uri.starts_with("data:image/png;base64,"));
    assert_eq!((export.width, export.height), (30, 30));
}

#[test]
fn test_export_excludes_grid_and_is_opaque() {
    let mut session = SketchSession::new();
    session.resize(vec2(45.0, 45.0), 1.0);
    session.execute(&Command::SetColor("#FF0000".to_string())).unwrap();
    session.set_brush_width(2).unwrap();
    session.handle_event(InputEvent::PointerDown { position: pos2(10.0, 10.0) });
    session.handle_event(InputEvent::PointerUp { position: pos2(10.0, 10.0) });

    // The on-screen image shows grid lines at multiples of 20px
    let display = session.display_image().unwrap();
    assert_eq!(*display.get_pixel(20, 33), session.grid().color);

    let exported = decode(&session);
    assert_eq!(*exported.get_pixel(20, 33), Rgba([255, 255, 255, 255]));
    assert_eq!(*exported.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    assert_eq!(*exported.get_pixel(10, 10), Rgba([255, 0, 0, 255]));
    assert!(exported.pixels().all(|p| p[3] == 255));
}

#[test]
fn test_erased_areas_export_as_white() {
    let mut session = SketchSession::new();
    session.resize(vec2(20.0, 20.0), 1.0);
    session.execute(&Command::SelectTool(ToolKind::Fill)).unwrap();
    session.flood_fill(pos2(0.0, 0.0));

    session.execute(&Command::SelectTool(ToolKind::Eraser)).unwrap();
    session.handle_event(InputEvent::PointerDown { position: pos2(10.0, 10.0) });
    session.handle_event(InputEvent::PointerUp { position: pos2(10.0, 10.0) });

    let exported = decode(&session);
    assert_eq!(*exported.get_pixel(10, 10), Rgba([255, 255, 255, 255]));
    assert_eq!(*exported.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
}

#[test]
fn test_transparent_export_keeps_alpha() {
    let mut session = SketchSession::new();
    session.resize(vec2(20.0, 20.0), 1.0);
    session.set_export_background(ExportBackground::Transparent);
    session.handle_event(InputEvent::PointerDown { position: pos2(5.0, 5.0) });
    session.handle_event(InputEvent::PointerUp { position: pos2(5.0, 5.0) });

    let exported = decode(&session);
    assert_eq!(exported.get_pixel(19, 19)[3], 0);
    assert_eq!(exported.get_pixel(5, 5)[3], 255);
}

#[test]
fn test_export_at_high_pixel_ratio_uses_raw_resolution() {
    let mut session = SketchSession::new();
    session.resize(vec2(20.0, 10.0), 2.0);
    session.handle_event(InputEvent::PointerDown { position: pos2(5.0, 5.0) });
    session.handle_event(InputEvent::PointerUp { position: pos2(5.0, 5.0) });

    let export = session.export().unwrap();
    assert_eq!((export.width, export.height), (40, 20));
}

#[test]
fn test_query_request_wraps_data_uri() {
    let mut session = SketchSession::new();
    session.resize(vec2(10.0, 10.0), 1.0);
    session.handle_event(InputEvent::PointerDown { position: pos2(5.0, 5.0) });
    session.handle_event(InputEvent::PointerUp { position: pos2(5.0, 5.0) });

    let export = session.export().unwrap();
    let json = QueryRequest::new(&export).to_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["image"], export.data_uri.as_str());
}
