#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = shop_a_sketch::SketchConfig::from_env_or_args();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Shop a Sketch")
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Shop a Sketch",
        native_options,
        Box::new(move |cc| Ok(Box::new(shop_a_sketch::SketchApp::new(cc, config)))),
    )
}

// The canvas core builds for wasm32, the desktop shell does not.
#[cfg(target_arch = "wasm32")]
fn main() {}
