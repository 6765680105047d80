#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod export;
pub mod fill;
pub mod grid;
pub mod history;
pub mod input;
pub mod session;
pub mod stroke;
pub mod surface;
pub mod texture_manager;
pub mod tools;

pub use app::SketchApp;
pub use command::Command;
pub use config::SketchConfig;
pub use error::{SketchError, SketchResult};
pub use export::{ExportBackground, ExportedImage, QueryRequest};
pub use history::{History, HistoryState, Snapshot};
pub use input::{InputEvent, InputHandler};
pub use session::{SketchSession, UndoOutcome};
pub use surface::{PixelBuffer, RasterSurface};
pub use tools::{Tool, ToolKind};
