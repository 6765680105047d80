use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::color::{parse_hex_color, PRESET_PALETTE};
use crate::error::SketchResult;
use crate::export::ExportBackground;
use crate::grid::GridLayer;
use crate::tools::{validate_brush_width, ToolKind};

/// Environment variable naming a JSON config file
pub const CONFIG_ENV_VAR: &str = "SHOP_A_SKETCH_CONFIG";

/// Startup settings for a sketch session
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)] // missing fields fall back to defaults
pub struct SketchConfig {
    pub default_tool: ToolKind,
    /// Brush and eraser width in CSS pixels, 1..=50
    pub brush_width: u32,
    /// Initial color as `#RRGGBB`
    pub color: String,
    /// Swatches shown in the color picker
    pub palette: Vec<String>,
    /// Grid line spacing in CSS pixels
    pub grid_spacing: f32,
    pub grid_color: String,
    pub show_grid: bool,
    pub export_background: ExportBackground,
    /// Maximum undo depth, `None` keeps every snapshot
    pub history_limit: Option<usize>,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            default_tool: ToolKind::Brush,
            brush_width: 8,
            color: "#000000".to_string(),
            palette: PRESET_PALETTE.iter().map(|c| c.to_string()).collect(),
            grid_spacing: 20.0,
            grid_color: "#E5E7EB".to_string(),
            show_grid: true,
            export_background: ExportBackground::White,
            history_limit: None,
        }
    }
}

impl SketchConfig {
    pub fn from_json(json: &str) -> SketchResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> SketchResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from the first CLI argument or [`CONFIG_ENV_VAR`].
    ///
    /// Returns `None` when neither is set or the file is unusable.
    pub fn from_env_or_args() -> Option<Self> {
        let path = std::env::args()
            .nth(1)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok())
            .map(PathBuf::from)?;

        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                Some(config)
            }
            Err(err) => {
                log::warn!("Ignoring configuration {}: {}", path.display(), err);
                None
            }
        }
    }

    /// Check every color and range in the config
    pub fn validate(&self) -> SketchResult<()> {
        validate_brush_width(self.brush_width)?;
        parse_hex_color(&self.color)?;
        parse_hex_color(&self.grid_color)?;
        for swatch in &self.palette {
            parse_hex_color(swatch)?;
        }
        Ok(())
    }

    pub fn grid_layer(&self) -> SketchResult<GridLayer> {
        Ok(GridLayer {
            spacing: self.grid_spacing,
            color: parse_hex_color(&self.grid_color)?,
            visible: self.show_grid,
        })
    }
}
