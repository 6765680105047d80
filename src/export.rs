use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};
use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color::{blend_over_opaque, WHITE};
use crate::error::{SketchError, SketchResult};

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// What the drawing is flattened onto when exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportBackground {
    /// Composite onto opaque white
    #[default]
    White,
    /// Keep the buffer's own alpha
    Transparent,
}

/// A flattened, encoded drawing ready to hand to the query service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedImage {
    /// Correlates log lines for one submission
    pub id: Uuid,
    pub width: u32,
    pub height: u32,
    /// `data:image/png;base64,...`
    pub data_uri: String,
}

impl ExportedImage {
    /// Decode the PNG bytes back out of the data URI
    pub fn png_bytes(&self) -> SketchResult<Vec<u8>> {
        let encoded = self
            .data_uri
            .strip_prefix(PNG_DATA_URI_PREFIX)
            .ok_or(SketchError::MalformedDataUri)?;
        general_purpose::STANDARD
            .decode(encoded)
            .map_err(|_| SketchError::MalformedDataUri)
    }
}

/// JSON body sent to the image-to-query collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub image: String,
}

impl QueryRequest {
    pub fn new(export: &ExportedImage) -> Self {
        Self {
            image: export.data_uri.clone(),
        }
    }

    pub fn to_json(&self) -> SketchResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Flatten `buffer` onto `background` and encode it as a PNG data URI.
///
/// Fails with [`SketchError::EmptyDrawing`] when every pixel is fully
/// transparent.
pub fn export_png(buffer: &RgbaImage, background: ExportBackground) -> SketchResult<ExportedImage> {
    if buffer.pixels().all(|p| p[3] == 0) {
        return Err(SketchError::EmptyDrawing);
    }

    let flattened = match background {
        ExportBackground::White => {
            let mut flat = buffer.clone();
            flat.pixels_mut().for_each(|p| *p = blend_over_opaque(*p, WHITE));
            flat
        }
        ExportBackground::Transparent => buffer.clone(),
    };

    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(flattened).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    let export = ExportedImage {
        id: Uuid::new_v4(),
        width: buffer.width(),
        height: buffer.height(),
        data_uri: format!("{PNG_DATA_URI_PREFIX}{}", general_purpose::STANDARD.encode(&bytes)),
    };

    log::info!(
        "Exported drawing {} ({}x{}, {} PNG bytes)",
        export.id,
        export.width,
        export.height,
        bytes.len()
    );

    Ok(export)
}
