use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use image::RgbaImage;
use thiserror::Error;

/// Errors that can occur during texture generation
#[derive(Error, Debug)]
pub enum TextureGenerationError {
    #[error("Nothing to upload, the surface has not been sized")]
    Unavailable,
    #[error("Invalid texture dimensions")]
    InvalidDimensions,
}

/// Keeps the on-screen canvas texture in sync with the drawing.
///
/// The texture is re-uploaded only when the surface revision changes, so
/// idle frames cost nothing.
#[derive(Default)]
pub struct TextureManager {
    handle: Option<TextureHandle>,
    /// Surface revision the texture was generated from
    revision: Option<u64>,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canvas texture, regenerating it if `revision` moved on
    pub fn get_or_update<F>(
        &mut self,
        ctx: &Context,
        revision: u64,
        generator: F,
    ) -> Result<TextureId, TextureGenerationError>
    where
        F: FnOnce() -> Result<ColorImage, TextureGenerationError>,
    {
        if let (Some(handle), Some(current)) = (&self.handle, self.revision) {
            if current == revision {
                return Ok(handle.id());
            }
        }

        let image = generator()?;
        match &mut self.handle {
            Some(handle) => handle.set(image, TextureOptions::NEAREST),
            None => {
                let handle = ctx.load_texture("sketch_canvas", image, TextureOptions::NEAREST);
                self.handle = Some(handle);
            }
        }
        self.revision = Some(revision);

        self.handle
            .as_ref()
            .map(TextureHandle::id)
            .ok_or(TextureGenerationError::Unavailable)
    }

    /// Force the next call to regenerate
    pub fn invalidate(&mut self) {
        self.revision = None;
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }
}

/// Convert a composited RGBA image into an egui image
pub fn to_color_image(image: &RgbaImage) -> Result<ColorImage, TextureGenerationError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(TextureGenerationError::InvalidDimensions);
    }
    Ok(ColorImage::from_rgba_unmultiplied(
        [width as usize, height as usize],
        image.as_raw(),
    ))
}
