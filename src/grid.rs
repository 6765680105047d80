use image::{Rgba, RgbaImage};

use crate::color::{blend_over_opaque, WHITE};

/// Background grid shown under the drawing.
///
/// The grid lives in its own buffer so it never leaks into exported images.
#[derive(Debug, Clone)]
pub struct GridLayer {
    /// Distance between lines in CSS pixels
    pub spacing: f32,
    pub color: Rgba<u8>,
    pub visible: bool,
}

impl Default for GridLayer {
    fn default() -> Self {
        Self {
            spacing: 20.0,
            color: Rgba([0xE5, 0xE7, 0xEB, 255]),
            visible: true,
        }
    }
}

impl GridLayer {
    /// Render an opaque white background with grid lines at raw resolution.
    ///
    /// `scale` is the device pixel ratio; lines stay one CSS pixel wide.
    pub fn render(&self, width: u32, height: u32, scale: f32) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(width, height, WHITE);
        if !self.visible || self.spacing <= 0.0 {
            return image;
        }

        let step = self.spacing * scale;
        if step < 1.0 {
            return image;
        }
        let thickness = scale.max(1.0).round() as u32;

        let mut offset = 0.0f32;
        while offset <= width as f32 {
            let x0 = offset.round() as u32;
            for x in x0..(x0 + thickness).min(width) {
                for y in 0..height {
                    image.put_pixel(x, y, self.color);
                }
            }
            offset += step;
        }

        let mut offset = 0.0f32;
        while offset <= height as f32 {
            let y0 = offset.round() as u32;
            for y in y0..(y0 + thickness).min(height) {
                for x in 0..width {
                    image.put_pixel(x, y, self.color);
                }
            }
            offset += step;
        }

        image
    }
}

/// Composite `drawing` over an opaque `background` of the same size
pub fn composite(background: &RgbaImage, drawing: &RgbaImage) -> RgbaImage {
    let mut image = background.clone();
    for (dst, src) in image.pixels_mut().zip(drawing.pixels()) {
        if src[3] != 0 {
            *dst = blend_over_opaque(*src, *dst);
        }
    }
    image
}
