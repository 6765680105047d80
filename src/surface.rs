use egui::{Pos2, Vec2};
use image::{Rgba, RgbaImage};

use crate::color::TRANSPARENT;
use crate::error::{SketchError, SketchResult};
use crate::export::{self, ExportBackground, ExportedImage};
use crate::fill::{self, FillOutcome};
use crate::history::Snapshot;
use crate::stroke::{self, Paint};

/// Raw RGBA drawing buffer, `width * height` at device resolution
pub type PixelBuffer = RgbaImage;

/// The drawing surface.
///
/// Callers speak in CSS pixels relative to the surface's top-left corner.
/// This type alone knows the device pixel ratio and maps those coordinates
/// onto the raw buffer, which has `scale` times as many pixels per axis.
#[derive(Debug)]
pub struct RasterSurface {
    /// `None` until the first resize
    buffer: Option<PixelBuffer>,
    /// Size in CSS pixels
    size: Vec2,
    /// Device pixel ratio
    scale: f32,
    /// Screen position of the surface's top-left corner
    origin: Pos2,
    /// Bumped on every pixel mutation
    revision: u64,
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self {
            buffer: None,
            size: Vec2::ZERO,
            scale: 1.0,
            origin: Pos2::ZERO,
            revision: 0,
        }
    }
}

impl RasterSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reallocate the buffer for a new CSS size and pixel ratio.
    ///
    /// Content is discarded. A zero-sized surface leaves the buffer
    /// unavailable until the next resize.
    pub fn resize(&mut self, size: Vec2, pixels_per_point: f32) {
        let scale = if pixels_per_point.is_finite() && pixels_per_point > 0.0 {
            pixels_per_point
        } else {
            1.0
        };
        let width = (size.x.max(0.0) * scale).round() as u32;
        let height = (size.y.max(0.0) * scale).round() as u32;

        self.size = size;
        self.scale = scale;
        self.buffer = if width == 0 || height == 0 {
            None
        } else {
            Some(RgbaImage::from_pixel(width, height, TRANSPARENT))
        };
        self.revision += 1;

        log::debug!(
            "Surface resized to {}x{} CSS px at ratio {} ({}x{} raw)",
            size.x,
            size.y,
            scale,
            width,
            height
        );
    }

    /// Record where the surface sits on screen
    pub fn set_origin(&mut self, origin: Pos2) {
        self.origin = origin;
    }

    pub fn origin(&self) -> Pos2 {
        self.origin
    }

    pub fn is_ready(&self) -> bool {
        self.buffer.is_some()
    }

    /// Size in CSS pixels
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Raw buffer dimensions, `(0, 0)` before sizing
    pub fn pixel_size(&self) -> (u32, u32) {
        self.buffer.as_ref().map_or((0, 0), |b| b.dimensions())
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.buffer.as_ref()
    }

    /// Map a screen (client) position into surface-local CSS pixels
    pub fn to_local_point(&self, client: Pos2) -> Pos2 {
        client - self.origin.to_vec2()
    }

    /// Whether a local point lies on the surface
    pub fn contains(&self, local: Pos2) -> bool {
        local.x >= 0.0 && local.y >= 0.0 && local.x < self.size.x && local.y < self.size.y
    }

    /// Map a local CSS-pixel point into raw buffer coordinates
    pub fn to_buffer_point(&self, local: Pos2) -> Pos2 {
        Pos2::new(local.x * self.scale, local.y * self.scale)
    }

    /// The raw pixel under a local CSS-pixel point, if any
    pub fn to_buffer_pixel(&self, local: Pos2) -> Option<(u32, u32)> {
        let (width, height) = self.pixel_size();
        let raw = self.to_buffer_point(local);
        if raw.x < 0.0 || raw.y < 0.0 {
            return None;
        }
        let (x, y) = (raw.x.floor() as u32, raw.y.floor() as u32);
        (x < width && y < height).then_some((x, y))
    }

    pub fn pixel(&self, local: Pos2) -> Option<Rgba<u8>> {
        let (x, y) = self.to_buffer_pixel(local)?;
        self.buffer.as_ref().map(|b| *b.get_pixel(x, y))
    }

    /// Reset every pixel to fully transparent
    pub fn clear(&mut self) {
        if let Some(buffer) = &mut self.buffer {
            buffer.pixels_mut().for_each(|p| *p = TRANSPARENT);
            self.revision += 1;
        }
    }

    /// True when no pixel has any opacity
    pub fn is_blank(&self) -> bool {
        self.buffer
            .as_ref()
            .is_none_or(|b| b.pixels().all(|p| p[3] == 0))
    }

    /// Draw a round-capped segment between two local points.
    ///
    /// `width` is in CSS pixels. Returns the number of raw pixels changed.
    pub fn draw_segment(&mut self, from: Pos2, to: Pos2, width: f32, paint: Paint) -> usize {
        let from = self.to_buffer_point(from);
        let to = self.to_buffer_point(to);
        let width = width * self.scale;
        let Some(buffer) = &mut self.buffer else {
            return 0;
        };
        let changed = stroke::rasterize_segment(buffer, from, to, width, paint);
        if changed > 0 {
            self.revision += 1;
        }
        changed
    }

    /// Flood fill from the raw pixel under a local seed point
    pub fn fill(&mut self, seed: Pos2, color: Rgba<u8>) -> FillOutcome {
        let Some(pixel) = self.to_buffer_pixel(seed) else {
            return FillOutcome::default();
        };
        let Some(buffer) = &mut self.buffer else {
            return FillOutcome::default();
        };
        let outcome = fill::flood_fill(buffer, pixel, color);
        if !outcome.is_noop() {
            self.revision += 1;
        }
        outcome
    }

    /// Color that a fill seeded at `seed` would replace
    pub fn fill_target(&self, seed: Pos2) -> Option<Rgba<u8>> {
        let pixel = self.to_buffer_pixel(seed)?;
        fill::target_color(self.buffer.as_ref()?, pixel)
    }

    /// Replace the buffer's pixels with a snapshot's.
    ///
    /// Returns false when the snapshot was taken at a different size.
    pub fn restore(&mut self, snapshot: &Snapshot) -> bool {
        let Some(buffer) = &mut self.buffer else {
            return false;
        };
        if buffer.dimensions() != snapshot.dimensions() {
            log::warn!(
                "Discarding snapshot of size {:?}, surface is {:?}",
                snapshot.dimensions(),
                buffer.dimensions()
            );
            return false;
        }
        buffer.pixels_mut().for_each(|p| *p = TRANSPARENT);
        buffer.copy_from_slice(snapshot.pixels().as_raw());
        self.revision += 1;
        true
    }

    /// Flatten and encode the drawing as a PNG data URI
    pub fn export(&self, background: ExportBackground) -> SketchResult<ExportedImage> {
        let buffer = self.buffer.as_ref().ok_or(SketchError::BufferUnavailable)?;
        export::export_png(buffer, background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn test_unsized_surface_is_inert() {
        let mut surface = RasterSurface::new();
        assert!(!surface.is_ready());
        assert_eq!(surface.draw_segment(pos2(1.0, 1.0), pos2(2.0, 2.0), 4.0, Paint::Erase), 0);
        assert!(surface.fill(pos2(0.0, 0.0), Rgba([1, 1, 1, 255])).is_noop());
        assert!(matches!(
            surface.export(ExportBackground::White),
            Err(SketchError::BufferUnavailable)
        ));
    }

    #[test]
    fn test_resize_scales_by_pixel_ratio() {
        let mut surface = RasterSurface::new();
        surface.resize(vec2(100.0, 50.0), 2.0);
        assert_eq!(surface.pixel_size(), (200, 100));
        assert_eq!(surface.to_buffer_pixel(pos2(10.5, 3.25)), Some((21, 6)));
        assert_eq!(surface.to_buffer_pixel(pos2(100.0, 0.0)), None);
        assert_eq!(surface.to_buffer_pixel(pos2(-0.5, 0.0)), None);
    }

    #[test]
    fn test_resize_discards_content() {
        let mut surface = RasterSurface::new();
        surface.resize(vec2(10.0, 10.0), 1.0);
        let paint = Paint::Color(Rgba([0, 0, 0, 255]));
        surface.draw_segment(pos2(5.0, 5.0), pos2(5.0, 5.0), 3.0, paint);
        assert!(!surface.is_blank());
        surface.resize(vec2(12.0, 12.0), 1.0);
        assert!(surface.is_blank());
    }

    #[test]
    fn test_local_point_subtracts_origin() {
        let mut surface = RasterSurface::new();
        surface.set_origin(pos2(30.0, 40.0));
        assert_eq!(surface.to_local_point(pos2(35.0, 42.0)), pos2(5.0, 2.0));
    }

    #[test]
    fn test_brush_width_scales_with_ratio() {
        let mut surface = RasterSurface::new();
        surface.resize(vec2(20.0, 20.0), 2.0);
        let paint = Paint::Color(Rgba([0, 0, 0, 255]));
        let changed = surface.draw_segment(pos2(10.0, 10.0), pos2(10.0, 10.0), 2.0, paint);
        // A 2 CSS px dot is 4 raw pixels across
        assert!(changed >= 16);
        assert_eq!(surface.pixel(pos2(10.0, 10.0)).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_restore_rejects_mismatched_snapshot() {
        let mut surface = RasterSurface::new();
        surface.resize(vec2(4.0, 4.0), 1.0);
        let snapshot = Snapshot::capture(&RgbaImage::new(8, 8));
        assert!(!surface.restore(&snapshot));
    }
}
