use egui::Pos2;
use image::{Rgba, RgbaImage};

use crate::color::TRANSPARENT;

/// What a stroke does to the pixels it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    /// Paint an opaque color
    Color(Rgba<u8>),
    /// Make pixels fully transparent
    Erase,
}

impl Paint {
    fn pixel(self) -> Rgba<u8> {
        match self {
            Paint::Color(color) => color,
            Paint::Erase => TRANSPARENT,
        }
    }
}

/// The in-progress gesture, from pointer down to pointer up.
///
/// Nothing about a stroke outlives the gesture; once its segments are
/// rasterized only the pixels remain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    last_point: Pos2,
    touch_id: Option<u64>,
}

impl Stroke {
    pub fn begin(point: Pos2, touch_id: Option<u64>) -> Self {
        Self {
            last_point: point,
            touch_id,
        }
    }

    pub fn last_point(&self) -> Pos2 {
        self.last_point
    }

    /// The touch that owns this stroke, `None` for mouse strokes
    pub fn touch_id(&self) -> Option<u64> {
        self.touch_id
    }

    /// Move the stroke to `point`, returning the segment to draw
    pub fn advance(&mut self, point: Pos2) -> (Pos2, Pos2) {
        let from = self.last_point;
        self.last_point = point;
        (from, point)
    }
}

/// Rasterize a round-capped line segment into `buffer`.
///
/// Coordinates are raw buffer pixels with pixel centres on integer
/// coordinates. A pixel is covered when its unit cell comes within
/// `width / 2` of the segment, measured from the point of the segment
/// nearest the pixel centre. A zero-length segment yields a single dot.
/// Each pixel in the segment's bounding box is tested once. Returns the
/// number of pixels whose value changed.
pub fn rasterize_segment(
    buffer: &mut RgbaImage,
    from: Pos2,
    to: Pos2,
    width: f32,
    paint: Paint,
) -> usize {
    if width <= 0.0 || buffer.width() == 0 || buffer.height() == 0 {
        return 0;
    }
    let radius = width / 2.0;
    let value = paint.pixel();

    let max_x = buffer.width() as i64 - 1;
    let max_y = buffer.height() as i64 - 1;
    let x0 = ((from.x.min(to.x) - radius).floor() as i64).max(0);
    let x1 = ((from.x.max(to.x) + radius).ceil() as i64).min(max_x);
    let y0 = ((from.y.min(to.y) - radius).floor() as i64).max(0);
    let y1 = ((from.y.max(to.y) + radius).ceil() as i64).min(max_y);

    let delta = to - from;
    let length_sq = delta.length_sq();
    let r2 = radius * radius;

    let mut changed = 0;
    for y in y0..=y1 {
        for x in x0..=x1 {
            let center = Pos2::new(x as f32, y as f32);
            let t = if length_sq > 0.0 {
                ((center - from).dot(delta) / length_sq).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let nearest = from + delta * t;

            // Distance from the nearest point to the closest edge of the cell
            let dx = ((center.x - nearest.x).abs() - 0.5).max(0.0);
            let dy = ((center.y - nearest.y).abs() - 0.5).max(0.0);
            if dx * dx + dy * dy >= r2 {
                continue;
            }
            let pixel = buffer.get_pixel_mut(x as u32, y as u32);
            if *pixel != value {
                *pixel = value;
                changed += 1;
            }
        }
    }
    changed
}
