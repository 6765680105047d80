use image::Rgba;

use crate::error::{SketchError, SketchResult};

/// Swatches offered by the color picker overlay
pub const PRESET_PALETTE: [&str; 8] = [
    "#000000", "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE",
];

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Decode a `#RRGGBB` or `#RGB` string into an opaque color.
///
/// The leading `#` is optional. Alpha is always 255: colors picked by the
/// user never introduce partial transparency.
pub fn parse_hex_color(value: &str) -> SketchResult<Rgba<u8>> {
    let invalid = || SketchError::InvalidColor(value.to_string());
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

    match digits.len() {
        6 => Ok(Rgba([
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
            255,
        ])),
        3 => {
            // #abc expands to #aabbcc
            let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
            Ok(Rgba([expand(0)?, expand(1)?, expand(2)?, 255]))
        }
        _ => Err(invalid()),
    }
}

/// Format an opaque color as `#RRGGBB`
pub fn to_hex(color: Rgba<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

pub fn to_color32(color: Rgba<u8>) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(color[0], color[1], color[2], color[3])
}

pub fn from_color32(color: egui::Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}

/// Source-over composite of `src` onto an opaque `dst`
pub fn blend_over_opaque(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let a = src[3] as u32;
    let inv = 255 - a;
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv + 127) / 255) as u8;
    Rgba([mix(src[0], dst[0]), mix(src[1], dst[1]), mix(src[2], dst[2]), 255])
}
