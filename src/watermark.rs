//! Visible watermark stamped on every generated image before it is shown or
//! saved. The text is drawn with the `font8x8` bitmap fonts so no font files
//! are needed at runtime.

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use font8x8::{UnicodeFonts, BASIC_FONTS, GREEK_FONTS, HIRAGANA_FONTS, LATIN_FONTS, MISC_FONTS};
use image::{imageops, DynamicImage, ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::config::WatermarkConfig;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WatermarkAnchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

const GLYPH_SIZE: u32 = 8;
const BADGE_PADDING: u32 = 2;
const BADGE_BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 110]);
const BADGE_INK: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[derive(Debug, Clone)]
pub struct Watermarker {
    config: WatermarkConfig,
}

impl Watermarker {
    pub fn new(config: WatermarkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WatermarkConfig {
        &self.config
    }

    /// Watermarks a base64 image and returns it re-encoded as base64 PNG.
    pub fn apply(&self, image_base64: &str) -> Result<String> {
        if !self.is_active() {
            return Ok(image_base64.to_string());
        }

        let bytes = BASE64.decode(image_base64.trim())?;
        let mut canvas = image::load_from_memory(&bytes)?.to_rgba8();
        self.stamp(&mut canvas);

        let mut encoded = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(canvas).write_to(&mut encoded, ImageFormat::Png)?;
        Ok(BASE64.encode(encoded.into_inner()))
    }

    fn is_active(&self) -> bool {
        self.config.enabled && !self.config.text.trim().is_empty()
    }

    /// Draws the badge onto `canvas` in place.
    pub fn stamp(&self, canvas: &mut RgbaImage) {
        if !self.is_active() {
            return;
        }

        let badge = render_badge(self.config.text.trim());
        let (base_w, base_h) = canvas.dimensions();
        let base_min_dim = base_w.min(base_h) as f32;

        let scale_factor = (base_min_dim * (self.config.scale / 100.0)) / badge.width() as f32;
        let new_w = (badge.width() as f32 * scale_factor).round() as u32;
        let new_h = (badge.height() as f32 * scale_factor).round() as u32;
        if new_w == 0 || new_h == 0 {
            return;
        }

        let mut scaled = imageops::resize(&badge, new_w, new_h, imageops::FilterType::Nearest);
        let opacity = (self.config.opacity / 100.0).clamp(0.0, 1.0);
        for pixel in scaled.pixels_mut() {
            pixel[3] = (pixel[3] as f32 * opacity) as u8;
        }

        let margin = (base_min_dim * (self.config.margin / 100.0)) as i64;
        let (x, y) = anchor_position(
            self.config.anchor,
            (base_w, base_h),
            (new_w, new_h),
            margin,
        );
        imageops::overlay(canvas, &scaled, x, y);
    }
}

fn anchor_position(
    anchor: WatermarkAnchor,
    (base_w, base_h): (u32, u32),
    (mark_w, mark_h): (u32, u32),
    margin: i64,
) -> (i64, i64) {
    use WatermarkAnchor::*;

    let x = match anchor {
        TopLeft | CenterLeft | BottomLeft => margin,
        TopCenter | Center | BottomCenter => (base_w as i64 - mark_w as i64) / 2,
        TopRight | CenterRight | BottomRight => base_w as i64 - mark_w as i64 - margin,
    };
    let y = match anchor {
        TopLeft | TopCenter | TopRight => margin,
        CenterLeft | Center | CenterRight => (base_h as i64 - mark_h as i64) / 2,
        BottomLeft | BottomCenter | BottomRight => base_h as i64 - mark_h as i64 - margin,
    };
    (x, y)
}

/// Unscaled badge: text on a translucent plate.
fn render_badge(text: &str) -> RgbaImage {
    let chars: Vec<char> = text.chars().collect();
    let count = chars.len().max(1) as u32;
    let width = count * GLYPH_SIZE + 2 * BADGE_PADDING;
    let height = GLYPH_SIZE + 2 * BADGE_PADDING;

    let mut badge = RgbaImage::from_pixel(width, height, BADGE_BACKGROUND);
    for (i, ch) in chars.iter().enumerate() {
        let Some(rows) = glyph(*ch) else {
            continue;
        };
        let origin_x = BADGE_PADDING + i as u32 * GLYPH_SIZE;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                if (bits >> col) & 1 != 0 {
                    badge.put_pixel(origin_x + col, BADGE_PADDING + row as u32, BADGE_INK);
                }
            }
        }
    }
    badge
}

/// 8x8 bitmap for `ch`, least significant bit leftmost. Characters no font
/// covers render as `?`.
fn glyph(ch: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| GREEK_FONTS.get(ch))
        .or_else(|| HIRAGANA_FONTS.get(ch))
        .or_else(|| MISC_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
}
