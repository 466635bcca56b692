use std::path::{Path, PathBuf};

use font8x8::{BASIC_FONTS, UnicodeFonts};
use fontdue::{Font, FontSettings};
use image::{Pixel, Rgba, RgbaImage};
use tracing::{debug, warn};

/// Well-known locations of DejaVu Sans Bold on common distributions.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/local/share/fonts/DejaVuSans-Bold.ttf",
    "/Library/Fonts/DejaVuSans-Bold.ttf",
];

const BITMAP_GLYPH: i64 = 8;

/// Rasterizes overlay text onto RGBA pixels.
///
/// Prefers a TrueType font; without one it falls back to an 8x8 bitmap font
/// scaled to the requested size.
pub enum TextRenderer {
    Vector(Box<Font>),
    Bitmap,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vector(_) => f.write_str("TextRenderer::Vector"),
            Self::Bitmap => f.write_str("TextRenderer::Bitmap"),
        }
    }
}

impl TextRenderer {
    /// Load `configured` if given, else the first system candidate found.
    pub fn load(configured: Option<&Path>) -> Self {
        let candidates = configured
            .map(Path::to_path_buf)
            .into_iter()
            .chain(SYSTEM_FONT_CANDIDATES.iter().map(PathBuf::from));

        for path in candidates {
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };
            match Font::from_bytes(bytes, FontSettings::default()) {
                Ok(font) => {
                    debug!(path = %path.display(), "annotation font loaded");
                    return Self::Vector(Box::new(font));
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "unusable annotation font")
                }
            }
        }

        debug!("no TrueType font available, using bitmap glyphs");
        Self::Bitmap
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, Self::Vector(_))
    }

    /// Draw `text` with its top-left corner at `(x, y)`.
    pub fn draw(
        &self,
        canvas: &mut RgbaImage,
        x: i64,
        y: i64,
        text: &str,
        size: f32,
        color: Rgba<u8>,
    ) {
        match self {
            Self::Vector(font) => draw_vector(font, canvas, x, y, text, size, color),
            Self::Bitmap => draw_bitmap(canvas, x, y, text, size, color),
        }
    }
}

fn draw_vector(
    font: &Font,
    canvas: &mut RgbaImage,
    x: i64,
    y: i64,
    text: &str,
    size: f32,
    color: Rgba<u8>,
) {
    let (ascent, line_height) = font
        .horizontal_line_metrics(size)
        .map(|m| (m.ascent, m.new_line_size))
        .unwrap_or((size, size * 1.2));
    let right_edge = canvas.width() as f32 + size;

    for (line_index, line) in text.lines().enumerate() {
        let baseline = y.saturating_add(
            (ascent + line_height * line_index as f32).round() as i64,
        );
        let line_top = baseline.saturating_sub(size.ceil() as i64);
        if line_top >= i64::from(canvas.height()) {
            break;
        }
        let mut pen_x = x as f32;

        for ch in line.chars() {
            // Glyphs only move right along a line.
            if pen_x >= right_edge {
                break;
            }
            let (metrics, coverage) = font.rasterize(ch, size);
            let left =
                (pen_x.round() as i64).saturating_add(i64::from(metrics.xmin));
            let top = baseline.saturating_sub(
                metrics.height as i64 + i64::from(metrics.ymin),
            );
            pen_x += metrics.advance_width;

            let (width, height) = (metrics.width as i64, metrics.height as i64);
            if !cell_visible(canvas, left, top, width, height) {
                continue;
            }
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let alpha = coverage[row * metrics.width + col];
                    blend(canvas, left + col as i64, top + row as i64, color, alpha);
                }
            }
        }
    }
}

fn draw_bitmap(
    canvas: &mut RgbaImage,
    x: i64,
    y: i64,
    text: &str,
    size: f32,
    color: Rgba<u8>,
) {
    let scale = ((size / BITMAP_GLYPH as f32).round() as i64).max(1);
    let cell = BITMAP_GLYPH * scale;
    let line_step = cell + scale * 2;

    for (line_index, line) in text.lines().enumerate() {
        let top =
            y.saturating_add((line_index as i64).saturating_mul(line_step));
        if top >= i64::from(canvas.height()) {
            break;
        }
        for (char_index, ch) in line.chars().enumerate() {
            let left =
                x.saturating_add((char_index as i64).saturating_mul(cell));
            if left >= i64::from(canvas.width()) {
                break;
            }
            if !cell_visible(canvas, left, top, cell, cell) {
                continue;
            }
            let Some(rows) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?'))
            else {
                continue;
            };

            for (row, bits) in rows.iter().enumerate() {
                for col in 0..8 {
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    let px = left + col * scale;
                    let py = top + row as i64 * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            blend(canvas, px + dx, py + dy, color, u8::MAX);
                        }
                    }
                }
            }
        }
    }
}

/// Whether a `width` x `height` cell at `(left, top)` overlaps the canvas.
fn cell_visible(
    canvas: &RgbaImage,
    left: i64,
    top: i64,
    width: i64,
    height: i64,
) -> bool {
    left < i64::from(canvas.width())
        && top < i64::from(canvas.height())
        && left.saturating_add(width) > 0
        && top.saturating_add(height) > 0
}

fn blend(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: u8) {
    let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
        return;
    };
    if x >= canvas.width() || y >= canvas.height() || coverage == 0 {
        return;
    }

    let alpha = u32::from(color[3]) * u32::from(coverage) / 255;
    if alpha == 0 {
        return;
    }
    let src = Rgba([color[0], color[1], color[2], alpha as u8]);
    canvas.get_pixel_mut(x, y).blend(&src);
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn blank(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255]))
    }

    fn painted(canvas: &RgbaImage) -> usize {
        canvas.pixels().filter(|p| p[0] > 0).count()
    }

    #[test]
    fn bitmap_draws_inside_canvas() {
        let mut canvas = blank(64, 32);
        TextRenderer::Bitmap.draw(&mut canvas, 2, 2, "Hi", 16.0, RED);
        assert!(painted(&canvas) > 0);
    }

    #[test]
    fn bitmap_scales_with_size() {
        let mut small = blank(200, 100);
        let mut large = blank(200, 100);
        TextRenderer::Bitmap.draw(&mut small, 0, 0, "A", 8.0, RED);
        TextRenderer::Bitmap.draw(&mut large, 0, 0, "A", 32.0, RED);
        assert_eq!(painted(&large), painted(&small) * 16);
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let mut canvas = blank(10, 10);
        TextRenderer::Bitmap.draw(&mut canvas, -500, -500, "clip", 42.0, RED);
        TextRenderer::Bitmap.draw(&mut canvas, 500, 500, "clip", 42.0, RED);
        assert_eq!(painted(&canvas), 0);
    }

    #[test]
    fn extreme_positions_do_not_overflow() {
        let mut canvas = blank(16, 16);
        let corners = [(i64::MAX, i64::MAX), (i64::MIN, i64::MIN), (i64::MAX, 0)];
        for (x, y) in corners {
            TextRenderer::Bitmap
                .draw(&mut canvas, x, y, "edge\ncase", 1024.0, RED);
        }
        assert_eq!(painted(&canvas), 0);
    }

    #[test]
    fn partially_visible_glyph_is_still_drawn() {
        let mut canvas = blank(16, 16);
        // Only the right half of the first cell overlaps the canvas.
        TextRenderer::Bitmap.draw(&mut canvas, -4, 0, "M", 8.0, RED);
        assert!(painted(&canvas) > 0);
    }

    #[test]
    fn cell_visibility_bounds() {
        let canvas = blank(10, 10);
        assert!(cell_visible(&canvas, 0, 0, 1, 1));
        assert!(cell_visible(&canvas, -5, -5, 6, 6));
        assert!(!cell_visible(&canvas, -5, 0, 5, 5));
        assert!(!cell_visible(&canvas, 10, 0, 5, 5));
        assert!(!cell_visible(&canvas, 0, 10, 5, 5));
    }

    #[test]
    fn missing_configured_font_falls_back() {
        let renderer =
            TextRenderer::load(Some(Path::new("/definitely/not/a/font.ttf")));
        // A system font may still be found; either way drawing must work.
        let mut canvas = blank(64, 64);
        renderer.draw(&mut canvas, 0, 0, "ok", 24.0, RED);
        assert!(painted(&canvas) > 0);
    }
}
