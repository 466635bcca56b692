//! Text overlay for stored images.
//!
//! The caption is drawn twice: a black shadow offset by [`SHADOW_OFFSET`]
//! pixels, then the text itself in the requested colour. Formats without an
//! alpha channel are flattened to RGB before encoding.

pub mod color;
pub mod glyphs;

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba};
use serde::{Deserialize, Serialize};

use crate::error::{GalleryError, Result};

pub use color::parse_color;
pub use glyphs::TextRenderer;

pub const SHADOW_OFFSET: i64 = 2;
pub const DEFAULT_X: i64 = 20;
pub const DEFAULT_Y: i64 = 40;
pub const DEFAULT_FONT_SIZE: u32 = 42;
pub const DEFAULT_COLOR: &str = "#ffffff";
pub const MAX_FONT_SIZE: u32 = 1024;
/// Positions further than this from the origin can never land on a canvas.
pub const MAX_POSITION: i64 = u32::MAX as i64;
pub const MAX_TEXT_CHARS: usize = 512;

const SHADOW: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Parameters of one annotate call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
    #[serde(default = "default_x")]
    pub x: i64,
    #[serde(default = "default_y")]
    pub y: i64,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_x() -> i64 {
    DEFAULT_X
}

fn default_y() -> i64 {
    DEFAULT_Y
}

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Annotation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: DEFAULT_X,
            y: DEFAULT_Y,
            font_size: DEFAULT_FONT_SIZE,
            color: default_color(),
        }
    }

    pub fn at(mut self, x: i64, y: i64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Check the request and resolve its colour.
    pub fn validate(&self) -> Result<Rgba<u8>> {
        if self.text.trim().is_empty() {
            return Err(GalleryError::Validation(
                "annotation text must not be empty".into(),
            ));
        }
        if self.text.chars().count() > MAX_TEXT_CHARS {
            return Err(GalleryError::Validation(format!(
                "annotation text must be at most {MAX_TEXT_CHARS} characters"
            )));
        }
        if self.x.unsigned_abs() > MAX_POSITION as u64
            || self.y.unsigned_abs() > MAX_POSITION as u64
        {
            return Err(GalleryError::Validation(format!(
                "annotation position must lie within ±{MAX_POSITION}"
            )));
        }
        if self.font_size == 0 || self.font_size > MAX_FONT_SIZE {
            return Err(GalleryError::Validation(format!(
                "font size must be between 1 and {MAX_FONT_SIZE}"
            )));
        }
        parse_color(&self.color)
    }
}

/// Decode `bytes`, draw the annotation and re-encode in `format`.
pub fn render(
    bytes: &[u8],
    format: ImageFormat,
    renderer: &TextRenderer,
    annotation: &Annotation,
) -> Result<Vec<u8>> {
    let color = annotation.validate()?;

    let decoded = image::load_from_memory(bytes).map_err(|err| {
        GalleryError::StorageRead(format!("failed to decode image: {err}"))
    })?;
    let mut canvas = decoded.into_rgba8();

    let size = annotation.font_size as f32;
    renderer.draw(
        &mut canvas,
        annotation.x.saturating_add(SHADOW_OFFSET),
        annotation.y.saturating_add(SHADOW_OFFSET),
        &annotation.text,
        size,
        SHADOW,
    );
    renderer.draw(
        &mut canvas,
        annotation.x,
        annotation.y,
        &annotation.text,
        size,
        color,
    );

    let output = if supports_alpha(format) {
        DynamicImage::ImageRgba8(canvas)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
    };

    let mut encoded = Cursor::new(Vec::new());
    output.write_to(&mut encoded, format).map_err(|err| {
        GalleryError::StorageWrite(format!(
            "failed to encode annotated image as {format:?}: {err}"
        ))
    })?;
    Ok(encoded.into_inner())
}

pub fn supports_alpha(format: ImageFormat) -> bool {
    !matches!(format, ImageFormat::Jpeg | ImageFormat::Bmp)
}

/// Encoding format for a stored key's extension.
pub fn format_for_extension(extension: &str) -> Result<ImageFormat> {
    ImageFormat::from_extension(extension).ok_or_else(|| {
        GalleryError::StorageRead(format!(
            "no image encoder for extension '{extension}'"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{RgbImage, RgbaImage};

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn jpeg_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(w, h, image::Rgb([10, 20, 30]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Jpeg)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn json_defaults_match_constants() {
        let a: Annotation = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        assert_eq!(a, Annotation::new("hi"));
    }

    #[test]
    fn png_annotation_changes_pixels_and_keeps_size() {
        let source = png_bytes(120, 80);
        let out = render(
            &source,
            ImageFormat::Png,
            &TextRenderer::Bitmap,
            &Annotation::new("hello").at(4, 4).with_font_size(16),
        )
        .unwrap();

        let before = image::load_from_memory(&source).unwrap().into_rgba8();
        let after = image::load_from_memory(&out).unwrap().into_rgba8();
        assert_eq!(after.dimensions(), (120, 80));
        assert_ne!(before, after);
        // White text over the dark background.
        assert!(after.pixels().any(|p| p[0] == 255 && p[1] == 255 && p[2] == 255));
    }

    #[test]
    fn jpeg_output_is_flattened() {
        let source = jpeg_bytes(64, 64);
        let out = render(
            &source,
            ImageFormat::Jpeg,
            &TextRenderer::Bitmap,
            &Annotation::new("x").at(0, 0).with_font_size(8),
        )
        .unwrap();
        let decoded = image::load_from_memory(&out).unwrap();
        assert!(!decoded.color().has_alpha());
    }

    #[test]
    fn corrupt_source_is_a_read_error() {
        let err = render(
            b"not an image",
            ImageFormat::Png,
            &TextRenderer::Bitmap,
            &Annotation::new("x"),
        )
        .unwrap_err();
        assert!(matches!(err, GalleryError::StorageRead(_)));
    }

    #[test]
    fn invalid_requests_are_rejected_before_decoding() {
        for annotation in [
            Annotation::new("  "),
            Annotation::new("x").with_font_size(0),
            Annotation::new("x").with_color("purple-ish"),
            Annotation::new("x").at(i64::MAX, 0),
            Annotation::new("x").at(0, i64::MIN),
            Annotation::new("x".repeat(MAX_TEXT_CHARS + 1)),
        ] {
            let err = render(
                b"not an image",
                ImageFormat::Png,
                &TextRenderer::Bitmap,
                &annotation,
            )
            .unwrap_err();
            assert!(matches!(err, GalleryError::Validation(_)));
        }
    }

    #[test]
    fn far_off_canvas_position_renders_unchanged_pixels() {
        let source = png_bytes(32, 32);
        let out = render(
            &source,
            ImageFormat::Png,
            &TextRenderer::Bitmap,
            &Annotation::new("far away")
                .at(MAX_POSITION, -MAX_POSITION)
                .with_font_size(MAX_FONT_SIZE),
        )
        .unwrap();

        let before = image::load_from_memory(&source).unwrap().into_rgba8();
        let after = image::load_from_memory(&out).unwrap().into_rgba8();
        assert_eq!(before, after);
    }

    #[test]
    fn extension_maps_to_format() {
        assert_eq!(format_for_extension("jpg").unwrap(), ImageFormat::Jpeg);
        assert_eq!(format_for_extension("webp").unwrap(), ImageFormat::WebP);
        assert!(format_for_extension("txt").is_err());
    }
}
