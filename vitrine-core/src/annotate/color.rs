use image::Rgba;

use crate::error::{GalleryError, Result};

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or a handful of basic names.
pub fn parse_color(raw: &str) -> Result<Rgba<u8>> {
    let value = raw.trim();
    let named = match value.to_ascii_lowercase().as_str() {
        "white" => Some([255, 255, 255, 255]),
        "black" => Some([0, 0, 0, 255]),
        "red" => Some([255, 0, 0, 255]),
        "green" => Some([0, 128, 0, 255]),
        "blue" => Some([0, 0, 255, 255]),
        "yellow" => Some([255, 255, 0, 255]),
        _ => None,
    };
    if let Some(rgba) = named {
        return Ok(Rgba(rgba));
    }

    let invalid = || GalleryError::Validation(format!("invalid color: {raw:?}"));
    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match hex.len() {
        3 => {
            let mut out = [0u8, 0, 0, 255];
            for (i, c) in hex.chars().enumerate() {
                let nibble = channel(&c.to_string())?;
                out[i] = nibble * 17;
            }
            Ok(Rgba(out))
        }
        6 | 8 => {
            let r = channel(&hex[0..2])?;
            let g = channel(&hex[2..4])?;
            let b = channel(&hex[4..6])?;
            let a = if hex.len() == 8 {
                channel(&hex[6..8])?
            } else {
                255
            };
            Ok(Rgba([r, g, b, a]))
        }
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(parse_color("#ffffff").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_color("#F00").unwrap(), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_color("#00ff0080").unwrap(), Rgba([0, 255, 0, 128]));
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(parse_color("Black").unwrap(), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn rejects_garbage() {
        for raw in ["", "fff", "#ggg", "#12345", "#1234567890", "#é12"] {
            assert!(
                matches!(parse_color(raw), Err(GalleryError::Validation(_))),
                "{raw:?} should be rejected"
            );
        }
    }
}
