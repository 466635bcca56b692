//! Storage key helpers.
//!
//! Keys are flat file names inside the store root: a stem of ASCII
//! alphanumerics, `-` or `_`, followed by a lower-case extension.

use std::path::Path;

use uuid::Uuid;

use crate::{
    domain::image::ImageId,
    error::{GalleryError, Result},
};

/// Lower-cased extension of `file_name` without the leading dot.
pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Strip a leading dot and lower-case; `".JPG"` and `"jpg"` are the same.
pub fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_ascii_lowercase()
}

pub fn random_key(extension: &str) -> String {
    format!("{}.{}", Uuid::new_v4().simple(), normalize_extension(extension))
}

pub fn identity_key(id: ImageId, extension: &str) -> String {
    format!("{}.{}", id, normalize_extension(extension))
}

pub fn is_valid_key(key: &str) -> bool {
    let Some((stem, ext)) = key.rsplit_once('.') else {
        return false;
    };

    !stem.is_empty()
        && !ext.is_empty()
        && stem
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        && ext.bytes().all(|b| b.is_ascii_alphanumeric())
}

pub fn ensure_valid_key(key: &str) -> Result<()> {
    if is_valid_key(key) {
        Ok(())
    } else {
        Err(GalleryError::Validation(format!("invalid storage key: {key:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        assert_eq!(extension_of("Holiday.JPG").as_deref(), Some("jpg"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn normalize_strips_dot() {
        assert_eq!(normalize_extension(".PNG"), "png");
        assert_eq!(normalize_extension(" webp "), "webp");
    }

    #[test]
    fn random_keys_are_unique_and_valid() {
        let a = random_key(".Png");
        let b = random_key("png");
        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
        assert_eq!(a.len(), 32 + 4);
        assert!(is_valid_key(&a));
    }

    #[test]
    fn identity_key_uses_id() {
        assert_eq!(identity_key(ImageId(17), "JPEG"), "17.jpeg");
    }

    #[test]
    fn traversal_and_hidden_keys_are_rejected() {
        assert!(!is_valid_key("../etc/passwd"));
        assert!(!is_valid_key("a/b.png"));
        assert!(!is_valid_key(".hidden"));
        assert!(!is_valid_key("noext"));
        assert!(!is_valid_key("x.tmp-..png"));
        assert!(is_valid_key("abc_123-x.png"));
    }
}
