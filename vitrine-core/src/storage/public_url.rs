use url::Url;

use crate::error::{GalleryError, Result};

/// Maps storage keys to the addresses the static file server exposes.
///
/// `base` is the externally visible origin (optionally with a path prefix)
/// and `mount_path` the prefix the store root is mounted at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUrlMapper {
    base: Url,
    mount_path: String,
}

impl PublicUrlMapper {
    pub fn new(mut base: Url, mount_path: &str) -> Result<Self> {
        if base.cannot_be_a_base() {
            return Err(GalleryError::Validation(format!(
                "public base url '{base}' cannot be used as a base"
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mount_path = mount_path.trim_matches('/').to_string();
        Ok(Self { base, mount_path })
    }

    /// Route prefix the static server should be mounted at, e.g. `/uploads`.
    pub fn mount_route(&self) -> String {
        format!("/{}", self.mount_path)
    }

    pub fn url_for(&self, key: &str) -> Url {
        let relative = if self.mount_path.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", self.mount_path, key)
        };

        // Keys are validated to a URL-safe alphabet before they reach here.
        self.base
            .join(&relative)
            .unwrap_or_else(|_| self.base.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(base: &str, mount: &str) -> PublicUrlMapper {
        PublicUrlMapper::new(Url::parse(base).unwrap(), mount).unwrap()
    }

    #[test]
    fn maps_key_under_mount() {
        let m = mapper("http://localhost:8000", "/uploads");
        assert_eq!(
            m.url_for("abc.png").as_str(),
            "http://localhost:8000/uploads/abc.png"
        );
        assert_eq!(m.mount_route(), "/uploads");
    }

    #[test]
    fn keeps_base_path_prefix() {
        let m = mapper("https://example.com/gallery", "uploads/");
        assert_eq!(
            m.url_for("1.jpg").as_str(),
            "https://example.com/gallery/uploads/1.jpg"
        );
    }

    #[test]
    fn empty_mount_maps_to_base() {
        let m = mapper("https://cdn.example.com/", "");
        assert_eq!(m.url_for("1.jpg").as_str(), "https://cdn.example.com/1.jpg");
    }

    #[test]
    fn rejects_non_base_urls() {
        let err =
            PublicUrlMapper::new(Url::parse("mailto:a@b.c").unwrap(), "/x")
                .unwrap_err();
        assert!(matches!(err, GalleryError::Validation(_)));
    }
}
