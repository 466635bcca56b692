use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog-assigned identity of an image. Immutable once issued.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct ImageId(pub i64);

impl ImageId {
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ImageId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// One row of the catalog: an image file plus its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ImageRecord {
    pub id: ImageId,
    /// Storage key of the bytes in the file store.
    pub filename: String,
    pub title: Option<String>,
    #[sqlx(rename = "ord")]
    pub order: i64,
    pub created_at: DateTime<Utc>,
}

impl ImageRecord {
    /// `None` and empty titles both count as untitled.
    pub fn is_untitled(&self) -> bool {
        self.title.as_deref().is_none_or(|t| t.trim().is_empty())
    }
}

/// Insert payload; the catalog assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImage {
    pub filename: String,
    pub title: Option<String>,
    pub order: i64,
    pub created_at: DateTime<Utc>,
}

impl NewImage {
    pub fn new(filename: impl Into<String>, order: i64) -> Self {
        Self {
            filename: filename.into(),
            title: None,
            order,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: Option<&str>) -> ImageRecord {
        ImageRecord {
            id: ImageId(1),
            filename: "a.png".into(),
            title: title.map(str::to_string),
            order: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn blank_titles_are_untitled() {
        assert!(record(None).is_untitled());
        assert!(record(Some("")).is_untitled());
        assert!(record(Some("   ")).is_untitled());
        assert!(!record(Some("sunset")).is_untitled());
    }

    #[test]
    fn image_id_serializes_as_plain_integer() {
        let json = serde_json::to_string(&ImageId(42)).unwrap();
        assert_eq!(json, "42");
    }
}
