use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{domain::image::ImageId, image_service::PublishedImage};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn error(error: String) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(error),
            message: None,
        }
    }

    pub fn with_message(mut self, message: String) -> Self {
        self.message = Some(message);
        self
    }
}

/// Client-facing view of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageView {
    pub id: ImageId,
    pub title: Option<String>,
    pub url: String,
    pub order: i64,
    pub created_at: DateTime<Utc>,
}

impl From<PublishedImage> for ImageView {
    fn from(image: PublishedImage) -> Self {
        Self {
            id: image.record.id,
            title: image.record.title,
            url: image.url.to_string(),
            order: image.record.order,
            created_at: image.record.created_at,
        }
    }
}

/// Reduced view returned by the unversioned routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyImageView {
    pub id: ImageId,
    pub title: Option<String>,
    pub url: String,
}

impl From<PublishedImage> for LegacyImageView {
    fn from(image: PublishedImage) -> Self {
        Self {
            id: image.record.id,
            title: image.record.title,
            url: image.url.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<ImageId>,
}
