//! Unversioned endpoints with the response shapes the original single-page
//! front-end expects: bare arrays and `{ok: true}` acknowledgements.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use serde_json::{Value, json};
use vitrine_core::{
    Annotation, ImageId,
    annotate::{DEFAULT_COLOR, DEFAULT_FONT_SIZE, DEFAULT_X, DEFAULT_Y},
    api::{LegacyImageView, routes},
};

use crate::{
    AppState,
    handlers::images::read_upload_files,
    infra::errors::{AppError, AppResult},
};

pub async fn index_handler(State(state): State<AppState>) -> Json<Value> {
    let mount = state.config().storage.mount_path.trim_end_matches('/');
    Json(json!({
        "ok": true,
        "endpoints": [
            routes::legacy::IMAGES,
            format!("{} (POST)", routes::legacy::UPLOAD),
            format!("{} (POST)", routes::legacy::REORDER),
            format!("{} (POST)", routes::legacy::ANNOTATE),
            format!("{mount}/*"),
            routes::v1::images::COLLECTION,
        ],
    }))
}

pub async fn list_images_handler(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<LegacyImageView>>> {
    let images = state.images.list().await?;
    Ok(Json(images.into_iter().map(LegacyImageView::from).collect()))
}

pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<Vec<LegacyImageView>>> {
    let files = read_upload_files(multipart).await?;
    let stored = state.images.upload(files).await?;
    Ok(Json(stored.into_iter().map(LegacyImageView::from).collect()))
}

pub async fn delete_image_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    state.images.delete(ImageId(id)).await?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn reorder_handler(
    State(state): State<AppState>,
    Json(ids): Json<Vec<ImageId>>,
) -> AppResult<Json<Value>> {
    state.images.reorder(&ids).await?;
    Ok(Json(json!({ "ok": true })))
}

/// Form-encoded annotate, as sent by a browser `FormData`.
pub async fn annotate_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<LegacyImageView>> {
    let mut fields = HashMap::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        fields.insert(name, field.text().await?);
    }

    let image_id: i64 = required(&fields, "image_id")?;
    let text = fields
        .get("text")
        .cloned()
        .ok_or_else(|| AppError::bad_request("missing form field 'text'"))?;
    let annotation = Annotation {
        text,
        x: optional(&fields, "x")?.unwrap_or(DEFAULT_X),
        y: optional(&fields, "y")?.unwrap_or(DEFAULT_Y),
        font_size: optional(&fields, "font_size")?.unwrap_or(DEFAULT_FONT_SIZE),
        color: fields
            .get("color")
            .cloned()
            .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
    };

    let image = state.images.annotate(ImageId(image_id), annotation).await?;
    Ok(Json(image.into()))
}

fn required<T: std::str::FromStr>(
    fields: &HashMap<String, String>,
    name: &str,
) -> AppResult<T> {
    optional(fields, name)?.ok_or_else(|| {
        AppError::bad_request(format!("missing form field '{name}'"))
    })
}

fn optional<T: std::str::FromStr>(
    fields: &HashMap<String, String>,
    name: &str,
) -> AppResult<Option<T>> {
    match fields.get(name).map(|raw| raw.trim()) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            AppError::bad_request(format!("invalid form field '{name}': '{raw}'"))
        }),
    }
}
