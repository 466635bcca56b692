use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use tracing::{debug, info};
use vitrine_core::{
    Annotation, ImageId, PublishedImage, UploadFile,
    api::{ApiResponse, ImageView, RenameRequest, ReorderRequest},
};

use crate::{
    AppState,
    infra::errors::AppResult,
};

/// Multipart field carrying upload files; `file` is accepted for single
/// uploads.
const FILES_FIELD: &str = "files";
const FILE_FIELD: &str = "file";

/// Collect every file part of an upload request in submission order.
pub(crate) async fn read_upload_files(
    mut multipart: Multipart,
) -> AppResult<Vec<UploadFile>> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name != FILES_FIELD && name != FILE_FIELD {
            debug!(field = %name, "ignoring unexpected multipart field");
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        files.push(UploadFile::new(file_name, bytes.to_vec()));
    }
    Ok(files)
}

fn views(images: Vec<PublishedImage>) -> Vec<ImageView> {
    images.into_iter().map(ImageView::from).collect()
}

pub async fn list_images_handler(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ImageView>>>> {
    let images = state.images.list().await?;
    Ok(Json(ApiResponse::success(views(images))))
}

pub async fn upload_images_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Vec<ImageView>>>> {
    let files = read_upload_files(multipart).await?;
    let submitted = files.len();
    let stored = state.images.upload(files).await?;
    info!(submitted, stored = stored.len(), "upload request handled");

    let message = format!("stored {} of {} files", stored.len(), submitted);
    Ok(Json(ApiResponse::success(views(stored)).with_message(message)))
}

pub async fn get_image_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<ImageView>>> {
    let image = state.images.get(ImageId(id)).await?;
    Ok(Json(ApiResponse::success(image.into())))
}

pub async fn rename_image_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<RenameRequest>,
) -> AppResult<Json<ApiResponse<ImageView>>> {
    let image = state.images.rename(ImageId(id), request.title).await?;
    Ok(Json(ApiResponse::success(image.into())))
}

pub async fn delete_image_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.images.delete(ImageId(id)).await?;
    Ok(Json(
        ApiResponse::success(()).with_message(format!("image {id} deleted")),
    ))
}

pub async fn reorder_images_handler(
    State(state): State<AppState>,
    Json(request): Json<ReorderRequest>,
) -> AppResult<Json<ApiResponse<Vec<ImageView>>>> {
    let images = state.images.reorder(&request.ids).await?;
    Ok(Json(ApiResponse::success(views(images))))
}

pub async fn annotate_image_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(annotation): Json<Annotation>,
) -> AppResult<Json<ApiResponse<ImageView>>> {
    let image = state.images.annotate(ImageId(id), annotation).await?;
    Ok(Json(ApiResponse::success(image.into())))
}
