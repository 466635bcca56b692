use axum::{
    Router,
    routing::{delete, get, post},
};
use vitrine_core::api::routes::legacy as paths;

use crate::{AppState, handlers::legacy};

pub fn create_legacy_router() -> Router<AppState> {
    Router::new()
        .route(paths::INDEX, get(legacy::index_handler))
        .route(paths::IMAGES, get(legacy::list_images_handler))
        .route(paths::IMAGE, delete(legacy::delete_image_handler))
        .route(paths::UPLOAD, post(legacy::upload_handler))
        .route(paths::REORDER, post(legacy::reorder_handler))
        .route(paths::ANNOTATE, post(legacy::annotate_handler))
}
