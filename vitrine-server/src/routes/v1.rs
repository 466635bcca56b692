use axum::{
    Router,
    routing::{get, post},
};
use vitrine_core::api::routes::v1;

use crate::{AppState, handlers::images};

/// Create all v1 API routes
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route(
            v1::images::COLLECTION,
            get(images::list_images_handler).post(images::upload_images_handler),
        )
        .route(v1::images::REORDER, post(images::reorder_images_handler))
        .route(
            v1::images::ITEM,
            get(images::get_image_handler)
                .patch(images::rename_image_handler)
                .delete(images::delete_image_handler),
        )
        .route(v1::images::ANNOTATE, post(images::annotate_image_handler))
}
