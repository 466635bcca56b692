pub mod legacy;
pub mod v1;

use crate::AppState;
use axum::Router;

/// Create the main API router with all versions plus the unversioned
/// routes.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(v1::create_v1_router())
        .merge(legacy::create_legacy_router())
}
