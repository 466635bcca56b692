use axum::{Router, extract::DefaultBodyLimit, http::HeaderValue};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::warn;

use crate::{AppState, infra::config::CorsConfig, routes::create_api_router};

/// Upper bound on a request body; multi-file uploads need more than axum's
/// 2 MiB default.
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Build the complete application router: API routes, the read-only static
/// mount of the upload directory, and the middleware stack.
pub fn create_app(state: AppState) -> Router {
    let cors_layer = if state.config().dev_mode {
        CorsLayer::permissive()
    } else {
        build_cors_layer(&state.config().cors)
    };

    let uploads = ServeDir::new(state.files.root());
    let mount_route = state.files.urls().mount_route();

    create_api_router()
        .nest_service(&mount_route, uploads)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        // Outer to inner: CORS, then tracing.
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

fn build_cors_layer(cors: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    // A literal `*` cannot be combined with credentials; the loader has
    // already warned about it.
    if cors.is_wildcard_included() {
        return layer.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    layer
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(cors.allow_credentials)
}
