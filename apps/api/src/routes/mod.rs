pub mod health;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::analysis::handlers;
use crate::state::AppState;

/// Room for the form's other fields and percent-encoding of base64 padding.
const FORM_OVERHEAD_BYTES: usize = 8 * 1024;

/// Body limit for the base64 form route: a file of `max_upload_bytes` is
/// 4/3 larger once encoded, so both upload routes accept the same file size.
pub fn base64_body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes.div_ceil(3) * 4 + FORM_OVERHEAD_BYTES
}

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(health::index_handler))
        .route("/health", get(health::health_handler))
        .route("/analyze-cv", post(handlers::handle_analyze_cv))
        .route(
            "/analyze-cv-base64",
            post(handlers::handle_analyze_cv_base64)
                .layer(DefaultBodyLimit::max(base64_body_limit(body_limit))),
        )
        .route("/analyze-cv-text", post(handlers::handle_analyze_cv_text))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// CORS restricted to the configured origins, with credentials allowed.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin '{origin}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}
