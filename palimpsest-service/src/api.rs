//! HTTP API for the palimpsest service.
//!
//! This module provides the REST endpoints:
//! - Liveness greeting
//! - Document text/handwriting extraction
//! - The declared cloud-recognition route

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::StaticConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::extraction::ocr::TextRecognizer;

pub mod extract;
use extract::{extract_cloud_handler, extract_pdf_handler};

/// Application state
pub struct AppState {
    /// Recognition backend applied to embedded images.
    pub recognizer: Arc<dyn TextRecognizer>,
}

/// Build the API router.
///
/// The CORS layer admits exactly one origin. Methods and headers are
/// mirrored from the request rather than wildcarded: the policy includes
/// credentials, which cannot be combined with wildcard lists.
pub fn router(recognizer: Arc<dyn TextRecognizer>, config: &StaticConfig) -> ServiceResult<Router> {
    let state = Arc::new(AppState { recognizer });

    let origin: HeaderValue =
        config
            .cors
            .allowed_origin
            .parse()
            .map_err(|_| ServiceError::Config {
                message: format!("Invalid CORS origin: {}", config.cors.allowed_origin),
            })?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    // Use the configured max document size for uploads
    let max_body_size = config.limits.max_document_size_bytes as usize;

    Ok(Router::new()
        .route("/", get(greeting_handler))
        .route(
            "/extract-pdf",
            post(extract_pdf_handler).layer(DefaultBodyLimit::max(max_body_size)),
        )
        .route("/extract-pdf-cloud", post(extract_cloud_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

// === Liveness ===

async fn greeting_handler() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: "Hello World".to_string(),
    })
}

#[derive(Serialize)]
struct GreetingResponse {
    message: String,
}
