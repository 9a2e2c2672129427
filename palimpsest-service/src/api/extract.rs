//! Document extraction endpoints.

use axum::{
    Json,
    extract::{Multipart, State},
};
use std::sync::Arc;
use tracing::info;

use crate::error::{ServiceError, ServiceResult};
use crate::extraction::{self, DocumentText};

use super::AppState;

/// Upload a PDF and extract its machine text and recognized handwriting.
pub async fn extract_pdf_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ServiceResult<Json<DocumentText>> {
    let mut file_data: Option<Vec<u8>> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            let data = field
                .bytes()
                .await
                .map_err(|e| ServiceError::InvalidRequest {
                    message: e.to_string(),
                })?;
            file_data = Some(data.to_vec());
        }
    }

    let data = file_data.ok_or_else(|| ServiceError::InvalidRequest {
        message: "No file provided".to_string(),
    })?;

    info!(bytes = data.len(), "Extracting uploaded document");

    // The pipeline is CPU-bound; run it off the async workers. All document
    // state is owned by the closure, so nothing is shared across requests
    // except the read-only recognizer.
    let recognizer = state.recognizer.clone();
    let result = tokio::task::spawn_blocking(move || {
        extraction::extract_document(&data, recognizer.as_ref())
    })
    .await
    .map_err(|e| ServiceError::Internal {
        message: e.to_string(),
    })??;

    Ok(Json(result))
}

/// The declared cloud-recognition route.
///
/// A remote backend would slot in as a second [`TextRecognizer`] behind the
/// same pipeline; until one exists, the route answers 501.
///
/// [`TextRecognizer`]: crate::extraction::ocr::TextRecognizer
pub async fn extract_cloud_handler() -> ServiceResult<Json<DocumentText>> {
    Err(ServiceError::CloudBackendUnimplemented)
}
