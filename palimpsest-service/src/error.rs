use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Main service error type.
///
/// Everything a caller can observe passes through here and renders as the
/// single `{"error": ...}` response shape.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("{0}")]
    Extraction(#[from] ExtractError),

    #[error("Cloud recognition backend is not implemented")]
    CloudBackendUnimplemented,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Request-fatal outcomes of the extraction pipeline.
///
/// Per-unit faults (a bad page, a bad image object, a failed recognition)
/// never reach this type; they are logged and absorbed inside the pipeline
/// loops.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The upload could not be parsed as a PDF document at all.
    #[error("Error processing PDF: {0}")]
    InvalidDocument(#[from] lopdf::Error),

    /// The document parsed, but neither text stream produced anything.
    #[error("Could not extract any text from the PDF")]
    NothingExtracted,
}

/// OCR engine errors: construction-time model problems and per-bitmap
/// recognition faults.
#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error(
        "OCR model not found at {}; run `ocrs-cli` once to download models",
        .path.display()
    )]
    MissingModel { path: PathBuf },

    #[error("OCR engine initialization failed: {message}")]
    EngineInit { message: String },

    #[error("recognition failed: {message}")]
    Recognition { message: String },
}

/// Wire shape for every error response.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            ServiceError::Extraction(ExtractError::InvalidDocument(_)) => StatusCode::BAD_REQUEST,
            ServiceError::Extraction(ExtractError::NothingExtracted) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServiceError::CloudBackendUnimplemented => StatusCode::NOT_IMPLEMENTED,
            ServiceError::Config { .. } | ServiceError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_error() -> lopdf::Error {
        lopdf::Document::load_mem(b"not a pdf").unwrap_err()
    }

    #[test]
    fn fatal_and_empty_errors_are_distinguishable() {
        let fatal = ExtractError::InvalidDocument(parse_error());
        let empty = ExtractError::NothingExtracted;
        assert_ne!(fatal.to_string(), empty.to_string());
        assert!(fatal.to_string().starts_with("Error processing PDF"));
        assert_eq!(empty.to_string(), "Could not extract any text from the PDF");
    }

    #[test]
    fn status_codes_follow_the_taxonomy() {
        let fatal = ServiceError::from(ExtractError::InvalidDocument(parse_error()));
        assert_eq!(fatal.status_code(), StatusCode::BAD_REQUEST);

        let empty = ServiceError::from(ExtractError::NothingExtracted);
        assert_eq!(empty.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let stub = ServiceError::CloudBackendUnimplemented;
        assert_eq!(stub.status_code(), StatusCode::NOT_IMPLEMENTED);
    }
}
