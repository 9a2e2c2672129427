//! Service configuration, loaded once at startup and never mutated afterwards.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{ServiceError, ServiceResult};

/// Static configuration for the service.
///
/// Sources, in order: an optional `config.*` file in the working directory,
/// then environment variables with the `PALIMPSEST` prefix and `__`
/// separator (e.g. `PALIMPSEST__SERVER__PORT=9000`). Every field carries a
/// default, so the service starts with no configuration present.
#[derive(Debug, Clone, Deserialize)]
pub struct StaticConfig {
    #[serde(default = "default_server")]
    pub server: ServerConfig,

    #[serde(default = "default_cors")]
    pub cors: CorsConfig,

    #[serde(default = "default_limits")]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub ocr: OcrConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

/// Cross-origin policy: exactly one origin is admitted; methods and headers
/// are mirrored from the request, credentials included.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,
}

/// Upload size limits
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_document_size")]
    pub max_document_size_bytes: u64,
}

/// OCR model location. When `model_dir` is unset, the default cache
/// directory is used (see `extraction::ocr`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrConfig {
    #[serde(default)]
    pub model_dir: Option<PathBuf>,
}

impl StaticConfig {
    /// Load configuration from file and environment variables.
    pub fn load() -> ServiceResult<Self> {
        Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("PALIMPSEST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ServiceError::Config {
                message: format!("Failed to build config: {}", e),
            })?
            .try_deserialize()
            .map_err(|e| ServiceError::Config {
                message: format!("Failed to deserialize config: {}", e),
            })
    }
}

// ==================== Default Value Functions ====================

fn default_server() -> ServerConfig {
    ServerConfig {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors() -> CorsConfig {
    CorsConfig {
        allowed_origin: default_allowed_origin(),
    }
}

fn default_allowed_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_limits() -> LimitsConfig {
    LimitsConfig {
        max_document_size_bytes: default_max_document_size(),
    }
}

fn default_max_document_size() -> u64 {
    104_857_600 // 100MB
}
