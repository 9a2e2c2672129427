//! Optical character recognition over decoded bitmaps.
//!
//! The engine is backed by the `ocrs` crate, a pure-Rust OCR stack running
//! neural network models through `rten`. Models are loaded once at startup
//! and the engine is shared read-only across requests.
//!
//! Two `.rten` model files are required:
//! - `text-detection.rten` locates text regions in the image
//! - `text-recognition.rten` decodes characters from detected regions
//!
//! Running `ocrs-cli` once downloads both into the default cache directory
//! (`$XDG_CACHE_HOME/ocrs`, typically `~/.cache/ocrs`).

use std::path::{Path, PathBuf};

use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info};

use crate::config::OcrConfig;
use crate::error::RecognitionError;

/// Well-known filenames for the detection and recognition models.
const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Recognition backend seam.
///
/// The local engine implements this today; a cloud-hosted backend would be
/// a second implementor behind the same extraction pipeline.
pub trait TextRecognizer: Send + Sync {
    /// Recognize the text content of one bitmap.
    fn recognize(&self, image: &DynamicImage) -> Result<String, RecognitionError>;
}

/// Local OCR engine.
pub struct OcrEngine {
    engine: OcrsEngine,
}

impl OcrEngine {
    /// Load both models and initialize the engine.
    ///
    /// Model loading is the expensive step; keep the engine around and call
    /// [`TextRecognizer::recognize`] per bitmap.
    pub fn new(config: &OcrConfig) -> Result<Self, RecognitionError> {
        let dir = config.model_dir.clone().unwrap_or_else(default_model_dir);
        info!(dir = %dir.display(), "Loading OCR models");

        let detection_model = load_model(&dir.join(DETECTION_MODEL_FILENAME))?;
        let recognition_model = load_model(&dir.join(RECOGNITION_MODEL_FILENAME))?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| RecognitionError::EngineInit {
            message: err.to_string(),
        })?;

        Ok(Self { engine })
    }
}

impl TextRecognizer for OcrEngine {
    fn recognize(&self, image: &DynamicImage) -> Result<String, RecognitionError> {
        // ocrs expects RGB8 input.
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            RecognitionError::Recognition {
                message: format!("invalid {}x{} input: {}", width, height, err),
            }
        })?;

        let input =
            self.engine
                .prepare_input(source)
                .map_err(|err| RecognitionError::Recognition {
                    message: format!("preprocessing failed: {}", err),
                })?;

        let text = self
            .engine
            .get_text(&input)
            .map_err(|err| RecognitionError::Recognition {
                message: format!("recognition failed: {}", err),
            })?;

        debug!(
            lines = text.lines().count(),
            chars = text.len(),
            "Recognition complete"
        );

        Ok(text)
    }
}

fn load_model(path: &Path) -> Result<Model, RecognitionError> {
    if !path.exists() {
        return Err(RecognitionError::MissingModel {
            path: path.to_path_buf(),
        });
    }
    Model::load_file(path).map_err(|err| RecognitionError::EngineInit {
        message: format!("failed to load model from {}: {}", path.display(), err),
    })
}

/// Default directory for cached OCR model files.
///
/// Follows the XDG base directory convention: `$XDG_CACHE_HOME/ocrs`,
/// falling back to `~/.cache/ocrs` when `XDG_CACHE_HOME` is unset.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}
