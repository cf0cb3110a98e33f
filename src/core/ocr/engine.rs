//! `ocrs`-backed recognizer.
//!
//! Model loading is the expensive part; build one recognizer and reuse it
//! for every page. Debug builds of `ocrs`/`rten` are very slow.

use super::{OcrConfig, TextRecognizer};
use crate::error::OcrError;
use image::DynamicImage;
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Text recognizer running the `ocrs` detection and recognition models
pub struct OcrsRecognizer {
    engine: OcrEngine,
}

impl OcrsRecognizer {
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        config.validate()?;

        info!("Loading OCR models");
        let detection_model = load_model(&config.detection_model_path)?;
        let recognition_model = load_model(&config.recognition_model_path)?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| OcrError::Engine(format!("failed to initialise engine: {}", err)))?;

        Ok(Self { engine })
    }
}

fn load_model(path: &Path) -> Result<Model, OcrError> {
    Model::load_file(path).map_err(|err| OcrError::ModelLoad {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

impl TextRecognizer for OcrsRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            OcrError::Engine(format!("bad image source ({}x{}): {}", width, height, err))
        })?;

        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| OcrError::Engine(format!("preprocessing failed: {}", err)))?;

        let text = self
            .engine
            .get_text(&input)
            .map_err(|err| OcrError::Engine(err.to_string()))?;

        debug!(lines = text.lines().count(), "Recognized page");
        Ok(text)
    }
}
