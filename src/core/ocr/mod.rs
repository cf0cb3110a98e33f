//! # OCR Module
//!
//! Opt-in text extraction from page images.
//!
//! [`OcrExtractor`] walks a directory in scanner order, hands every image to
//! a [`TextRecognizer`] and joins the per-page text with a blank line. The
//! bundled recognizer, `OcrsRecognizer`, wraps the pure-Rust `ocrs` engine
//! and is only compiled with the `ocr` cargo feature.
//!
//! ## Model Setup
//! `ocrs` needs `text-detection.rten` and `text-recognition.rten`. Running
//! the `ocrs` CLI once downloads them into `~/.cache/ocrs`, which is the
//! default location used by [`OcrConfig`].

#[cfg(feature = "ocr")]
mod engine;

#[cfg(feature = "ocr")]
pub use engine::OcrsRecognizer;

use crate::core::decode::decode_file;
use crate::core::scanner::{ImageScanner, ScanConfig, WalkDirScanner};
use crate::error::OcrError;
use crate::events::{null_sender, Event, EventSender, OcrEvent};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Separator placed between the text of consecutive pages
pub const PAGE_SEPARATOR: &str = "\n\n";

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Turns one page image into text
pub trait TextRecognizer {
    fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError>;
}

/// Locations of the `ocrs` model files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl OcrConfig {
    /// Expect both models inside `dir`
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Check that both model files exist
    pub fn validate(&self) -> Result<(), OcrError> {
        for path in [&self.detection_model_path, &self.recognition_model_path] {
            if !path.exists() {
                return Err(OcrError::ModelNotFound { path: path.clone() });
            }
        }
        Ok(())
    }
}

impl Default for OcrConfig {
    /// `<cache dir>/ocrs`, falling back to `./ocrs-models`
    fn default() -> Self {
        let dir = dirs::cache_dir()
            .map(|d| d.join("ocrs"))
            .unwrap_or_else(|| PathBuf::from("ocrs-models"));
        Self::from_dir(dir)
    }
}

/// Runs a recognizer over every image in a directory
pub struct OcrExtractor<'a> {
    recognizer: &'a dyn TextRecognizer,
    scan_config: ScanConfig,
}

impl<'a> OcrExtractor<'a> {
    pub fn new(recognizer: &'a dyn TextRecognizer, scan_config: ScanConfig) -> Self {
        Self {
            recognizer,
            scan_config,
        }
    }

    /// Extract without events
    pub fn extract(&self, directory: &Path) -> Result<String, OcrError> {
        self.extract_with_events(directory, &null_sender())
    }

    /// Recognize each image independently and join the results.
    #[instrument(skip_all, fields(directory = %directory.display()))]
    pub fn extract_with_events(
        &self,
        directory: &Path,
        events: &EventSender,
    ) -> Result<String, OcrError> {
        let scanner = WalkDirScanner::new(self.scan_config.clone());
        let images = scanner.scan(&[directory.to_path_buf()])?.into_strict()?;

        events.send(Event::Ocr(OcrEvent::Started {
            total_pages: images.len(),
        }));

        let mut pages = Vec::with_capacity(images.len());
        for (index, image) in images.iter().enumerate() {
            let decoded = decode_file(&image.path)?;
            let text = self.recognizer.recognize(&decoded).map_err(|e| match e {
                OcrError::Engine(reason) => OcrError::Recognition {
                    path: image.path.clone(),
                    reason,
                },
                other => other,
            })?;

            debug!(path = %image.path.display(), characters = text.len(), "Page recognized");
            events.send(Event::Ocr(OcrEvent::PageRecognized {
                path: image.path.clone(),
                completed: index + 1,
                characters: text.len(),
            }));
            pages.push(text);
        }

        let content = pages.join(PAGE_SEPARATOR);
        info!(pages = pages.len(), characters = content.len(), "Text extraction complete");
        events.send(Event::Ocr(OcrEvent::Completed {
            total_characters: content.len(),
        }));

        Ok(content)
    }
}
