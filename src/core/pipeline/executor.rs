//! Pipeline execution implementation.

use super::preflight::preflight;
use crate::core::assembler::PdfAssembler;
use crate::core::ocr::{OcrExtractor, TextRecognizer};
use crate::core::scanner::ScanConfig;
use crate::core::splitter::{PageSplitter, SplitConfig, SplitSummary};
use crate::error::BookRipError;
use crate::events::{
    null_sender, Event, EventSender, PipelineEvent, PipelinePhase, PipelineSummary,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    /// What the splitter did
    pub split: SplitSummary,
    /// The merged PDF, if any pages were written
    pub pdf: Option<PathBuf>,
    /// Extracted text, when OCR was requested
    pub text: Option<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Configuration for the pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Directory of scanned spreads
    pub input: PathBuf,
    /// Directory receiving pages and `merged.pdf`
    pub output: PathBuf,
    /// Splitter configuration (debug output, scan options)
    pub split_config: SplitConfig,
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    recognizer: Option<Box<dyn TextRecognizer>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            recognizer: None,
        }
    }

    /// Set the directory of scanned spreads
    pub fn input(mut self, input: impl Into<PathBuf>) -> Self {
        self.config.input = input.into();
        self
    }

    /// Set the output directory
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.config.output = output.into();
        self
    }

    /// Write `<stem>.xdebug.png` for every split spread
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.split_config.debug = debug;
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.split_config.scan_config = config;
        self
    }

    /// Run OCR over the output pages with this recognizer
    pub fn recognizer(mut self, recognizer: Box<dyn TextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
            recognizer: self.recognizer,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The split → assemble → (OCR) pipeline
pub struct Pipeline {
    config: PipelineConfig,
    recognizer: Option<Box<dyn TextRecognizer>>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, BookRipError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, BookRipError> {
        events.send(Event::Pipeline(PipelineEvent::Started));

        let result = self.execute(events);
        if let Err(ref error) = result {
            warn!(%error, "Pipeline aborted");
            events.send(Event::Pipeline(PipelineEvent::Error {
                message: error.to_string(),
            }));
        }
        result
    }

    fn execute(&self, events: &EventSender) -> Result<PipelineResult, BookRipError> {
        let start_time = Instant::now();
        let scan_config = &self.config.split_config.scan_config;

        // Phase 1: Validating
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Validating,
        }));
        preflight(&self.config.input, &self.config.output, scan_config)?;

        // Phase 2: Splitting
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Splitting,
        }));
        let splitter = PageSplitter::new(self.config.split_config.clone());
        let split = splitter.split_with_events(&self.config.input, &self.config.output, events)?;

        // Phase 3: Assembling
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Assembling,
        }));
        let output_scan = output_scan_config(scan_config);
        let pdf = PdfAssembler::new(output_scan.clone())
            .assemble_with_events(&self.config.output, events)?;

        // Phase 4: Recognizing (opt-in)
        let text = match self.recognizer.as_deref() {
            Some(recognizer) => {
                events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
                    phase: PipelinePhase::Recognizing,
                }));
                let extractor = OcrExtractor::new(recognizer, output_scan);
                Some(extractor.extract_with_events(&self.config.output, events)?)
            }
            None => None,
        };

        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!(
            spreads_split = split.spreads_split,
            duplicates_skipped = split.duplicates_skipped,
            duration_ms,
            "Pipeline complete"
        );

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                images_seen: split.images_seen,
                spreads_split: split.spreads_split,
                duplicates_skipped: split.duplicates_skipped,
                pages_written: split.pages.len(),
                duration_ms,
            },
        }));

        Ok(PipelineResult {
            split,
            pdf,
            text,
            duration_ms,
        })
    }
}

/// Pages are always PNG and the output directory is flat, so input-only
/// narrowing (extensions, depth, symlinks) does not apply to it. Hidden
/// sources produce hidden page names, so that setting carries over.
fn output_scan_config(input: &ScanConfig) -> ScanConfig {
    ScanConfig {
        include_hidden: input.include_hidden,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{OcrError, ValidationError};
    use image::{DynamicImage, Rgb, RgbImage};
    use std::path::Path;
    use tempfile::TempDir;

    fn write_spread(dir: &Path, name: &str, shade: u8) {
        RgbImage::from_pixel(620, 400, Rgb([shade, shade, shade]))
            .save(dir.join(name))
            .unwrap();
    }

    struct CountingRecognizer;

    impl TextRecognizer for CountingRecognizer {
        fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
            Ok(format!("{}px", image.width()))
        }
    }

    #[test]
    fn pipeline_builder_sets_config() {
        let pipeline = Pipeline::builder()
            .input("/scans")
            .output("/pages")
            .debug(true)
            .scan_config(ScanConfig {
                include_hidden: true,
                ..Default::default()
            })
            .build();

        assert_eq!(pipeline.config().input, PathBuf::from("/scans"));
        assert!(pipeline.config().split_config.debug);
        assert!(pipeline.config().split_config.scan_config.include_hidden);
    }

    #[test]
    fn pipeline_rejects_empty_input_without_creating_output() {
        let input = TempDir::new().unwrap();
        let parent = TempDir::new().unwrap();
        let output = parent.path().join("pages");

        let error = Pipeline::builder()
            .input(input.path())
            .output(&output)
            .build()
            .run()
            .unwrap_err();

        assert!(matches!(
            error,
            BookRipError::Validation(ValidationError::NoImagesFound { .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn pipeline_splits_and_assembles() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_spread(input.path(), "a.png", 10);
        write_spread(input.path(), "b.png", 20);

        let result = Pipeline::builder()
            .input(input.path())
            .output(output.path())
            .build()
            .run()
            .unwrap();

        assert_eq!(result.split.spreads_split, 1);
        assert_eq!(result.pdf, Some(output.path().join("merged.pdf")));
        assert!(result.text.is_none());
    }

    #[test]
    fn pipeline_with_only_a_cover_skips_pdf() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_spread(input.path(), "a.png", 10);

        let result = Pipeline::builder()
            .input(input.path())
            .output(output.path())
            .build()
            .run()
            .unwrap();

        assert!(result.pdf.is_none());
    }

    #[test]
    fn input_extension_filter_does_not_hide_pages_from_pdf() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        RgbImage::from_pixel(620, 400, Rgb([10, 10, 10]))
            .save(input.path().join("a.bmp"))
            .unwrap();
        RgbImage::from_pixel(620, 400, Rgb([20, 20, 20]))
            .save(input.path().join("b.bmp"))
            .unwrap();

        let result = Pipeline::builder()
            .input(input.path())
            .output(output.path())
            .scan_config(ScanConfig {
                extensions: Some(vec!["bmp".to_string()]),
                ..Default::default()
            })
            .build()
            .run()
            .unwrap();

        assert_eq!(result.split.pages.len(), 2);
        assert_eq!(result.pdf, Some(output.path().join("merged.pdf")));
    }

    #[test]
    fn pipeline_runs_ocr_when_requested() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write_spread(input.path(), "a.png", 10);
        write_spread(input.path(), "b.png", 20);

        let result = Pipeline::builder()
            .input(input.path())
            .output(output.path())
            .recognizer(Box::new(CountingRecognizer))
            .build()
            .run()
            .unwrap();

        // 620 wide crops to 50 columns: two 25px pages.
        assert_eq!(result.text.as_deref(), Some("25px\n\n25px"));
    }
}
