//! # Splitter Module
//!
//! Deduplicates scanned spreads and splits each unique one into pages.
//!
//! ## Per-file Steps
//! 1. **Decode** - read the source image
//! 2. **Crop** - grayscale, then trim the fixed margins
//! 3. **Fingerprint** - hash the cropped pixel bytes
//! 4. **Classify** - repeat → duplicate, first new → cover, otherwise split
//! 5. **Write** - left and right pages (plus the full spread in debug mode)
//!
//! Files are handled strictly one after another in scanner order. The cover
//! is simply the first fingerprint of the run, so reordering the input
//! changes the output.

mod naming;

pub use naming::{page_path, PageVariant};

use crate::core::decode::decode_file;
use crate::core::fingerprint::{Fingerprint, SeenSet, Sighting};
use crate::core::geometry::CroppedSpread;
use crate::core::scanner::{ImageFile, ImageScanner, ScanConfig, WalkDirScanner};
use crate::error::SplitError;
use crate::events::{
    null_sender, Event, EventSender, SplitEvent, SplitProgress, SpreadOutcome,
};
use image::{GrayImage, ImageFormat};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Configuration for a split run
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Also write the whole cropped spread as `<stem>.xdebug.png`
    pub debug: bool,
    /// Report progress every this many split spreads (0 = never)
    pub progress_interval: usize,
    /// How the input directory is walked
    pub scan_config: ScanConfig,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            debug: false,
            progress_interval: 10,
            scan_config: ScanConfig::default(),
        }
    }
}

/// What a split run did
#[derive(Debug, Clone, Default, Serialize)]
pub struct SplitSummary {
    /// Source images processed
    pub images_seen: usize,
    /// The spread consumed as the cover
    pub cover: Option<PathBuf>,
    /// Hex fingerprint of the cover's cropped pixels
    pub cover_fingerprint: Option<String>,
    /// Spreads skipped because their fingerprint was already seen
    pub duplicates_skipped: usize,
    /// Spreads written as page pairs
    pub spreads_split: usize,
    /// Distinct fingerprints, cover included
    pub unique_fingerprints: usize,
    /// Page images written, in order
    pub pages: Vec<PathBuf>,
    /// Debug spreads written, in order
    pub debug_images: Vec<PathBuf>,
}

/// Mutable state threaded through one run
struct RunState {
    seen: SeenSet,
    summary: SplitSummary,
}

/// Splits a directory of spreads into single pages
pub struct PageSplitter {
    config: SplitConfig,
}

impl PageSplitter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    /// Run without events
    pub fn split(&self, input: &Path, output: &Path) -> Result<SplitSummary, SplitError> {
        self.split_with_events(input, output, &null_sender())
    }

    /// Run with event reporting.
    ///
    /// Creates `output` if needed. The first error aborts the run; pages
    /// written before it stay on disk.
    #[instrument(skip_all, fields(input = %input.display(), output = %output.display()))]
    pub fn split_with_events(
        &self,
        input: &Path,
        output: &Path,
        events: &EventSender,
    ) -> Result<SplitSummary, SplitError> {
        fs::create_dir_all(output).map_err(|source| SplitError::CreateOutputDir {
            path: output.to_path_buf(),
            source,
        })?;

        let scanner = WalkDirScanner::new(self.config.scan_config.clone());
        let images = scanner
            .scan_with_events(&[input.to_path_buf()], events)?
            .into_strict()?;

        events.send(Event::Split(SplitEvent::Started {
            total_images: images.len(),
        }));
        info!(total_images = images.len(), "Splitting spreads");

        let mut state = RunState {
            seen: SeenSet::new(),
            summary: SplitSummary::default(),
        };

        for image in &images {
            let (fingerprint, outcome) = self.process_spread(image, output, &mut state, events)?;
            state.summary.images_seen += 1;

            events.send(Event::Split(SplitEvent::SpreadProcessed {
                path: image.path.clone(),
                fingerprint: fingerprint.to_hex(),
                outcome,
                completed: state.summary.images_seen,
            }));

            if outcome == SpreadOutcome::Split {
                self.report_progress(&state.summary, &image.path, events);
            }
        }

        state.summary.unique_fingerprints = state.seen.len();
        state.summary.cover_fingerprint = state.seen.first().map(Fingerprint::to_hex);

        events.send(Event::Split(SplitEvent::Completed {
            spreads_split: state.summary.spreads_split,
            duplicates_skipped: state.summary.duplicates_skipped,
        }));
        info!(
            spreads_split = state.summary.spreads_split,
            duplicates_skipped = state.summary.duplicates_skipped,
            pages = state.summary.pages.len(),
            "Splitting complete"
        );

        Ok(state.summary)
    }

    fn process_spread(
        &self,
        image: &ImageFile,
        output: &Path,
        state: &mut RunState,
        events: &EventSender,
    ) -> Result<(Fingerprint, SpreadOutcome), SplitError> {
        let path = &image.path;

        // The decoded source is dropped as soon as the crop exists.
        let spread = {
            let source = decode_file(path)?;
            CroppedSpread::from_image(&source).map_err(|source| SplitError::Geometry {
                path: path.clone(),
                source,
            })?
        };

        let fingerprint = Fingerprint::of_bytes(spread.as_bytes());

        match state.seen.observe(fingerprint) {
            Sighting::Repeat => {
                debug!(path = %path.display(), %fingerprint, "Duplicate spread skipped");
                state.summary.duplicates_skipped += 1;
                Ok((fingerprint, SpreadOutcome::Duplicate))
            }
            Sighting::First => {
                debug!(path = %path.display(), %fingerprint, "First unique spread taken as cover");
                state.summary.cover = Some(path.clone());
                Ok((fingerprint, SpreadOutcome::Cover))
            }
            Sighting::New => {
                let (left, right) = spread.split().map_err(|source| SplitError::Geometry {
                    path: path.clone(),
                    source,
                })?;

                if self.config.debug {
                    let debug_path = page_path(output, path, PageVariant::Debug);
                    save_png(spread.image(), &debug_path)?;
                    state.summary.debug_images.push(debug_path);
                }

                let left_path = page_path(output, path, PageVariant::Left);
                save_png(&left, &left_path)?;
                let right_path = page_path(output, path, PageVariant::Right);
                save_png(&right, &right_path)?;

                debug!(
                    path = %path.display(),
                    %fingerprint,
                    left_width = left.width(),
                    right_width = right.width(),
                    "Spread split"
                );
                events.send(Event::Split(SplitEvent::PagesWritten {
                    left: left_path.clone(),
                    right: right_path.clone(),
                }));

                state.summary.pages.push(left_path);
                state.summary.pages.push(right_path);
                state.summary.spreads_split += 1;
                Ok((fingerprint, SpreadOutcome::Split))
            }
        }
    }

    fn report_progress(&self, summary: &SplitSummary, current: &Path, events: &EventSender) {
        let interval = self.config.progress_interval;
        if interval == 0 || summary.spreads_split % interval != 0 {
            return;
        }

        info!(
            "Processed {} original images into page-specific images.",
            summary.spreads_split
        );
        events.send(Event::Split(SplitEvent::Progress(SplitProgress {
            spreads_split: summary.spreads_split,
            images_seen: summary.images_seen,
            current_path: current.to_path_buf(),
        })));
    }
}

impl Default for PageSplitter {
    fn default() -> Self {
        Self::new(SplitConfig::default())
    }
}

fn save_png(image: &GrayImage, path: &Path) -> Result<(), SplitError> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| SplitError::Save {
            path: path.to_path_buf(),
            source,
        })
}
