//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the book ripping pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Directory walking events
    Scan(ScanEvent),
    /// Dedup and split events
    Split(SplitEvent),
    /// PDF assembly events
    Assemble(AssembleEvent),
    /// Text recognition events
    Ocr(OcrEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during the scanning phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Scanning has started
    Started { paths: Vec<PathBuf> },
    /// Progress update during scanning
    Progress(ScanProgress),
    /// An image was found
    ImageFound { path: PathBuf },
    /// A directory entry could not be read
    Error { path: PathBuf, message: String },
    /// Scanning completed
    Completed { total_images: usize },
}

/// Progress information during scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Number of directories scanned so far
    pub directories_scanned: usize,
    /// Number of images found so far
    pub images_found: usize,
    /// Current directory being scanned
    pub current_path: PathBuf,
}

/// What the splitter decided for one spread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpreadOutcome {
    /// First unique spread of the run, consumed without output
    Cover,
    /// Fingerprint already seen, skipped
    Duplicate,
    /// Unique spread written as left and right pages
    Split,
}

impl std::fmt::Display for SpreadOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpreadOutcome::Cover => write!(f, "cover"),
            SpreadOutcome::Duplicate => write!(f, "duplicate"),
            SpreadOutcome::Split => write!(f, "split"),
        }
    }
}

/// Events during the splitting phase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SplitEvent {
    /// Splitting has started
    Started { total_images: usize },
    /// One source image was handled
    SpreadProcessed {
        path: PathBuf,
        fingerprint: String,
        outcome: SpreadOutcome,
        completed: usize,
    },
    /// Both pages of a spread were written
    PagesWritten { left: PathBuf, right: PathBuf },
    /// Periodic progress signal, every N split spreads
    Progress(SplitProgress),
    /// Splitting completed
    Completed {
        spreads_split: usize,
        duplicates_skipped: usize,
    },
}

/// Progress information during splitting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitProgress {
    /// Unique non-cover spreads split so far
    pub spreads_split: usize,
    /// Source images looked at so far
    pub images_seen: usize,
    /// Spread that triggered this report
    pub current_path: PathBuf,
}

/// Events during PDF assembly
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AssembleEvent {
    /// Assembly has started
    Started { total_pages: usize },
    /// A page was added to the document
    PageAdded { path: PathBuf, page_number: usize },
    /// The PDF was written (or skipped when there were no pages)
    Completed {
        output: Option<PathBuf>,
        pages: usize,
    },
}

/// Events during text recognition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OcrEvent {
    /// Recognition has started
    Started { total_pages: usize },
    /// A page was recognized
    PageRecognized {
        path: PathBuf,
        completed: usize,
        characters: usize,
    },
    /// Recognition completed
    Completed { total_characters: usize },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Validating,
    Splitting,
    Assembling,
    Recognizing,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Source images looked at
    pub images_seen: usize,
    /// Spreads written as page pairs
    pub spreads_split: usize,
    /// Spreads skipped as duplicates
    pub duplicates_skipped: usize,
    /// Page images written
    pub pages_written: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Validating => write!(f, "Validating"),
            PipelinePhase::Splitting => write!(f, "Splitting"),
            PipelinePhase::Assembling => write!(f, "Assembling"),
            PipelinePhase::Recognizing => write!(f, "Recognizing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Split(SplitEvent::SpreadProcessed {
            path: PathBuf::from("/scans/0001.png"),
            fingerprint: "00ff".to_string(),
            outcome: SpreadOutcome::Duplicate,
            completed: 3,
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Split(SplitEvent::SpreadProcessed { outcome, completed, .. }) => {
                assert_eq!(outcome, SpreadOutcome::Duplicate);
                assert_eq!(completed, 3);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn pipeline_summary_is_serializable() {
        let summary = PipelineSummary {
            images_seen: 120,
            spreads_split: 110,
            duplicates_skipped: 9,
            pages_written: 220,
            duration_ms: 5000,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"pages_written\":220"));
    }

    #[test]
    fn outcome_display_is_lowercase() {
        assert_eq!(SpreadOutcome::Cover.to_string(), "cover");
        assert_eq!(SpreadOutcome::Split.to_string(), "split");
    }
}
