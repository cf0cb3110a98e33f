//! # Core Module
//!
//! The UI-agnostic ripping engine.
//!
//! ## Modules
//! - `scanner` - Discovers images in a deterministic order
//! - `geometry` - Fixed margin crop and midpoint split
//! - `fingerprint` - Exact content digests and the seen set
//! - `splitter` - Dedup, cover detection, page output
//! - `assembler` - Merges pages into a PDF
//! - `ocr` - Opt-in text extraction
//! - `pipeline` - Orchestrates the full workflow

pub mod assembler;
pub mod decode;
pub mod fingerprint;
pub mod geometry;
pub mod ocr;
pub mod pipeline;
pub mod scanner;
pub mod splitter;

// Re-export commonly used types
pub use fingerprint::{Fingerprint, SeenSet};
pub use geometry::{CroppedSpread, SPREAD_MARGINS};
pub use scanner::ImageFile;
pub use splitter::{PageSplitter, SplitConfig, SplitSummary};
