//! # Pipeline Module
//!
//! Orchestrates a full run.
//!
//! ## Pipeline Stages
//! 1. **Validate** - input exists, holds images, output parent exists
//! 2. **Split** - dedup spreads and write left/right pages
//! 3. **Assemble** - merge the pages into `merged.pdf`
//! 4. **Recognize** - OCR the pages, only when a recognizer is supplied
//!
//! Every stage runs on the calling thread; progress goes out as events.

mod executor;
mod preflight;

pub use executor::{Pipeline, PipelineBuilder, PipelineConfig, PipelineResult};
pub use preflight::preflight;
