//! # Book Ripper
//!
//! Turns a folder of scanned double-page spreads into single pages and a
//! merged PDF.
//!
//! ## What a Run Does
//! - **Dedup** - repeated scans of the same spread are skipped by exact
//!   fingerprint of the cropped pixels
//! - **Cover** - the first unique spread is taken to be the cover and dropped
//! - **Split** - every other spread is cropped and cut into left/right pages
//! - **Merge** - the pages are concatenated into `merged.pdf`
//! - **OCR** - optional, only when asked for
//!
//! ## Architecture
//! - `core` - The ripping engine
//! - `events` - Event-driven progress reporting
//! - `error` - Error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{BookRipError, Result};

/// Initialize tracing for the library
///
/// Reads the filter from `RUST_LOG`. Called once by the binary.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    // A subscriber may already be installed (e.g. by an embedding app).
    let _ = tracing::subscriber::set_global_default(subscriber);
}
