//! # Scanner Module
//!
//! Discovers image files in directories, in a reproducible order.
//!
//! ## Ordering
//! Inside every directory its own files come first, sorted by name, and then
//! each subdirectory is walked the same way, also in name order. The
//! splitter relies on this: the first unique spread it meets is the cover,
//! so a top-level `cover.png` wins over `chapter1/p001.png`.
//!
//! ## Supported Formats
//! - PNG (.png)
//! - JPEG (.jpg, .jpeg)
//! - TIFF (.tiff, .tif)
//! - BMP (.bmp)
//! - WebP (.webp)
//!
//! ## Example
//! ```rust,ignore
//! use book_ripper::core::scanner::{ImageScanner, ScanConfig, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let result = scanner.scan(&["/scans/book".into()])?;
//! ```

mod filter;
mod walker;

pub use filter::ImageFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A discovered image file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFile {
    /// Path to the image file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Detected image format
    pub format: ImageFormat,
}

/// Recognized image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Tiff,
    Bmp,
    WebP,
    Unknown,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "png" => ImageFormat::Png,
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "tiff" | "tif" => ImageFormat::Tiff,
            "bmp" => ImageFormat::Bmp,
            "webp" => ImageFormat::WebP,
            _ => ImageFormat::Unknown,
        }
    }

    /// Detect format from a path's extension
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(ImageFormat::Unknown)
    }

    /// Check if this format is supported
    pub fn is_supported(&self) -> bool {
        !matches!(self, ImageFormat::Unknown)
    }
}

/// Result of a scan operation
#[derive(Debug)]
pub struct ScanResult {
    /// Images in traversal order
    pub images: Vec<ImageFile>,
    /// Entries that could not be read
    pub errors: Vec<ScanError>,
}

impl ScanResult {
    /// Turn the first recorded walk error into a hard failure.
    ///
    /// Callers that must not silently skip unreadable entries use this to
    /// keep fail-fast semantics.
    pub fn into_strict(self) -> Result<Vec<ImageFile>, ScanError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(error),
            None => Ok(self.images),
        }
    }
}

/// Trait for image scanners
///
/// Implement this trait to create custom scanners (e.g., for testing).
pub trait ImageScanner: Send + Sync {
    /// Scan directories and return discovered images
    fn scan(&self, paths: &[PathBuf]) -> Result<ScanResult, ScanError>;

    /// Scan with progress reporting via events
    fn scan_with_events(
        &self,
        paths: &[PathBuf],
        events: &EventSender,
    ) -> Result<ScanResult, ScanError>;
}
