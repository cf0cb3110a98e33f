//! # Error Module
//!
//! Error types for the book ripper.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Fail fast** - every error aborts the run, nothing is retried

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum BookRipError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Splitting error: {0}")]
    Split(#[from] SplitError),

    #[error("PDF assembly error: {0}")]
    Assemble(#[from] AssembleError),

    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Precondition failures, reported before any file is written
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{message}")]
    Usage { message: String },

    #[error("The input directory does not exist: {path}")]
    InputNotFound { path: PathBuf },

    #[error("The input directory does not contain any images: {path}")]
    NoImagesFound { path: PathBuf },

    #[error("The parent directory of the output directory does not exist: {path}")]
    OutputParentMissing { path: PathBuf },
}

/// Errors that occur while walking a directory tree
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A spread that is too small for the fixed margin crop
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("image is {width}x{height}, smaller than the crop margins (needs more than {min_width}x{min_height})")]
    TooSmall {
        width: u32,
        height: u32,
        min_width: u32,
        min_height: u32,
    },

    #[error("cropped spread is {width} pixel(s) wide, too narrow to split into two pages")]
    TooNarrowToSplit { width: u32 },
}

/// An image file that could not be read or decoded
#[derive(Error, Debug)]
#[error("Failed to decode image {path}: {reason}")]
pub struct DecodeError {
    pub path: PathBuf,
    pub reason: String,
}

/// Errors that occur while splitting spreads into pages
#[derive(Error, Debug)]
pub enum SplitError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Cannot crop {path}: {source}")]
    Geometry {
        path: PathBuf,
        #[source]
        source: GeometryError,
    },

    #[error("Failed to create output directory {path}: {source}")]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to save page image {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Errors that occur while building the merged PDF
#[derive(Error, Debug)]
pub enum AssembleError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Failed to write PDF {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Errors that occur during text recognition
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("OCR model not found at {path}; run `ocrs` once to download the models or pass --ocr-models")]
    ModelNotFound { path: PathBuf },

    #[error("Failed to load OCR model {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    #[error("OCR engine failure: {0}")]
    Engine(String),

    #[error("Text recognition failed for {path}: {reason}")]
    Recognition { path: PathBuf, reason: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, BookRipError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_includes_path() {
        let error = ValidationError::InputNotFound {
            path: PathBuf::from("/scans/missing"),
        };
        assert!(error.to_string().contains("/scans/missing"));
    }

    #[test]
    fn geometry_error_reports_dimensions() {
        let error = SplitError::Geometry {
            path: PathBuf::from("/scans/tiny.png"),
            source: GeometryError::TooSmall {
                width: 100,
                height: 100,
                min_width: 570,
                min_height: 370,
            },
        };
        let message = error.to_string();
        assert!(message.contains("/scans/tiny.png"));
        assert!(message.contains("100x100"));
    }

    #[test]
    fn decode_error_includes_path_and_reason() {
        let error: SplitError = DecodeError {
            path: PathBuf::from("/scans/broken.png"),
            reason: "invalid PNG signature".to_string(),
        }
        .into();
        let message = error.to_string();
        assert!(message.contains("/scans/broken.png"));
        assert!(message.contains("invalid PNG signature"));
    }

    #[test]
    fn validation_error_is_shown_without_prefix() {
        let error: BookRipError = ValidationError::NoImagesFound {
            path: PathBuf::from("/scans/empty"),
        }
        .into();
        assert!(error.to_string().starts_with("The input directory"));
    }

    #[test]
    fn ocr_model_error_suggests_recovery() {
        let error = OcrError::ModelNotFound {
            path: PathBuf::from("/cache/ocrs/text-detection.rten"),
        };
        assert!(error.to_string().contains("--ocr-models"));
    }
}
