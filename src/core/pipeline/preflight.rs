//! Precondition checks run before anything is written.

use crate::core::scanner::{ImageScanner, ScanConfig, WalkDirScanner};
use crate::error::{BookRipError, ValidationError};
use std::path::Path;

/// Validate the input and output locations.
///
/// Checked in order: the input directory exists, it holds at least one
/// image (anywhere in its tree), and the output's parent directory exists.
/// A bare relative output name has the current directory as its parent.
///
/// Unreadable entries found during the image check are left for the
/// splitter's own walk to report.
pub fn preflight(
    input: &Path,
    output: &Path,
    scan_config: &ScanConfig,
) -> Result<(), BookRipError> {
    if !input.is_dir() {
        return Err(ValidationError::InputNotFound {
            path: input.to_path_buf(),
        }
        .into());
    }

    let scan = WalkDirScanner::new(scan_config.clone()).scan(&[input.to_path_buf()])?;
    if scan.images.is_empty() {
        return Err(ValidationError::NoImagesFound {
            path: input.to_path_buf(),
        }
        .into());
    }

    if let Some(parent) = output.parent() {
        let parent = if parent.as_os_str().is_empty() {
            Path::new(".")
        } else {
            parent
        };
        if !parent.is_dir() {
            return Err(ValidationError::OutputParentMissing {
                path: parent.to_path_buf(),
            }
            .into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn dir_with_image() -> TempDir {
        let dir = TempDir::new().unwrap();
        File::create(dir.path().join("0001.png")).unwrap();
        dir
    }

    #[test]
    fn accepts_valid_layout() {
        let input = dir_with_image();
        let out_parent = TempDir::new().unwrap();

        let result = preflight(
            input.path(),
            &out_parent.path().join("pages"),
            &ScanConfig::default(),
        );

        assert!(result.is_ok());
    }

    #[test]
    fn rejects_missing_input() {
        let out_parent = TempDir::new().unwrap();
        let error = preflight(
            Path::new("/nonexistent/scans"),
            out_parent.path(),
            &ScanConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(
            error,
            BookRipError::Validation(ValidationError::InputNotFound { .. })
        ));
    }

    #[test]
    fn rejects_input_without_images() {
        let input = TempDir::new().unwrap();
        File::create(input.path().join("notes.txt")).unwrap();
        let out_parent = TempDir::new().unwrap();

        let error = preflight(input.path(), out_parent.path(), &ScanConfig::default())
            .unwrap_err();

        assert!(matches!(
            error,
            BookRipError::Validation(ValidationError::NoImagesFound { .. })
        ));
    }

    #[test]
    fn image_check_honours_hidden_setting() {
        let input = TempDir::new().unwrap();
        File::create(input.path().join(".0001.png")).unwrap();
        let out_parent = TempDir::new().unwrap();

        let error = preflight(input.path(), out_parent.path(), &ScanConfig::default())
            .unwrap_err();
        assert!(matches!(
            error,
            BookRipError::Validation(ValidationError::NoImagesFound { .. })
        ));

        let config = ScanConfig {
            include_hidden: true,
            ..Default::default()
        };
        assert!(preflight(input.path(), out_parent.path(), &config).is_ok());
    }

    #[test]
    fn finds_images_in_subdirectories() {
        let input = TempDir::new().unwrap();
        let chapter = input.path().join("chapter1");
        std::fs::create_dir(&chapter).unwrap();
        File::create(chapter.join("0001.png")).unwrap();
        let out_parent = TempDir::new().unwrap();

        assert!(preflight(input.path(), out_parent.path(), &ScanConfig::default()).is_ok());
    }

    #[test]
    fn rejects_missing_output_parent() {
        let input = dir_with_image();
        let error = preflight(
            input.path(),
            Path::new("/nonexistent/parent/out"),
            &ScanConfig::default(),
        )
        .unwrap_err();

        match error {
            BookRipError::Validation(ValidationError::OutputParentMissing { path }) => {
                assert_eq!(path, Path::new("/nonexistent/parent"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bare_output_name_uses_current_directory() {
        let input = dir_with_image();
        assert!(preflight(input.path(), Path::new("pages"), &ScanConfig::default()).is_ok());
    }
}
