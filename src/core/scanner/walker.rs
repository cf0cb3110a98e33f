//! Directory walking implementation using walkdir.

use super::filter::{is_hidden, ImageFilter};
use super::{ImageFile, ImageScanner, ScanResult};
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent, ScanProgress};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
    /// Custom extensions to include (None = use defaults)
    pub extensions: Option<Vec<String>>,
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: ImageFilter,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let mut filter = ImageFilter::new().with_hidden(config.include_hidden);

        if let Some(ref extensions) = config.extensions {
            filter = filter.with_extensions(extensions.clone());
        }

        Self { config, filter }
    }

    /// Scan a single directory tree
    fn scan_directory(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<(Vec<ImageFile>, Vec<ScanError>), ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut images = Vec::new();
        let mut errors = Vec::new();
        let mut directories_scanned = 0;

        // A directory's own files come first (by name), then its
        // subdirectories (by name), each walked the same way.
        let mut walker = WalkDir::new(root)
            .follow_links(self.config.follow_symlinks)
            .sort_by(|a, b| {
                a.file_type()
                    .is_dir()
                    .cmp(&b.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            });

        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = self.config.include_hidden;
        let entries = walker
            .into_iter()
            .filter_entry(|entry| include_hidden || entry.depth() == 0 || !is_hidden(entry.path()));

        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    let error = if e.io_error().map(|io| io.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::other(e.to_string()),
                        }
                    };

                    warn!(path = %path.display(), error = %error, "Unreadable directory entry");
                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));
                    errors.push(error);
                    continue;
                }
            };

            let path = entry.path();

            if entry.file_type().is_dir() {
                directories_scanned += 1;
                events.send(Event::Scan(ScanEvent::Progress(ScanProgress {
                    directories_scanned,
                    images_found: images.len(),
                    current_path: path.to_path_buf(),
                })));
                continue;
            }

            if !self.filter.should_include(path) {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) => {
                    debug!(path = %path.display(), "Found image");
                    events.send(Event::Scan(ScanEvent::ImageFound {
                        path: path.to_path_buf(),
                    }));
                    images.push(ImageFile {
                        path: path.to_path_buf(),
                        size: metadata.len(),
                        format: self.filter.get_format(path),
                    });
                }
                Err(e) => {
                    let error = ScanError::ReadDirectory {
                        path: path.to_path_buf(),
                        source: std::io::Error::other(e.to_string()),
                    };
                    events.send(Event::Scan(ScanEvent::Error {
                        path: path.to_path_buf(),
                        message: error.to_string(),
                    }));
                    errors.push(error);
                }
            }
        }

        Ok((images, errors))
    }
}

impl ImageScanner for WalkDirScanner {
    fn scan(&self, paths: &[PathBuf]) -> Result<ScanResult, ScanError> {
        self.scan_with_events(paths, &crate::events::null_sender())
    }

    fn scan_with_events(
        &self,
        paths: &[PathBuf],
        events: &EventSender,
    ) -> Result<ScanResult, ScanError> {
        events.send(Event::Scan(ScanEvent::Started {
            paths: paths.to_vec(),
        }));

        let mut all_images = Vec::new();
        let mut all_errors = Vec::new();

        for path in paths {
            match self.scan_directory(path, events) {
                Ok((images, errors)) => {
                    all_images.extend(images);
                    all_errors.extend(errors);
                }
                Err(e) => all_errors.push(e),
            }
        }

        events.send(Event::Scan(ScanEvent::Completed {
            total_images: all_images.len(),
        }));

        Ok(ScanResult {
            images: all_images,
            errors: all_errors,
        })
    }
}
