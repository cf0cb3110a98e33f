//! Output file names derived from the source spread's file name.

use std::path::{Path, PathBuf};

/// Which artifact of a spread is being written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVariant {
    Left,
    Right,
    /// The whole cropped spread, written only in debug mode
    Debug,
}

impl PageVariant {
    fn suffix(&self) -> &'static str {
        match self {
            PageVariant::Left => "left",
            PageVariant::Right => "right",
            PageVariant::Debug => "xdebug",
        }
    }
}

/// `<stem>.<variant>.png` inside `output_dir`.
///
/// Pages are always written as PNG, whatever the source format. Sources
/// with the same stem in different subdirectories map to the same name.
pub fn page_path(output_dir: &Path, source: &Path, variant: PageVariant) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{}.{}.png", stem, variant.suffix()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_suffix_before_extension() {
        let out = Path::new("/out");
        assert_eq!(
            page_path(out, Path::new("/scans/0007.png"), PageVariant::Left),
            PathBuf::from("/out/0007.left.png")
        );
        assert_eq!(
            page_path(out, Path::new("/scans/0007.png"), PageVariant::Right),
            PathBuf::from("/out/0007.right.png")
        );
        assert_eq!(
            page_path(out, Path::new("/scans/0007.png"), PageVariant::Debug),
            PathBuf::from("/out/0007.xdebug.png")
        );
    }

    #[test]
    fn non_png_sources_become_png() {
        assert_eq!(
            page_path(Path::new("out"), Path::new("scan 3.JPG"), PageVariant::Left),
            PathBuf::from("out/scan 3.left.png")
        );
    }

    #[test]
    fn keeps_inner_dots_of_stem() {
        assert_eq!(
            page_path(Path::new("out"), Path::new("book.v2.001.png"), PageVariant::Right),
            PathBuf::from("out/book.v2.001.right.png")
        );
    }
}
