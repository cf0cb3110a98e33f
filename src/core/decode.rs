//! Image decoding with a fast JPEG path.
//!
//! JPEG scans go through zune-jpeg (1.5-2x faster than the image crate);
//! everything else, and any JPEG zune rejects, is decoded by the image crate.

use crate::core::scanner::ImageFormat;
use crate::error::DecodeError;
use image::{DynamicImage, ImageBuffer, Luma, Rgb, Rgba};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Decode an image file into memory.
pub fn decode_file(path: &Path) -> Result<DynamicImage, DecodeError> {
    match ImageFormat::from_path(path) {
        ImageFormat::Jpeg => decode_jpeg(path).or_else(|_| decode_fallback(path)),
        _ => decode_fallback(path),
    }
}

fn decode_jpeg(path: &Path) -> Result<DynamicImage, DecodeError> {
    let fail = |reason: String| DecodeError {
        path: path.to_path_buf(),
        reason,
    };

    let file_bytes =
        fs::read(path).map_err(|e| fail(format!("failed to read file: {}", e)))?;

    let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
    let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

    let pixels = decoder
        .decode()
        .map_err(|e| fail(format!("zune-jpeg decode failed: {:?}", e)))?;

    let info = decoder
        .info()
        .ok_or_else(|| fail("missing JPEG header info".to_string()))?;
    let width = info.width as u32;
    let height = info.height as u32;

    let buffer_error = || fail("pixel buffer does not match image dimensions".to_string());

    match decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB) {
        ColorSpace::RGB => ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, pixels)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(buffer_error),
        ColorSpace::RGBA => ImageBuffer::<Rgba<u8>, _>::from_raw(width, height, pixels)
            .map(DynamicImage::ImageRgba8)
            .ok_or_else(buffer_error),
        ColorSpace::Luma => ImageBuffer::<Luma<u8>, _>::from_raw(width, height, pixels)
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(buffer_error),
        other => Err(fail(format!("unsupported JPEG colorspace {:?}", other))),
    }
}

fn decode_fallback(path: &Path) -> Result<DynamicImage, DecodeError> {
    image::open(path).map_err(|e| DecodeError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn decodes_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.png");
        GrayImage::from_pixel(7, 5, Luma([42])).save(&path).unwrap();

        let image = decode_file(&path).unwrap();
        assert_eq!((image.width(), image.height()), (7, 5));
    }

    #[test]
    fn decodes_jpeg() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spread.jpg");
        RgbImage::from_pixel(16, 8, Rgb([200, 10, 10])).save(&path).unwrap();

        let image = decode_file(&path).unwrap();
        assert_eq!((image.width(), image.height()), (16, 8));
    }

    #[test]
    fn corrupt_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"this is not a valid image file").unwrap();

        let error = decode_file(&path).unwrap_err();
        assert_eq!(error.path, path);
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let error = decode_file(Path::new("/nonexistent/scan.jpg")).unwrap_err();
        assert!(error.path.ends_with("scan.jpg"));
    }
}
