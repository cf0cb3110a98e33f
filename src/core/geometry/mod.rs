//! # Geometry Module
//!
//! Fixed margin crop and midpoint split for scanned spreads.
//!
//! The margins trim the scanner bed and the book binding. They are not
//! configurable: every spread in a run is cropped by the same box
//! `(250, 120, W - 320, H - 250)`.

use crate::error::GeometryError;
use image::{imageops, DynamicImage, GrayImage};

/// Pixels trimmed from each edge of a spread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

/// The margins applied to every spread
pub const SPREAD_MARGINS: Margins = Margins {
    left: 250,
    top: 120,
    right: 320,
    bottom: 250,
};

/// A crop rectangle in source pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Margins {
    /// Crop box for an image of the given size.
    ///
    /// Fails when the margins leave no pixels in either direction.
    pub fn crop_box(&self, width: u32, height: u32) -> Result<CropBox, GeometryError> {
        let horizontal = self.left + self.right;
        let vertical = self.top + self.bottom;

        if width <= horizontal || height <= vertical {
            return Err(GeometryError::TooSmall {
                width,
                height,
                min_width: horizontal,
                min_height: vertical,
            });
        }

        Ok(CropBox {
            x: self.left,
            y: self.top,
            width: width - horizontal,
            height: height - vertical,
        })
    }
}

/// A spread after grayscale conversion and margin crop
#[derive(Debug, Clone)]
pub struct CroppedSpread {
    pixels: GrayImage,
}

impl CroppedSpread {
    /// Convert to single-channel luma, then crop with [`SPREAD_MARGINS`].
    pub fn from_image(image: &DynamicImage) -> Result<Self, GeometryError> {
        let crop = SPREAD_MARGINS.crop_box(image.width(), image.height())?;
        let gray = image.to_luma8();
        let pixels = imageops::crop_imm(&gray, crop.x, crop.y, crop.width, crop.height).to_image();
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Raw row-major luma bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn image(&self) -> &GrayImage {
        &self.pixels
    }

    /// Split at `width / 2` into left and right pages.
    ///
    /// On odd widths the right page gets the extra column.
    pub fn split(&self) -> Result<(GrayImage, GrayImage), GeometryError> {
        let (width, height) = self.pixels.dimensions();
        if width < 2 {
            return Err(GeometryError::TooNarrowToSplit { width });
        }

        let mid = width / 2;
        let left = imageops::crop_imm(&self.pixels, 0, 0, mid, height).to_image();
        let right = imageops::crop_imm(&self.pixels, mid, 0, width - mid, height).to_image();
        Ok((left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    fn gray_spread(width: u32, height: u32) -> CroppedSpread {
        CroppedSpread {
            pixels: GrayImage::from_fn(width, height, |x, _| Luma([(x % 256) as u8])),
        }
    }

    #[test]
    fn crop_box_applies_fixed_margins() {
        let crop = SPREAD_MARGINS.crop_box(1000, 800).unwrap();
        assert_eq!(
            crop,
            CropBox {
                x: 250,
                y: 120,
                width: 430,
                height: 430
            }
        );
    }

    #[test]
    fn crop_box_rejects_small_images() {
        let error = SPREAD_MARGINS.crop_box(100, 100).unwrap_err();
        assert_eq!(
            error,
            GeometryError::TooSmall {
                width: 100,
                height: 100,
                min_width: 570,
                min_height: 370
            }
        );
    }

    #[test]
    fn crop_box_rejects_zero_area_exactly_at_margin() {
        assert!(SPREAD_MARGINS.crop_box(570, 1000).is_err());
        assert!(SPREAD_MARGINS.crop_box(1000, 370).is_err());
        assert!(SPREAD_MARGINS.crop_box(571, 371).is_ok());
    }

    #[test]
    fn cropped_spread_is_grayscale_and_cropped() {
        let mut source = RgbImage::from_pixel(800, 600, Rgb([255, 255, 255]));
        // Mark the first pixel inside the crop box.
        source.put_pixel(250, 120, Rgb([0, 0, 0]));

        let spread = CroppedSpread::from_image(&DynamicImage::ImageRgb8(source)).unwrap();

        assert_eq!((spread.width(), spread.height()), (230, 230));
        assert_eq!(spread.as_bytes().len(), 230 * 230);
        assert_eq!(spread.image().get_pixel(0, 0), &Luma([0]));
        assert_eq!(spread.image().get_pixel(1, 0), &Luma([255]));
    }

    #[test]
    fn split_even_width_halves_evenly() {
        let (left, right) = gray_spread(10, 4).split().unwrap();
        assert_eq!(left.dimensions(), (5, 4));
        assert_eq!(right.dimensions(), (5, 4));
        assert_eq!(right.get_pixel(0, 0), &Luma([5]));
    }

    #[test]
    fn split_odd_width_gives_right_the_extra_column() {
        let (left, right) = gray_spread(11, 3).split().unwrap();
        assert_eq!(left.width(), 11 / 2);
        assert_eq!(right.width(), 11 - 11 / 2);
        assert_eq!(left.height(), 3);
        assert_eq!(right.height(), 3);
    }

    #[test]
    fn split_rejects_single_column() {
        let error = gray_spread(1, 5).split().unwrap_err();
        assert_eq!(error, GeometryError::TooNarrowToSplit { width: 1 });
    }
}
