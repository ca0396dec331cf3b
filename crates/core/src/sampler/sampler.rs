//! Whole-image color sampling.
//!
//! Decodes a raster image and reduces it to a single color: the arithmetic
//! mean of each channel over all pixels. Sampling is read-only; the caller
//! decides whether to store the result, so a failed decode never disturbs
//! the last good color.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;

use crate::color::Color;

#[derive(Debug, Error)]
pub enum SampleError {
    /// Corrupt buffer or unsupported format.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Zero-pixel image; averaging is undefined.
    #[error("image has no pixels")]
    EmptyImage,

    /// The path does not name a raster image format.
    #[error("{0:?} is not an image file")]
    NotAnImage(PathBuf),

    #[error("failed to read image file: {0}")]
    Io(#[from] std::io::Error),
}

/// Decode an image buffer and average each channel over all pixels.
///
/// Alpha is averaged and included only when the source format carries an
/// alpha channel; three-channel sources yield `a: None`.
pub fn sample(bytes: &[u8]) -> Result<Color, SampleError> {
    let decoded = image::load_from_memory(bytes)?;
    let has_alpha = decoded.color().has_alpha();
    average(&decoded.to_rgba8(), has_alpha)
}

/// Read and sample an image file.
///
/// Non-image paths are rejected before any bytes are read.
pub fn sample_file(path: &Path) -> Result<Color, SampleError> {
    if image::ImageFormat::from_path(path).is_err() {
        return Err(SampleError::NotAnImage(path.to_path_buf()));
    }
    let bytes = std::fs::read(path)?;
    sample(&bytes)
}

fn average(pixels: &RgbaImage, has_alpha: bool) -> Result<Color, SampleError> {
    let (width, height) = pixels.dimensions();
    let pixel_count = width as u64 * height as u64;
    if pixel_count == 0 {
        return Err(SampleError::EmptyImage);
    }

    // width * height * 255 exceeds i32 range for large images, so
    // accumulate wide.
    let mut totals = [0u64; 4];
    for pixel in pixels.pixels() {
        for (total, component) in totals.iter_mut().zip(pixel.0) {
            *total += component as u64;
        }
    }

    let mean = |total: u64| (total as f64 / pixel_count as f64).round() as u8;

    let mut color = Color::new(mean(totals[0]), mean(totals[1]), mean(totals[2]));
    if has_alpha {
        color.a = Some(mean(totals[3]));
    }
    Ok(color)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageFormat, Rgb, RgbImage, Rgba};

    use super::*;

    fn png_bytes_rgb(width: u32, height: u32, fill: Rgb<u8>) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, fill);
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_uniform_image_is_exact() {
        for (w, h) in [(1, 1), (3, 5), (64, 64)] {
            let color = sample(&png_bytes_rgb(w, h, Rgb([200, 100, 50]))).unwrap();
            assert_eq!(color, Color::new(200, 100, 50), "{}x{}", w, h);
        }
    }

    #[test]
    fn test_rgb_source_has_no_alpha() {
        let color = sample(&png_bytes_rgb(2, 2, Rgb([1, 2, 3]))).unwrap();
        assert_eq!(color.a, None);
    }

    #[test]
    fn test_single_transparent_pixel_is_exact() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 0]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let color = sample(&bytes).unwrap();
        assert_eq!(color, Color::with_alpha(10, 20, 30, 0));
    }

    #[test]
    fn test_mean_rounds_half_up() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 255, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        // 255 / 2 = 127.5 rounds to 128
        let color = sample(&bytes).unwrap();
        assert_eq!(color, Color::new(128, 128, 128));
    }

    #[test]
    fn test_corrupt_buffer_is_decode_error() {
        let result = sample(b"definitely not an image");
        assert!(matches!(result, Err(SampleError::Decode(_))));
    }

    #[test]
    fn test_zero_pixel_image() {
        let result = average(&RgbaImage::new(0, 0), true);
        assert!(matches!(result, Err(SampleError::EmptyImage)));
    }

    #[test]
    fn test_non_image_path_rejected() {
        let result = sample_file(Path::new("notes.txt"));
        assert!(matches!(result, Err(SampleError::NotAnImage(_))));
    }
}
