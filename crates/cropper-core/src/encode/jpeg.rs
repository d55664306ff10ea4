//! JPEG encoding of the cropped bitmap.
//!
//! Uses the `image` crate's baseline JPEG encoder. Quality 90 is the stock
//! export setting, the same default a browser canvas uses for `toBlob` at 0.9.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::decode::DecodedImage;

/// Media type of the encoded payload.
pub const JPEG_MEDIA_TYPE: &str = "image/jpeg";

/// Errors that can occur during JPEG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode RGB pixel data to JPEG bytes.
///
/// `quality` is clamped to 1-100.
///
/// # Errors
///
/// Rejects zero dimensions and pixel buffers whose length is not
/// `width * height * 3` before touching the encoder.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::with_capacity(expected / 4));
    JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Encode a whole decoded image to JPEG bytes.
pub fn encode_jpeg_image(image: &DecodedImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    encode_jpeg(&image.pixels, image.width, image.height, quality)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOI: [u8; 2] = [0xFF, 0xD8];
    const EOI: [u8; 2] = [0xFF, 0xD9];

    fn checkerboard(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = if (x / 4 + y / 4) % 2 == 0 { 230 } else { 20 };
                pixels.extend_from_slice(&[v, v / 2, 255 - v]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_encode_has_jpeg_markers() {
        let jpeg = encode_jpeg_image(&checkerboard(64, 48), 90).unwrap();
        assert_eq!(jpeg[..2], SOI);
        assert_eq!(jpeg[jpeg.len() - 2..], EOI);
    }

    #[test]
    fn test_encoded_jpeg_decodes_to_same_size() {
        let jpeg = encode_jpeg_image(&checkerboard(37, 21), 90).unwrap();
        let decoded = crate::decode::decode_image(&jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (37, 21));
    }

    #[test]
    fn test_quality_is_clamped() {
        let img = checkerboard(8, 8);
        assert!(encode_jpeg_image(&img, 0).is_ok());
        assert!(encode_jpeg_image(&img, 255).is_ok());
    }

    #[test]
    fn test_lower_quality_is_smaller_on_detailed_image() {
        let img = checkerboard(64, 64);
        let low = encode_jpeg_image(&img, 10).unwrap();
        let high = encode_jpeg_image(&img, 95).unwrap();
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_rejects_wrong_buffer_length() {
        let result = encode_jpeg(&[0u8; 10], 2, 2, 90);
        assert!(matches!(
            result,
            Err(EncodeError::InvalidPixelData {
                expected: 12,
                actual: 10
            })
        ));
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert!(matches!(
            encode_jpeg(&[], 0, 5, 90),
            Err(EncodeError::InvalidDimensions { width: 0, height: 5 })
        ));
        assert!(matches!(
            encode_jpeg(&[], 5, 0, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_single_pixel() {
        let jpeg = encode_jpeg(&[255, 0, 0], 1, 1, 90).unwrap();
        assert_eq!(jpeg[..2], SOI);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
