//! Bilinear resampling.
//!
//! The display backdrop and the exported bitmap both go through here, so the
//! preview and the output are filtered the same way.

use image::imageops::{self, FilterType};

use super::{DecodeError, DecodedImage};

/// Resample `image` to exactly `width × height` with a bilinear filter.
///
/// An image already at the target size is returned as a copy.
///
/// # Errors
///
/// `DecodeError::InvalidFormat` for a zero target side, and
/// `DecodeError::CorruptedFile` when the pixel buffer is shorter than the
/// image's dimensions claim.
pub fn resample(image: &DecodedImage, width: u32, height: u32) -> Result<DecodedImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }
    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }

    let source = image.to_rgb_image().ok_or_else(|| {
        DecodeError::CorruptedFile(format!(
            "{} bytes for a {}x{} image",
            image.pixels.len(),
            image.width,
            image.height
        ))
    })?;

    Ok(DecodedImage::from_rgb_image(imageops::resize(
        &source,
        width,
        height,
        FilterType::Triangle,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Left half black, right half white.
    fn split(width: u32, height: u32) -> DecodedImage {
        let rgb = image::RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                image::Rgb([0, 0, 0])
            } else {
                image::Rgb([255, 255, 255])
            }
        });
        DecodedImage::from_rgb_image(rgb)
    }

    #[test]
    fn test_downscale_to_exact_size() {
        let out = resample(&split(100, 50), 60, 30).unwrap();
        assert_eq!(out.dimensions(), (60, 30));
        assert_eq!(out.pixels.len(), 60 * 30 * 3);
    }

    #[test]
    fn test_same_size_is_copy() {
        let img = split(8, 4);
        assert_eq!(resample(&img, 8, 4).unwrap(), img);
    }

    #[test]
    fn test_upscale_keeps_sides_and_blends_seam() {
        let out = resample(&split(4, 2), 16, 8).unwrap();
        assert_eq!(out.pixel(0, 3), [0, 0, 0]);
        assert_eq!(out.pixel(15, 3), [255, 255, 255]);

        // Bilinear leaves intermediate values around the edge
        let seam = out.pixel(8, 3)[0];
        assert!(seam > 0 && seam < 255, "seam value {seam}");
    }

    #[test]
    fn test_zero_target_is_rejected() {
        let img = split(10, 10);
        assert!(matches!(resample(&img, 0, 5), Err(DecodeError::InvalidFormat)));
        assert!(matches!(resample(&img, 5, 0), Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_short_buffer_is_corrupted() {
        let img = DecodedImage {
            width: 10,
            height: 10,
            pixels: vec![0u8; 12],
        };
        assert!(matches!(resample(&img, 5, 5), Err(DecodeError::CorruptedFile(_))));
    }
}
