//! Image loading with media-type validation and EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, DecodedImage};

/// Returns true if a declared media type names an image (`image/*`).
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type.starts_with("image/")
}

/// Load a user-selected file into a source image.
///
/// # Arguments
///
/// * `media_type` - The declared media type of the file (e.g. `image/png`)
/// * `bytes` - Raw file bytes
///
/// # Errors
///
/// Returns `DecodeError::NotAnImage` if the media type is not `image/*`,
/// before looking at the bytes at all. Otherwise see [`decode_image`].
pub fn load_image(media_type: &str, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if !is_image_media_type(media_type) {
        return Err(DecodeError::NotAnImage(media_type.to_string()));
    }
    decode_image(bytes)
}

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// The container format is sniffed from the bytes, not from the declared
/// media type.
///
/// # Returns
///
/// A `DecodedImage` with RGB pixel data and correct orientation applied.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are empty or not a
/// recognised format.
/// Returns `DecodeError::CorruptedFile` if decoding fails part way.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    let orientation = exif_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let rgb_img = upright(img, orientation).into_rgb8();
    Ok(DecodedImage::from_rgb_image(rgb_img))
}

/// EXIF orientation tag (1-8) of the primary image, 1 when there is none.
fn exif_orientation(bytes: &[u8]) -> u32 {
    Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .unwrap_or(1)
}

/// Turn a decoded image upright, as a browser does before painting it.
fn upright(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}
