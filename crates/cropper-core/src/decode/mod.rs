//! Image loading for the crop selector.
//!
//! This module provides functionality for:
//! - Validating the declared media type of a selected file
//! - Decoding JPEG, PNG, GIF, WebP and BMP bytes into RGB pixels
//! - Applying EXIF orientation the way browsers do for `<img>`
//! - Bilinear resampling to exact dimensions
//!
//! # Architecture
//!
//! Decoding is synchronous. The async file read belongs to the host; the
//! session's generation counter decides whether a finished decode still
//! applies.
//!
//! # Examples
//!
//! ```ignore
//! use cropper_core::decode::load_image;
//!
//! let bytes = std::fs::read("dish.jpg").unwrap();
//! let image = load_image("image/jpeg", &bytes).unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod loader;
mod resize;
mod types;

pub use loader::{decode_image, is_image_media_type, load_image};
pub use resize::resample;
pub use types::{DecodeError, DecodedImage};
