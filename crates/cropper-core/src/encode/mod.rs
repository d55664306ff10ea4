//! Encoding of the exported crop.
//!
//! This module provides functionality for:
//! - Encoding RGB pixels to JPEG with configurable quality
//! - Wrapping encoded bytes in a base64 `data:` URI for the host
//!
//! # Examples
//!
//! ```ignore
//! use cropper_core::encode::{encode_jpeg, to_data_uri, JPEG_MEDIA_TYPE};
//!
//! let pixels = vec![128u8; 100 * 100 * 3];
//! let jpeg = encode_jpeg(&pixels, 100, 100, 90).unwrap();
//! let uri = to_data_uri(JPEG_MEDIA_TYPE, &jpeg);
//! assert!(uri.starts_with("data:image/jpeg;base64,"));
//! ```

mod data_uri;
mod jpeg;

pub use data_uri::to_data_uri;
pub use jpeg::{encode_jpeg, encode_jpeg_image, EncodeError, JPEG_MEDIA_TYPE};
