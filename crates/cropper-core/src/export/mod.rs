//! Exporting the crop selection as a compressed image.
//!
//! # Pipeline
//!
//! 1. [`plan_export`] maps the display-space crop into source pixels using
//!    independent X/Y scale factors and caps the longest output edge
//! 2. [`crop_region`] copies the mapped source pixels
//! 3. The region is resampled (bilinear) to the planned output size
//! 4. The bitmap is JPEG-encoded and wrapped in a `data:` URI
//!
//! Nothing is retried. Any failure is returned to the caller, which emits no
//! result for that commit.

mod crop;
mod plan;

pub use crop::crop_region;
pub use plan::{plan_export, ExportPlan, SourceRect};

use thiserror::Error;
use tracing::debug;

use crate::config::CropperConfig;
use crate::decode::{resample, DecodeError, DecodedImage};
use crate::encode::{encode_jpeg_image, to_data_uri, EncodeError, JPEG_MEDIA_TYPE};
use crate::geometry::CropState;
use crate::viewport::Viewport;

/// Errors that can occur while exporting a crop.
#[derive(Debug, Error)]
pub enum ExportError {
    /// No image has been loaded into the session
    #[error("No image loaded")]
    NoImage,

    /// Resampling the cropped region failed
    #[error("Resampling failed: {0}")]
    Resample(#[from] DecodeError),

    /// Encoding the output bitmap failed
    #[error("Encoding failed: {0}")]
    Encode(#[from] EncodeError),
}

/// The exported payload handed to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct CroppedImage {
    /// `data:image/jpeg;base64,...`
    pub data_uri: String,
    /// Output bitmap width in pixels.
    pub width: u32,
    /// Output bitmap height in pixels.
    pub height: u32,
}

/// Crop, scale and encode the current selection of `image`.
pub fn export_crop(
    image: &DecodedImage,
    state: &CropState,
    viewport: &Viewport,
    config: &CropperConfig,
) -> Result<CroppedImage, ExportError> {
    let bitmap = render_crop(image, state, viewport, config.max_output_size)?;
    let jpeg = encode_jpeg_image(&bitmap, config.jpeg_quality)?;

    debug!(
        width = bitmap.width,
        height = bitmap.height,
        bytes = jpeg.len(),
        "crop exported"
    );

    Ok(CroppedImage {
        data_uri: to_data_uri(JPEG_MEDIA_TYPE, &jpeg),
        width: bitmap.width,
        height: bitmap.height,
    })
}

/// Rasterize the selection into an output bitmap without encoding it.
pub fn render_crop(
    image: &DecodedImage,
    state: &CropState,
    viewport: &Viewport,
    max_output: f64,
) -> Result<DecodedImage, ExportError> {
    let plan = plan_export(state, viewport, image.width, image.height, max_output);
    let region = crop_region(image, &plan.source);
    Ok(resample(&region, plan.output_width, plan.output_height)?)
}
