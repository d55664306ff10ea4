//! Fitting a decoded image into the display canvas.
//!
//! The canvas keeps the image's aspect ratio and is bounded by the container
//! width and a fixed height budget. The initial crop is centered inside it.

use crate::decode::{resample, DecodeError, DecodedImage};
use crate::geometry::{CropRect, CropState};

/// Display scale and canvas size derived from one loaded image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Display pixels per source pixel.
    pub display_scale: f64,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

impl Viewport {
    /// Fit an `image_width` x `image_height` image into a container.
    ///
    /// `display_scale = min(container_width / image_width, height_budget / image_height)`.
    /// Canvas dimensions are truncated to whole pixels, as a browser does when
    /// a fractional size is assigned to `canvas.width`, and are at least 1x1.
    pub fn fit(image_width: u32, image_height: u32, container_width: f64, height_budget: f64) -> Self {
        let iw = image_width.max(1) as f64;
        let ih = image_height.max(1) as f64;

        let display_scale = (container_width / iw).min(height_budget / ih);
        let display_scale = if display_scale.is_finite() && display_scale > 0.0 {
            display_scale
        } else {
            1.0
        };

        Self {
            display_scale,
            canvas_width: ((iw * display_scale).floor() as u32).max(1),
            canvas_height: ((ih * display_scale).floor() as u32).max(1),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.canvas_width as f64
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.canvas_height as f64
    }
}

impl CropState {
    /// Centered initial crop for a freshly fitted viewport.
    ///
    /// Square (or free) locks get a square of `fill * min(canvas_w, canvas_h)`.
    /// Other ratios get the largest rectangle of that ratio inside the
    /// `fill`-scaled canvas.
    pub fn initial(viewport: &Viewport, aspect_ratio: Option<f64>, fill: f64) -> Self {
        let cw = viewport.width();
        let ch = viewport.height();

        let (width, height) = match aspect_ratio {
            Some(ratio) if ratio > 0.0 && ratio != 1.0 => {
                let width = (fill * cw).min(fill * ch * ratio);
                (width, width / ratio)
            }
            _ => {
                let size = cw.min(ch) * fill;
                (size, size)
            }
        };

        CropState {
            rect: CropRect::new((cw - width) / 2.0, (ch - height) / 2.0, width, height),
            aspect_ratio,
        }
    }
}

/// Resample the source image to the canvas size for display.
///
/// Computed once per load and reused by every render.
pub fn display_backdrop(image: &DecodedImage, viewport: &Viewport) -> Result<DecodedImage, DecodeError> {
    resample(image, viewport.canvas_width, viewport.canvas_height)
}
