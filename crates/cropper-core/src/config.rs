//! Tunable constants for a crop widget instance.
//!
//! Every field has a default matching the stock widget, so hosts only need to
//! pass the values they want to change. Deserialization accepts partial
//! objects thanks to `#[serde(default)]`.

use serde::{Deserialize, Serialize};

/// Configuration for one crop widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropperConfig {
    /// Minimum crop width and height in display pixels.
    pub min_size: f64,
    /// Hit-test tolerance around each handle, in display pixels.
    pub handle_tolerance: f64,
    /// Side length of the painted handle squares.
    pub handle_size: u32,
    /// Fixed display height budget used when fitting the image.
    pub display_height: f64,
    /// Fraction of the shorter canvas side used by the initial crop.
    pub initial_fill: f64,
    /// Longest edge of the exported bitmap (no upscaling).
    pub max_output_size: f64,
    /// JPEG quality for the exported payload (1-100).
    pub jpeg_quality: u8,
    /// Aspect ratio lock applied before any host configuration.
    /// `None` means free resizing.
    pub default_aspect_ratio: Option<f64>,
    /// Opacity of the dark overlay outside the crop window.
    pub overlay_alpha: f32,
    /// Opacity of the rule-of-thirds guide lines.
    pub grid_alpha: f32,
}

impl Default for CropperConfig {
    fn default() -> Self {
        Self {
            min_size: 50.0,
            handle_tolerance: 8.0,
            handle_size: 8,
            display_height: 400.0,
            initial_fill: 0.8,
            max_output_size: 800.0,
            jpeg_quality: 90,
            default_aspect_ratio: Some(1.0),
            overlay_alpha: 0.5,
            grid_alpha: 0.3,
        }
    }
}

impl CropperConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }
}
