//! Display-to-source mapping for the export.

use crate::geometry::CropState;
use crate::viewport::Viewport;

/// A rectangle in source-image pixel space (fractional).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Where to read from and how large to write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportPlan {
    /// Crop rectangle projected into source pixels.
    pub source: SourceRect,
    /// `min(1, max_output / max(source.width, source.height))`
    pub output_scale: f64,
    pub output_width: u32,
    pub output_height: u32,
}

/// Project the crop into source space and size the output bitmap.
///
/// X and Y use independent scale factors (`image / canvas` per axis), so a
/// canvas whose whole-pixel rounding distorts the aspect slightly still maps
/// exactly onto the source. The output never upscales.
pub fn plan_export(
    state: &CropState,
    viewport: &Viewport,
    image_width: u32,
    image_height: u32,
    max_output: f64,
) -> ExportPlan {
    let scale_x = image_width as f64 / viewport.width();
    let scale_y = image_height as f64 / viewport.height();

    let rect = state.rect;
    let source = SourceRect {
        x: rect.x * scale_x,
        y: rect.y * scale_y,
        width: rect.width * scale_x,
        height: rect.height * scale_y,
    };

    let longest = source.width.max(source.height);
    let output_scale = if longest > 0.0 {
        (max_output / longest).min(1.0)
    } else {
        1.0
    };

    ExportPlan {
        source,
        output_scale,
        output_width: ((source.width * output_scale).round() as u32).max(1),
        output_height: ((source.height * output_scale).round() as u32).max(1),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
