//! Copying a source-space rectangle out of the decoded image.
//!
//! Fractional source coordinates are rounded to the pixel grid, then clamped
//! to the image. The result is never smaller than 1x1.

use super::SourceRect;
use crate::decode::DecodedImage;

/// Copy the pixels covered by `region` into a new image.
///
/// - Edges are rounded to whole pixels
/// - Parts outside the image are clipped
/// - Minimum output dimension is 1x1 pixels
pub fn crop_region(image: &DecodedImage, region: &SourceRect) -> DecodedImage {
    let src_w = image.width;
    let src_h = image.height;

    let left = (region.x.max(0.0).round() as u32).min(src_w.saturating_sub(1));
    let top = (region.y.max(0.0).round() as u32).min(src_h.saturating_sub(1));
    let right = ((region.x + region.width).max(0.0).round() as u32).min(src_w);
    let bottom = ((region.y + region.height).max(0.0).round() as u32).min(src_h);

    // Full-image fast path
    if left == 0 && top == 0 && right == src_w && bottom == src_h {
        return image.clone();
    }

    let out_width = right.saturating_sub(left).max(1);
    let out_height = bottom.saturating_sub(top).max(1);

    let row_bytes = (out_width * 3) as usize;
    let mut pixels = Vec::with_capacity(row_bytes * out_height as usize);

    // Rows are contiguous in both buffers, so copy a slice per row
    for y in top..top + out_height {
        let start = ((y * src_w + left) * 3) as usize;
        pixels.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    DecodedImage {
        width: out_width,
        height: out_height,
        pixels,
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
