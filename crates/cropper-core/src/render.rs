//! Crop overlay rendering.
//!
//! Paints one RGBA frame from the display backdrop and the current crop
//! state. Rendering is a pure function: same inputs, same bytes.
//!
//! # Paint Order
//!
//! 1. Backdrop (source image resampled to canvas size)
//! 2. Dark overlay over the whole canvas
//! 3. Crop window restored to the undimmed backdrop
//! 4. 2px white border centred on the crop edges
//! 5. 8 white handle squares centred on the handle positions
//! 6. Rule-of-thirds guide lines inside the crop window

use crate::config::CropperConfig;
use crate::decode::DecodedImage;
use crate::geometry::{CropState, Handle};

const WHITE: [u8; 3] = [255, 255, 255];

/// Visual parameters of the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub overlay_alpha: f32,
    pub grid_alpha: f32,
    pub handle_size: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::from(&CropperConfig::default())
    }
}

impl From<&CropperConfig> for RenderStyle {
    fn from(config: &CropperConfig) -> Self {
        Self {
            overlay_alpha: config.overlay_alpha.clamp(0.0, 1.0),
            grid_alpha: config.grid_alpha.clamp(0.0, 1.0),
            handle_size: config.handle_size,
        }
    }
}

/// A rendered canvas frame with RGBA pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl Frame {
    /// RGBA quadruple at `(x, y)`. Panics if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + x as usize) * 4)
    }

    /// Fill `[x0, x1) x [y0, y1)` with an opaque colour, clipped to the frame.
    fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, rgb: [u8; 3]) {
        for y in y0.max(0)..y1.min(self.height as i64) {
            for x in x0.max(0)..x1.min(self.width as i64) {
                if let Some(idx) = self.index(x, y) {
                    self.pixels[idx..idx + 3].copy_from_slice(&rgb);
                }
            }
        }
    }

    /// Source-over blend of `rgb` at `alpha` onto one pixel.
    fn blend(&mut self, x: i64, y: i64, rgb: [u8; 3], alpha: f32) {
        if let Some(idx) = self.index(x, y) {
            for (c, &src) in self.pixels[idx..idx + 3].iter_mut().zip(rgb.iter()) {
                *c = mix(*c, src, alpha);
            }
        }
    }
}

#[inline]
fn mix(dst: u8, src: u8, alpha: f32) -> u8 {
    (dst as f32 + (src as f32 - dst as f32) * alpha)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Render the crop overlay for `state` on top of `backdrop`.
///
/// `backdrop` must already be canvas-sized; the frame takes its dimensions.
pub fn render_frame(backdrop: &DecodedImage, state: &CropState, style: &RenderStyle) -> Frame {
    let width = backdrop.width;
    let height = backdrop.height;
    let rect = state.rect;

    let x0 = rect.x.round() as i64;
    let y0 = rect.y.round() as i64;
    let x1 = rect.right().round() as i64;
    let y1 = rect.bottom().round() as i64;

    let mut frame = Frame {
        width,
        height,
        pixels: Vec::with_capacity((width as usize) * (height as usize) * 4),
    };

    for (i, rgb) in backdrop.pixels.chunks_exact(3).enumerate() {
        let x = (i % width.max(1) as usize) as i64;
        let y = (i / width.max(1) as usize) as i64;
        let inside = x >= x0 && x < x1 && y >= y0 && y < y1;
        for &c in rgb {
            frame.pixels.push(if inside {
                c
            } else {
                mix(c, 0, style.overlay_alpha)
            });
        }
        frame.pixels.push(255);
    }

    // Border: a 2px stroke straddles each edge line
    frame.fill_rect(x0 - 1, y0 - 1, x1 + 1, y0 + 1, WHITE);
    frame.fill_rect(x0 - 1, y1 - 1, x1 + 1, y1 + 1, WHITE);
    frame.fill_rect(x0 - 1, y0 - 1, x0 + 1, y1 + 1, WHITE);
    frame.fill_rect(x1 - 1, y0 - 1, x1 + 1, y1 + 1, WHITE);

    let size = style.handle_size as f64;
    for handle in Handle::ALL {
        let p = handle.position(&rect);
        let hx = (p.x - size / 2.0).round() as i64;
        let hy = (p.y - size / 2.0).round() as i64;
        frame.fill_rect(hx, hy, hx + size as i64, hy + size as i64, WHITE);
    }

    for i in 1..=2 {
        let gx = (rect.x + rect.width / 3.0 * i as f64).floor() as i64;
        let gy = (rect.y + rect.height / 3.0 * i as f64).floor() as i64;
        for y in y0..y1 {
            frame.blend(gx, y, WHITE, style.grid_alpha);
        }
        for x in x0..x1 {
            frame.blend(x, gy, WHITE, style.grid_alpha);
        }
    }

    frame
}
