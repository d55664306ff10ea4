//! Display-space geometry for the crop selector.
//!
//! # Coordinate System
//!
//! - All values are canvas (display) pixels, `f64`
//! - Origin is the top-left corner of the canvas
//! - `x` grows to the right, `y` grows downwards

use serde::{Deserialize, Serialize};

/// A point in display space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned crop rectangle in display space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive containment test (points on the border count as inside).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// True if the rectangle lies entirely within a `width` x `height` canvas.
    pub fn fits_within(&self, width: f64, height: f64) -> bool {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= width && self.bottom() <= height
    }

    /// True if both sides are at least `min_size`.
    pub fn meets_min_size(&self, min_size: f64) -> bool {
        self.width >= min_size && self.height >= min_size
    }
}

/// One of the eight resize hit-targets on the crop border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Nw,
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
}

impl Handle {
    /// All handles in hit-test order.
    pub const ALL: [Handle; 8] = [
        Handle::Nw,
        Handle::N,
        Handle::Ne,
        Handle::E,
        Handle::Se,
        Handle::S,
        Handle::Sw,
        Handle::W,
    ];

    /// Short compass name (`"nw"`, `"n"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Handle::Nw => "nw",
            Handle::N => "n",
            Handle::Ne => "ne",
            Handle::E => "e",
            Handle::Se => "se",
            Handle::S => "s",
            Handle::Sw => "sw",
            Handle::W => "w",
        }
    }

    /// Corner handles move two edges, the others move one.
    pub fn is_corner(self) -> bool {
        matches!(self, Handle::Nw | Handle::Ne | Handle::Se | Handle::Sw)
    }

    /// Position of this handle on the border of `rect`.
    pub fn position(self, rect: &CropRect) -> Point {
        let CropRect {
            x,
            y,
            width,
            height,
        } = *rect;
        match self {
            Handle::Nw => Point::new(x, y),
            Handle::N => Point::new(x + width / 2.0, y),
            Handle::Ne => Point::new(x + width, y),
            Handle::E => Point::new(x + width, y + height / 2.0),
            Handle::Se => Point::new(x + width, y + height),
            Handle::S => Point::new(x + width / 2.0, y + height),
            Handle::Sw => Point::new(x, y + height),
            Handle::W => Point::new(x, y + height / 2.0),
        }
    }

    pub fn cursor(self) -> Cursor {
        Cursor::Resize(self)
    }
}

/// Find the first handle within `tolerance` of `p` on both axes.
pub fn hit_handle(rect: &CropRect, p: Point, tolerance: f64) -> Option<Handle> {
    Handle::ALL.into_iter().find(|handle| {
        let h = handle.position(rect);
        (p.x - h.x).abs() < tolerance && (p.y - h.y).abs() < tolerance
    })
}

/// Pointer cursor shown over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Move,
    Resize(Handle),
}

impl Cursor {
    /// CSS `cursor` value.
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Move => "move",
            Cursor::Resize(handle) => match handle {
                Handle::Nw => "nw-resize",
                Handle::N => "n-resize",
                Handle::Ne => "ne-resize",
                Handle::E => "e-resize",
                Handle::Se => "se-resize",
                Handle::S => "s-resize",
                Handle::Sw => "sw-resize",
                Handle::W => "w-resize",
            },
        }
    }
}

/// The crop rectangle together with its aspect-ratio lock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropState {
    pub rect: CropRect,
    /// Locked width / height ratio, or `None` for free resizing.
    pub aspect_ratio: Option<f64>,
}

impl CropState {
    pub fn new(rect: CropRect, aspect_ratio: Option<f64>) -> Self {
        Self { rect, aspect_ratio }
    }

    /// Cursor for a hovering pointer at `p`.
    pub fn hover_cursor(&self, p: Point, tolerance: f64) -> Cursor {
        if let Some(handle) = hit_handle(&self.rect, p, tolerance) {
            handle.cursor()
        } else if self.rect.contains(p) {
            Cursor::Move
        } else {
            Cursor::Default
        }
    }
}

impl Default for CropState {
    fn default() -> Self {
        Self {
            rect: CropRect::new(0.0, 0.0, 300.0, 300.0),
            aspect_ratio: Some(1.0),
        }
    }
}
