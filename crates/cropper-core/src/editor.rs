//! Crop rectangle editing: pointer state machine and pure transitions.
//!
//! The editor owns one [`CropState`] and one [`Interaction`]. Pointer events
//! move it between `Idle`, `Dragging` and `Resizing`; the geometry itself is
//! changed only by the pure functions [`apply_drag`], [`apply_resize`] and
//! [`apply_aspect_ratio`], which return either a validated new state or the
//! state they were given.
//!
//! # Resize Rules
//!
//! - Corner handles hold the opposite corner fixed. With a ratio lock the
//!   height is derived from the width.
//! - Edge handles hold the opposite edge fixed and move one axis. With a
//!   ratio lock the other side is derived and centred on the old centre line.
//! - A proposal is applied only if both sides stay `>= min_size` and the
//!   rectangle stays inside the canvas. Otherwise it is silently dropped.

use tracing::debug;

use crate::geometry::{hit_handle, CropRect, CropState, Cursor, Handle, Point};

/// Canvas bounds and limits the editor validates against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub min_size: f64,
}

impl Bounds {
    pub fn new(canvas_width: f64, canvas_height: f64, min_size: f64) -> Self {
        Self {
            canvas_width,
            canvas_height,
            min_size,
        }
    }

    fn accepts(&self, rect: &CropRect) -> bool {
        rect.meets_min_size(self.min_size) && rect.fits_within(self.canvas_width, self.canvas_height)
    }
}

/// Transient pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Moving the whole rectangle. `offset` is the pointer position relative
    /// to the rectangle's top-left corner at pointer-down.
    Dragging { offset: Point },
    /// Resizing through `handle`. `anchor` is the pointer-down position.
    Resizing { handle: Handle, anchor: Point },
}

/// Move the rectangle so its top-left sits at `pointer - offset`, clamped
/// inside the canvas. Size never changes.
pub fn apply_drag(state: &CropState, pointer: Point, offset: Point, bounds: &Bounds) -> CropState {
    let rect = state.rect;
    let max_x = (bounds.canvas_width - rect.width).max(0.0);
    let max_y = (bounds.canvas_height - rect.height).max(0.0);

    CropState {
        rect: CropRect {
            x: (pointer.x - offset.x).min(max_x).max(0.0),
            y: (pointer.y - offset.y).min(max_y).max(0.0),
            ..rect
        },
        ..*state
    }
}

/// Propose a resize through `handle` towards `pointer`.
///
/// Returns the new state if the proposal passes validation, otherwise a copy
/// of `state`.
pub fn apply_resize(state: &CropState, handle: Handle, pointer: Point, bounds: &Bounds) -> CropState {
    let proposal = propose_resize(&state.rect, state.aspect_ratio, handle, pointer);

    if bounds.accepts(&proposal) {
        CropState {
            rect: proposal,
            ..*state
        }
    } else {
        *state
    }
}

fn propose_resize(rect: &CropRect, ratio: Option<f64>, handle: Handle, p: Point) -> CropRect {
    let right = rect.right();
    let bottom = rect.bottom();
    let center = rect.center();

    match handle {
        Handle::Se => {
            let width = p.x - rect.x;
            let height = ratio.map_or(p.y - rect.y, |r| width / r);
            CropRect::new(rect.x, rect.y, width, height)
        }
        Handle::Sw => {
            let width = right - p.x;
            let height = ratio.map_or(p.y - rect.y, |r| width / r);
            CropRect::new(right - width, rect.y, width, height)
        }
        Handle::Ne => {
            let width = p.x - rect.x;
            let height = ratio.map_or(bottom - p.y, |r| width / r);
            CropRect::new(rect.x, bottom - height, width, height)
        }
        Handle::Nw => {
            let width = right - p.x;
            let height = ratio.map_or(bottom - p.y, |r| width / r);
            CropRect::new(right - width, bottom - height, width, height)
        }
        Handle::E | Handle::W => {
            let width = if handle == Handle::E {
                p.x - rect.x
            } else {
                right - p.x
            };
            let x = if handle == Handle::E { rect.x } else { right - width };
            match ratio {
                Some(r) => {
                    let height = width / r;
                    CropRect::new(x, center.y - height / 2.0, width, height)
                }
                None => CropRect::new(x, rect.y, width, rect.height),
            }
        }
        Handle::S | Handle::N => {
            let height = if handle == Handle::S {
                p.y - rect.y
            } else {
                bottom - p.y
            };
            let y = if handle == Handle::S { rect.y } else { bottom - height };
            match ratio {
                Some(r) => {
                    let width = height * r;
                    CropRect::new(center.x - width / 2.0, y, width, height)
                }
                None => CropRect::new(rect.x, y, rect.width, height),
            }
        }
    }
}

/// Apply a new aspect-ratio lock.
///
/// - `Some(1.0)`: both sides become `min(width, height)`
/// - `Some(r > 1)`: height becomes `width / r`
/// - `Some(r < 1)`: width becomes `height * r`
/// - `None`: unlocks, geometry unchanged
///
/// The top-left corner stays put while the result fits. A derived shape below
/// `min_size` grows uniformly to meet the minimum. A shape larger than the
/// canvas shrinks to the largest rectangle of ratio `r` the canvas holds, which
/// may be below `min_size` on a short canvas. Either way it is then shifted
/// back inside the canvas.
pub fn apply_aspect_ratio(state: &CropState, ratio: Option<f64>, bounds: &Bounds) -> CropState {
    let Some(r) = ratio else {
        return CropState {
            aspect_ratio: None,
            ..*state
        };
    };

    let mut rect = state.rect;
    if r == 1.0 {
        let side = rect.width.min(rect.height);
        rect.width = side;
        rect.height = side;
    } else if r > 1.0 {
        rect.height = rect.width / r;
    } else {
        rect.width = rect.height * r;
    }

    let shortest = rect.width.min(rect.height);
    if shortest < bounds.min_size && shortest > 0.0 {
        let grow = bounds.min_size / shortest;
        rect.width *= grow;
        rect.height *= grow;
    }

    let (cw, ch) = (bounds.canvas_width, bounds.canvas_height);
    if rect.width > cw || rect.height > ch {
        if cw / r <= ch {
            rect.width = cw;
            rect.height = (cw / r).min(ch);
        } else {
            rect.width = (ch * r).min(cw);
            rect.height = ch;
        }
    }
    rect.x = rect.x.min(cw - rect.width).max(0.0);
    rect.y = rect.y.min(ch - rect.height).max(0.0);

    CropState {
        rect,
        aspect_ratio: Some(r),
    }
}

/// Pointer-driven crop editor.
#[derive(Debug, Clone)]
pub struct CropEditor {
    state: CropState,
    interaction: Interaction,
    bounds: Bounds,
    tolerance: f64,
}

impl CropEditor {
    pub fn new(state: CropState, bounds: Bounds, tolerance: f64) -> Self {
        Self {
            state,
            interaction: Interaction::Idle,
            bounds,
            tolerance,
        }
    }

    pub fn state(&self) -> &CropState {
        &self.state
    }

    pub fn rect(&self) -> CropRect {
        self.state.rect
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Pointer pressed at `p`. Returns the cursor to show.
    pub fn pointer_down(&mut self, p: Point) -> Cursor {
        if let Some(handle) = hit_handle(&self.state.rect, p, self.tolerance) {
            debug!(handle = handle.name(), "resize started");
            self.interaction = Interaction::Resizing { handle, anchor: p };
            return handle.cursor();
        }

        if self.state.rect.contains(p) {
            debug!("drag started");
            self.interaction = Interaction::Dragging {
                offset: Point::new(p.x - self.state.rect.x, p.y - self.state.rect.y),
            };
            return Cursor::Move;
        }

        self.state.hover_cursor(p, self.tolerance)
    }

    /// Pointer moved to `p`. Returns `(needs_redraw, cursor)`.
    pub fn pointer_move(&mut self, p: Point) -> (bool, Cursor) {
        match self.interaction {
            Interaction::Idle => (false, self.state.hover_cursor(p, self.tolerance)),
            Interaction::Dragging { offset } => {
                self.state = apply_drag(&self.state, p, offset, &self.bounds);
                (true, Cursor::Move)
            }
            Interaction::Resizing { handle, .. } => {
                self.state = apply_resize(&self.state, handle, p, &self.bounds);
                (true, handle.cursor())
            }
        }
    }

    /// Pointer released. Always returns to `Idle`.
    ///
    /// `p` is absent for touch-end, which carries no active touch point.
    pub fn pointer_up(&mut self, p: Option<Point>) -> Cursor {
        if self.interaction != Interaction::Idle {
            debug!("interaction ended");
        }
        self.interaction = Interaction::Idle;
        p.map_or(Cursor::Default, |p| self.state.hover_cursor(p, self.tolerance))
    }

    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) {
        self.state = apply_aspect_ratio(&self.state, ratio, &self.bounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Bounds {
        Bounds::new(600.0, 300.0, 50.0)
    }

    fn state(x: f64, y: f64, w: f64, h: f64, ratio: Option<f64>) -> CropState {
        CropState::new(CropRect::new(x, y, w, h), ratio)
    }

    #[test]
    fn test_drag_moves_by_pointer_delta() {
        let mut editor = CropEditor::new(state(50.0, 50.0, 100.0, 100.0, Some(1.0)), bounds(), 8.0);
        assert_eq!(editor.pointer_down(Point::new(100.0, 100.0)), Cursor::Move);
        editor.pointer_move(Point::new(110.0, 110.0));
        assert_eq!(editor.rect(), CropRect::new(60.0, 60.0, 100.0, 100.0));
    }

    #[test]
    fn test_drag_clamps_to_canvas() {
        let s = state(50.0, 50.0, 100.0, 100.0, Some(1.0));
        let moved = apply_drag(&s, Point::new(1000.0, -1000.0), Point::new(50.0, 50.0), &bounds());
        assert_eq!(moved.rect, CropRect::new(500.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_resize_se_rejected_below_min_size() {
        let s = state(10.0, 10.0, 20.0, 20.0, Some(1.0));
        let result = apply_resize(&s, Handle::Se, Point::new(40.0, 40.0), &bounds());
        assert_eq!(result, s);
    }

    #[test]
    fn test_resize_se_locked_square() {
        let s = state(10.0, 10.0, 100.0, 100.0, Some(1.0));
        let result = apply_resize(&s, Handle::Se, Point::new(160.0, 999.0), &bounds());
        assert_eq!(result.rect, CropRect::new(10.0, 10.0, 150.0, 150.0));
    }

    #[test]
    fn test_resize_nw_keeps_opposite_corner() {
        let s = state(100.0, 100.0, 100.0, 100.0, Some(1.0));
        let result = apply_resize(&s, Handle::Nw, Point::new(80.0, 0.0), &bounds());
        assert_eq!(result.rect, CropRect::new(80.0, 80.0, 120.0, 120.0));
        assert_eq!(result.rect.right(), 200.0);
        assert_eq!(result.rect.bottom(), 200.0);
    }

    #[test]
    fn test_resize_ne_with_ratio() {
        let s = state(100.0, 100.0, 150.0, 100.0, Some(1.5));
        let result = apply_resize(&s, Handle::Ne, Point::new(280.0, 0.0), &bounds());
        assert_eq!(result.rect.width, 180.0);
        assert_eq!(result.rect.height, 120.0);
        assert_eq!(result.rect.bottom(), 200.0);
        assert_eq!(result.rect.x, 100.0);
    }

    #[test]
    fn test_resize_sw_free() {
        let s = state(100.0, 100.0, 100.0, 100.0, None);
        let result = apply_resize(&s, Handle::Sw, Point::new(50.0, 180.0), &bounds());
        assert_eq!(result.rect, CropRect::new(50.0, 100.0, 150.0, 80.0));
    }

    #[test]
    fn test_resize_rejected_outside_canvas() {
        let s = state(400.0, 100.0, 100.0, 100.0, Some(1.0));
        // width 250 would need height 250 > canvas remaining
        let result = apply_resize(&s, Handle::Se, Point::new(650.0, 0.0), &bounds());
        assert_eq!(result, s);
    }

    #[test]
    fn test_resize_edge_free_single_axis() {
        let s = state(100.0, 100.0, 100.0, 100.0, None);
        let result = apply_resize(&s, Handle::E, Point::new(260.0, 5.0), &bounds());
        assert_eq!(result.rect, CropRect::new(100.0, 100.0, 160.0, 100.0));

        let result = apply_resize(&s, Handle::N, Point::new(5.0, 60.0), &bounds());
        assert_eq!(result.rect, CropRect::new(100.0, 60.0, 100.0, 140.0));
    }

    #[test]
    fn test_resize_edge_locked_centres_other_axis() {
        let s = state(100.0, 100.0, 100.0, 100.0, Some(1.0));
        let result = apply_resize(&s, Handle::W, Point::new(80.0, 0.0), &bounds());
        assert_eq!(result.rect, CropRect::new(80.0, 90.0, 120.0, 120.0));
        assert_eq!(result.rect.center().y, 150.0);
    }

    #[test]
    fn test_pointer_down_on_handle_starts_resize() {
        let mut editor = CropEditor::new(state(100.0, 100.0, 100.0, 100.0, Some(1.0)), bounds(), 8.0);
        let cursor = editor.pointer_down(Point::new(203.0, 203.0));
        assert_eq!(cursor.css(), "se-resize");
        assert!(matches!(
            editor.interaction(),
            Interaction::Resizing {
                handle: Handle::Se,
                ..
            }
        ));
    }

    #[test]
    fn test_pointer_down_outside_is_idle() {
        let mut editor = CropEditor::new(state(100.0, 100.0, 100.0, 100.0, Some(1.0)), bounds(), 8.0);
        assert_eq!(editor.pointer_down(Point::new(10.0, 10.0)), Cursor::Default);
        assert_eq!(editor.interaction(), Interaction::Idle);
    }

    #[test]
    fn test_idle_move_only_updates_cursor() {
        let mut editor = CropEditor::new(state(100.0, 100.0, 100.0, 100.0, Some(1.0)), bounds(), 8.0);
        let before = editor.rect();
        let (redraw, cursor) = editor.pointer_move(Point::new(150.0, 150.0));
        assert!(!redraw);
        assert_eq!(cursor, Cursor::Move);
        assert_eq!(editor.rect(), before);
    }

    #[test]
    fn test_pointer_up_returns_to_idle() {
        let mut editor = CropEditor::new(state(100.0, 100.0, 100.0, 100.0, Some(1.0)), bounds(), 8.0);
        editor.pointer_down(Point::new(150.0, 150.0));
        assert_ne!(editor.interaction(), Interaction::Idle);
        editor.pointer_up(None);
        assert_eq!(editor.interaction(), Interaction::Idle);

        let (redraw, _) = editor.pointer_move(Point::new(300.0, 300.0));
        assert!(!redraw);
    }

    #[test]
    fn test_aspect_ratio_square_takes_min_side() {
        let s = state(10.0, 20.0, 200.0, 120.0, None);
        let result = apply_aspect_ratio(&s, Some(1.0), &bounds());
        assert_eq!(result.rect, CropRect::new(10.0, 20.0, 120.0, 120.0));
        assert_eq!(result.aspect_ratio, Some(1.0));
    }

    #[test]
    fn test_aspect_ratio_wide_and_tall() {
        let s = state(0.0, 0.0, 150.0, 150.0, Some(1.0));
        let wide = apply_aspect_ratio(&s, Some(1.5), &bounds());
        assert_eq!(wide.rect.width, 150.0);
        assert_eq!(wide.rect.height, 100.0);

        let tall = apply_aspect_ratio(&s, Some(0.5), &bounds());
        assert_eq!(tall.rect.width, 75.0);
        assert_eq!(tall.rect.height, 150.0);
    }

    #[test]
    fn test_aspect_ratio_grows_to_min_size() {
        let s = state(560.0, 0.0, 60.0, 60.0, Some(1.0));
        let result = apply_aspect_ratio(&s, Some(2.0), &bounds());
        assert!((result.rect.height - 50.0).abs() < 1e-9);
        assert!((result.rect.width - 100.0).abs() < 1e-9);
        assert!(result.rect.fits_within(600.0, 300.0));
    }

    #[test]
    fn test_aspect_ratio_extreme_ratio_stays_on_canvas() {
        let s = state(0.0, 0.0, 200.0, 300.0, None);
        let result = apply_aspect_ratio(&s, Some(0.1), &bounds());
        assert!(result.rect.fits_within(600.0, 300.0));
        assert!((result.rect.width - 30.0).abs() < 1e-9);
        assert_eq!(result.rect.height, 300.0);
    }

    #[test]
    fn test_aspect_ratio_short_canvas_shrinks_below_min_size() {
        let short = Bounds::new(600.0, 40.0, 50.0);
        let s = state(284.0, 4.0, 32.0, 32.0, Some(1.0));
        let result = apply_aspect_ratio(&s, Some(1.5), &short);
        assert!(result.rect.fits_within(600.0, 40.0));
        assert_eq!(result.rect, CropRect::new(284.0, 0.0, 60.0, 40.0));
    }

    #[test]
    fn test_aspect_ratio_none_unlocks() {
        let s = state(0.0, 0.0, 150.0, 100.0, Some(1.5));
        let result = apply_aspect_ratio(&s, None, &bounds());
        assert_eq!(result.rect, s.rect);
        assert_eq!(result.aspect_ratio, None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
