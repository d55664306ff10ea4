//! Headless crop session bindings.
//!
//! [`JsCropSession`] exposes the core session to hosts that manage their own
//! DOM: the host feeds file bytes and pointer positions and paints the frames
//! it pulls from `render()`.
//!
//! # Example
//!
//! ```typescript
//! import init, { JsCropSession } from '@cropper/wasm';
//!
//! await init();
//! const session = new JsCropSession({ max_output_size: 1024 });
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const loaded = session.load(file.type, bytes, container.clientWidth);
//! if (loaded.event_name) pushEvent(loaded.event_name, loaded.event_payload());
//!
//! const frame = session.render();
//! ctx.putImageData(new ImageData(new Uint8ClampedArray(frame.pixels()), frame.width), 0, 0);
//! ```

use cropper_core::{CropSession, CropperConfig, Point};
use wasm_bindgen::prelude::*;

use crate::events::parse_inbound;
use crate::types::{parse_config, JsCropRect, JsFrame, JsReaction};

#[wasm_bindgen]
pub struct JsCropSession {
    session: CropSession,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Create a session. `config` may be `undefined` or a partial config.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCropSession, JsValue> {
        Ok(Self::with_config(parse_config(config)?))
    }

    /// Decode and display an image file that has already been read.
    ///
    /// Non-image media types and undecodable bytes give an empty reaction.
    pub fn load(&mut self, media_type: &str, bytes: &[u8], container_width: f64) -> JsReaction {
        match self.session.begin_load(media_type) {
            Some(ticket) => self.session.finish_load(ticket, bytes, container_width).into(),
            None => JsReaction::default(),
        }
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> JsReaction {
        self.session.pointer_down(Point::new(x, y)).into()
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> JsReaction {
        self.session.pointer_move(Point::new(x, y)).into()
    }

    /// End the current interaction. Pass no coordinates for touch-end.
    pub fn pointer_up(&mut self, x: Option<f64>, y: Option<f64>) -> JsReaction {
        let p = x.zip(y).map(|(x, y)| Point::new(x, y));
        self.session.pointer_up(p).into()
    }

    /// Dispatch a named host event (`reset_file_input`, `change_aspect_ratio`).
    pub fn handle_event(&mut self, name: &str, payload: JsValue) -> Result<JsReaction, JsValue> {
        let event = parse_inbound(name, &payload)?;
        Ok(self.session.dispatch(event).into())
    }

    /// Render the current frame, or `undefined` before an image is loaded.
    pub fn render(&self) -> Option<JsFrame> {
        self.session.render().map(JsFrame::from)
    }

    /// Export the selection. The reaction carries `image_cropped`.
    pub fn commit(&self) -> Result<JsReaction, JsValue> {
        self.session
            .commit()
            .map(JsReaction::from)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn crop_rect(&self) -> Option<JsCropRect> {
        self.session.state().map(|s| JsCropRect::from(s.rect))
    }

    #[wasm_bindgen(getter)]
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.session.aspect_ratio()
    }

    #[wasm_bindgen(getter)]
    pub fn canvas_width(&self) -> Option<u32> {
        self.session.viewport().map(|v| v.canvas_width)
    }

    #[wasm_bindgen(getter)]
    pub fn canvas_height(&self) -> Option<u32> {
        self.session.viewport().map(|v| v.canvas_height)
    }
}

impl JsCropSession {
    pub(crate) fn with_config(config: CropperConfig) -> Self {
        Self {
            session: CropSession::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cropper_core::encode::encode_jpeg;

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        encode_jpeg(&vec![90u8; (width * height * 3) as usize], width, height, 90).unwrap()
    }

    fn loaded() -> JsCropSession {
        let mut session = JsCropSession::with_config(CropperConfig::default());
        let reaction = session.load("image/jpeg", &jpeg_bytes(1000, 500), 600.0);
        assert_eq!(reaction.event_name().as_deref(), Some("image_loaded"));
        session
    }

    #[test]
    fn test_load_rejects_non_image() {
        let mut session = JsCropSession::with_config(CropperConfig::default());
        let reaction = session.load("text/html", b"<html>", 600.0);
        assert_eq!(reaction.event_name(), None);
        assert!(session.crop_rect().is_none());
        assert!(session.render().is_none());
    }

    #[test]
    fn test_load_sets_up_canvas() {
        let session = loaded();
        assert_eq!(session.canvas_width(), Some(600));
        assert_eq!(session.canvas_height(), Some(300));

        let frame = session.render().unwrap();
        assert_eq!((frame.width(), frame.height()), (600, 300));
    }

    #[test]
    fn test_drag_and_release() {
        let mut session = loaded();
        let start = session.crop_rect().unwrap();

        assert_eq!(session.pointer_down(300.0, 150.0).cursor().as_deref(), Some("move"));
        assert!(session.pointer_move(320.0, 150.0).redraw());
        session.pointer_up(Some(320.0), Some(150.0));

        let end = session.crop_rect().unwrap();
        assert!((end.x() - start.x() - 20.0).abs() < 1e-9);
        assert_eq!(end.y(), start.y());
        assert!(!session.pointer_move(0.0, 0.0).redraw());
    }

    #[test]
    fn test_touch_end_without_point() {
        let mut session = loaded();
        session.pointer_down(300.0, 150.0);
        assert_eq!(session.pointer_up(None, None).cursor().as_deref(), Some("default"));
    }

    #[test]
    fn test_commit() {
        let session = loaded();
        let reaction = session.commit().unwrap();
        assert!(reaction.clear_file_input());
        assert_eq!(reaction.event_name().as_deref(), Some("image_cropped"));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use js_sys::{Object, Reflect};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_partial_config() {
        let config = Object::new();
        Reflect::set(&config, &"default_aspect_ratio".into(), &JsValue::from_f64(1.5)).unwrap();
        let session = JsCropSession::new(config.into()).unwrap();
        assert_eq!(session.aspect_ratio(), Some(1.5));
    }

    #[wasm_bindgen_test]
    fn test_undefined_config_is_default() {
        let session = JsCropSession::new(JsValue::UNDEFINED).unwrap();
        assert_eq!(session.aspect_ratio(), Some(1.0));
    }

    #[wasm_bindgen_test]
    fn test_handle_event_unknown_name() {
        let mut session = JsCropSession::new(JsValue::UNDEFINED).unwrap();
        assert!(session.handle_event("play_sound", JsValue::UNDEFINED).is_err());
    }

    #[wasm_bindgen_test]
    fn test_handle_reset_event() {
        let mut session = JsCropSession::new(JsValue::UNDEFINED).unwrap();
        let reaction = session
            .handle_event("reset_file_input", JsValue::UNDEFINED)
            .unwrap();
        assert!(reaction.clear_file_input());
    }
}
