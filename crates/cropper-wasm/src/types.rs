//! WASM-compatible wrapper types.
//!
//! Plain-data views of core values for JavaScript: the crop rectangle, a
//! rendered frame and the reaction to a session operation.

use cropper_core::{CropRect, CropperConfig, Effect, Frame, OutboundEvent, Reaction};
use wasm_bindgen::prelude::*;

use crate::events::outbound_payload;

/// The crop rectangle in canvas pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsCropRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[wasm_bindgen]
impl JsCropRect {
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.height
    }
}

impl From<CropRect> for JsCropRect {
    fn from(rect: CropRect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

/// A rendered canvas frame.
///
/// `pixels()` returns RGBA bytes ready for `new ImageData(...)`. It copies the
/// buffer into JavaScript memory.
#[wasm_bindgen]
pub struct JsFrame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsFrame {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl From<Frame> for JsFrame {
    fn from(frame: Frame) -> Self {
        Self {
            width: frame.width,
            height: frame.height,
            pixels: frame.pixels,
        }
    }
}

/// What the host should do after a session call.
#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct JsReaction {
    redraw: bool,
    clear_file_input: bool,
    show_controls: bool,
    cursor: Option<&'static str>,
    event: Option<OutboundEvent>,
}

#[wasm_bindgen]
impl JsReaction {
    /// The canvas should be repainted from `render()`.
    #[wasm_bindgen(getter)]
    pub fn redraw(&self) -> bool {
        self.redraw
    }

    #[wasm_bindgen(getter)]
    pub fn clear_file_input(&self) -> bool {
        self.clear_file_input
    }

    #[wasm_bindgen(getter)]
    pub fn show_controls(&self) -> bool {
        self.show_controls
    }

    /// CSS cursor name, if the cursor should change.
    #[wasm_bindgen(getter)]
    pub fn cursor(&self) -> Option<String> {
        self.cursor.map(str::to_string)
    }

    /// Name of the event to push to the host (`image_loaded`, `image_cropped`).
    #[wasm_bindgen(getter)]
    pub fn event_name(&self) -> Option<String> {
        self.event.as_ref().map(|e| e.name().to_string())
    }

    /// Payload of the event to push, or `null`.
    pub fn event_payload(&self) -> Result<JsValue, JsValue> {
        match &self.event {
            Some(event) => outbound_payload(event),
            None => Ok(JsValue::NULL),
        }
    }
}

impl From<Reaction> for JsReaction {
    fn from(reaction: Reaction) -> Self {
        Self {
            redraw: reaction.effects.contains(&Effect::Redraw),
            clear_file_input: reaction.effects.contains(&Effect::ClearFileInput),
            show_controls: reaction.effects.contains(&Effect::ShowControls),
            cursor: reaction.cursor.map(|c| c.css()),
            event: reaction.event,
        }
    }
}

/// Read a (possibly partial) config object. `undefined` and `null` give the
/// defaults.
pub(crate) fn parse_config(value: JsValue) -> Result<CropperConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(CropperConfig::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}
