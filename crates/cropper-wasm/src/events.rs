//! Host event conversion.
//!
//! Inbound events arrive from the server-driven UI host as a name plus a JS
//! payload object; outbound payloads are plain JS objects.

use cropper_core::{AspectRatioPayload, InboundEvent, InboundKind, OutboundEvent};
use wasm_bindgen::prelude::*;

/// Parse a host event.
///
/// The payload is only read for events that carry one. Unknown names and
/// malformed payloads are returned as errors.
pub fn parse_inbound(name: &str, payload: &JsValue) -> Result<InboundEvent, JsValue> {
    let kind = InboundKind::from_name(name).map_err(to_js_error)?;

    let payload = match kind {
        InboundKind::ChangeAspectRatio => Some(
            serde_wasm_bindgen::from_value::<AspectRatioPayload>(payload.clone())
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
        ),
        InboundKind::ResetFileInput => None,
    };

    InboundEvent::from_parts(name, payload).map_err(to_js_error)
}

/// Convert an outbound event's payload into a JS object.
pub fn outbound_payload(event: &OutboundEvent) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(event).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use js_sys::{Object, Reflect};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn ratio_payload(ratio: JsValue) -> JsValue {
        let obj = Object::new();
        Reflect::set(&obj, &"ratio".into(), &ratio).unwrap();
        obj.into()
    }

    #[wasm_bindgen_test]
    fn test_parse_reset() {
        let event = parse_inbound("reset_file_input", &JsValue::UNDEFINED).unwrap();
        assert_eq!(event, InboundEvent::ResetFileInput);
    }

    #[wasm_bindgen_test]
    fn test_parse_change_aspect_ratio() {
        let event = parse_inbound("change_aspect_ratio", &ratio_payload(JsValue::from_f64(1.5))).unwrap();
        assert_eq!(event, InboundEvent::ChangeAspectRatio { ratio: Some(1.5) });

        let event = parse_inbound("change_aspect_ratio", &ratio_payload(JsValue::NULL)).unwrap();
        assert_eq!(event, InboundEvent::ChangeAspectRatio { ratio: None });
    }

    #[wasm_bindgen_test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_inbound("progress", &JsValue::UNDEFINED).is_err());
        assert!(parse_inbound("change_aspect_ratio", &ratio_payload(JsValue::from_f64(-1.0))).is_err());
        assert!(parse_inbound("change_aspect_ratio", &ratio_payload(JsValue::from_str("wide"))).is_err());
    }

    #[wasm_bindgen_test]
    fn test_outbound_payload_shape() {
        let payload = outbound_payload(&OutboundEvent::ImageLoaded {
            width: 1000,
            height: 500,
        })
        .unwrap();
        assert_eq!(Reflect::get(&payload, &"width".into()).unwrap().as_f64(), Some(1000.0));
        assert_eq!(Reflect::get(&payload, &"height".into()).unwrap().as_f64(), Some(500.0));
    }
}
