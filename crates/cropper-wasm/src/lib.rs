//! Cropper WASM - WebAssembly bindings for the crop selector
//!
//! This crate exposes cropper-core to JavaScript in two shapes.
//!
//! # Module Structure
//!
//! - `widget` - `CropperWidget`, mounted on a DOM subtree; owns its listeners
//! - `session` - `JsCropSession`, a headless session the host drives itself
//! - `events` - Host event parsing and outbound payloads
//! - `listener` - Event listener guards removed on drop
//! - `types` - WASM-compatible wrapper types
//!
//! # Usage
//!
//! ```typescript
//! import init, { CropperWidget } from '@cropper/wasm';
//!
//! await init();
//!
//! const widget = CropperWidget.mount(
//!   document.querySelector('#crop-selector'),
//!   (name, payload) => hook.pushEvent(name, payload),
//!   { max_output_size: 800 },
//! );
//! hook.handleEvent('change_aspect_ratio', (p) => widget.handle_event('change_aspect_ratio', p));
//!
//! // on teardown
//! widget.destroy();
//! ```

use wasm_bindgen::prelude::*;

mod events;
mod listener;
mod session;
mod types;
mod widget;

pub use session::JsCropSession;
pub use types::{JsCropRect, JsFrame, JsReaction};
pub use widget::CropperWidget;

/// Initialize the WASM module (called automatically on load)
///
/// Installs the panic hook and routes `tracing` output from cropper-core to
/// the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Fails only if the host page already installed a subscriber
    let _ = tracing_wasm::try_set_as_global_default();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
