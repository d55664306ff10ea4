//! DOM-mounted crop selector.
//!
//! [`CropperWidget::mount`] looks up the widget's slots under a root element
//! by data attribute, wires its listeners and paints session frames into the
//! canvas. Outbound events are pushed to a host callback as
//! `push_event(name, payload)`.
//!
//! # Slots
//!
//! | Selector                   | Required | Role                                |
//! |----------------------------|----------|-------------------------------------|
//! | `[data-crop-canvas]`       | yes      | Drawing surface                     |
//! | `[data-cropper-container]` | no       | Width source (defaults to the root) |
//! | `[data-image-input]`       | no       | File input                          |
//! | `[data-crop-button]`       | no       | Commit button                       |
//! | `[data-crop-controls]`     | no       | Revealed after a load               |
//! | `[data-crop-preview]`      | no       | Revealed after a load               |

use std::cell::RefCell;
use std::rc::Rc;

use cropper_core::{CropSession, Effect, OutboundEvent, Point, Reaction};
use js_sys::{Function, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    console, CanvasRenderingContext2d, Element, Event, HtmlCanvasElement, HtmlInputElement,
    ImageData, MouseEvent, TouchEvent,
};

use crate::events::{outbound_payload, parse_inbound};
use crate::listener::EventSubscription;
use crate::types::parse_config;

const HIDDEN_CLASS: &str = "hidden";

struct Slots {
    container: Element,
    input: Option<HtmlInputElement>,
    button: Option<Element>,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    controls: Option<Element>,
    preview: Option<Element>,
}

impl Slots {
    fn query(root: &Element) -> Result<Self, JsValue> {
        let canvas = query(root, "[data-crop-canvas]")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| {
                let message = "cropper: no [data-crop-canvas] element under root";
                console::error_1(&message.into());
                JsValue::from_str(message)
            })?;

        let context = canvas
            .get_context("2d")?
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| JsValue::from_str("cropper: canvas has no 2d context"))?;

        Ok(Self {
            container: query(root, "[data-cropper-container]").unwrap_or_else(|| root.clone()),
            input: query(root, "[data-image-input]").and_then(|el| el.dyn_into().ok()),
            button: query(root, "[data-crop-button]"),
            canvas,
            context,
            controls: query(root, "[data-crop-controls]"),
            preview: query(root, "[data-crop-preview]"),
        })
    }

    fn clear_file_input(&self) {
        if let Some(input) = &self.input {
            input.set_value("");
        }
    }

    fn show_controls(&self) {
        let canvas: &Element = &self.canvas;
        for el in [Some(canvas), self.controls.as_ref(), self.preview.as_ref()]
            .into_iter()
            .flatten()
        {
            let _ = el.class_list().remove_1(HIDDEN_CLASS);
        }
    }

    fn set_cursor(&self, css: &str) {
        let _ = self.canvas.style().set_property("cursor", css);
    }

    /// Pointer position relative to the canvas' top-left corner.
    fn canvas_point(&self, client_x: f64, client_y: f64) -> Point {
        let bounds = self.canvas.get_bounding_client_rect();
        Point::new(client_x - bounds.left(), client_y - bounds.top())
    }
}

fn query(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

/// Shared state reachable from every listener.
struct Inner {
    session: RefCell<CropSession>,
    slots: Slots,
    push_event: Function,
}

impl Inner {
    /// Carry out a session reaction. Must be called with no session borrow held.
    fn apply(&self, reaction: Reaction) {
        for effect in &reaction.effects {
            match effect {
                Effect::ClearFileInput => self.slots.clear_file_input(),
                Effect::ShowControls => self.slots.show_controls(),
                Effect::Redraw => {
                    if let Err(e) = self.draw() {
                        console::error_2(&"cropper: draw failed".into(), &e);
                    }
                }
            }
        }

        if let Some(cursor) = reaction.cursor {
            self.slots.set_cursor(cursor.css());
        }

        if let Some(event) = reaction.event {
            self.push(&event);
        }
    }

    fn push(&self, event: &OutboundEvent) {
        let result = outbound_payload(event).and_then(|payload| {
            self.push_event
                .call2(&JsValue::NULL, &JsValue::from_str(event.name()), &payload)
        });
        if let Err(e) = result {
            console::error_2(&format!("cropper: failed to push {}", event.name()).into(), &e);
        }
    }

    fn draw(&self) -> Result<(), JsValue> {
        let Some(frame) = self.session.borrow().render() else {
            return Ok(());
        };

        let canvas = &self.slots.canvas;
        if canvas.width() != frame.width {
            canvas.set_width(frame.width);
        }
        if canvas.height() != frame.height {
            canvas.set_height(frame.height);
        }

        let data =
            ImageData::new_with_u8_clamped_array_and_sh(Clamped(&frame.pixels[..]), frame.width, frame.height)?;
        self.slots.context.put_image_data(&data, 0.0, 0.0)
    }

    fn on_commit(&self) {
        let result = self.session.borrow().commit();
        match result {
            Ok(reaction) => self.apply(reaction),
            Err(e) => console::warn_1(&format!("cropper: export failed: {}", e).into()),
        }
    }

    fn on_pointer_down(&self, p: Point) {
        let reaction = self.session.borrow_mut().pointer_down(p);
        self.apply(reaction);
    }

    fn on_pointer_move(&self, p: Point) {
        let reaction = self.session.borrow_mut().pointer_move(p);
        self.apply(reaction);
    }

    fn on_pointer_up(&self, p: Option<Point>) {
        let reaction = self.session.borrow_mut().pointer_up(p);
        self.apply(reaction);
    }

    fn mouse_point(&self, event: &Event) -> Option<Point> {
        event
            .dyn_ref::<MouseEvent>()
            .map(|e| self.slots.canvas_point(e.client_x() as f64, e.client_y() as f64))
    }

    /// First active touch, as `touches[0]`.
    fn touch_point(&self, event: &Event) -> Option<Point> {
        event
            .dyn_ref::<TouchEvent>()
            .and_then(|e| e.touches().get(0))
            .map(|t| self.slots.canvas_point(t.client_x() as f64, t.client_y() as f64))
    }
}

fn on_file_selected(inner: &Rc<Inner>) {
    let Some(file) = inner
        .slots
        .input
        .as_ref()
        .and_then(|input| input.files())
        .and_then(|files| files.get(0))
    else {
        return;
    };

    let Some(ticket) = inner.session.borrow_mut().begin_load(&file.type_()) else {
        return;
    };

    let inner = Rc::clone(inner);
    wasm_bindgen_futures::spawn_local(async move {
        let buffer = match JsFuture::from(file.array_buffer()).await {
            Ok(buffer) => buffer,
            Err(e) => {
                console::error_2(&"cropper: failed to read file".into(), &e);
                return;
            }
        };
        let bytes = Uint8Array::new(&buffer).to_vec();
        let width = inner.slots.container.client_width() as f64;

        let reaction = inner.session.borrow_mut().finish_load(ticket, &bytes, width);
        inner.apply(reaction);
    });
}

/// A crop selector mounted on a DOM subtree.
#[wasm_bindgen]
pub struct CropperWidget {
    inner: Rc<Inner>,
    subscriptions: Vec<EventSubscription>,
}

#[wasm_bindgen]
impl CropperWidget {
    /// Mount on `root`.
    ///
    /// `push_event(name, payload)` receives `image_loaded` and `image_cropped`.
    /// `config` may be `undefined` or a partial config object.
    ///
    /// # Errors
    ///
    /// Fails if `root` has no `[data-crop-canvas]` element, if the canvas has
    /// no 2d context, or if `config` is malformed.
    pub fn mount(root: &Element, push_event: Function, config: JsValue) -> Result<CropperWidget, JsValue> {
        let config = parse_config(config)?;
        let slots = Slots::query(root)?;
        slots.clear_file_input();

        let inner = Rc::new(Inner {
            session: RefCell::new(CropSession::new(config)),
            slots,
            push_event,
        });

        let subscriptions = subscribe(&inner)?;
        Ok(CropperWidget {
            inner,
            subscriptions,
        })
    }

    /// Dispatch a named host event (`reset_file_input`, `change_aspect_ratio`).
    pub fn handle_event(&self, name: &str, payload: JsValue) -> Result<(), JsValue> {
        let event = parse_inbound(name, &payload)?;
        let reaction = self.inner.session.borrow_mut().dispatch(event);
        self.inner.apply(reaction);
        Ok(())
    }

    /// Remove every listener and close the session. The widget is inert
    /// afterwards, and a file read still in flight is dropped when it lands.
    pub fn destroy(&mut self) {
        self.subscriptions.clear();
        self.inner.session.borrow_mut().close();
    }

    /// Number of listeners currently installed.
    #[wasm_bindgen(getter)]
    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }
}

fn subscribe(inner: &Rc<Inner>) -> Result<Vec<EventSubscription>, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("cropper: no window"))?;
    let canvas = &inner.slots.canvas;
    let mut subscriptions = Vec::with_capacity(9);

    if let Some(input) = &inner.slots.input {
        let inner = Rc::clone(inner);
        subscriptions.push(EventSubscription::new(input, "change", move |_| {
            on_file_selected(&inner)
        })?);
    }

    if let Some(button) = &inner.slots.button {
        let inner = Rc::clone(inner);
        subscriptions.push(EventSubscription::new(button, "click", move |_| inner.on_commit())?);
    }

    let i = Rc::clone(inner);
    subscriptions.push(EventSubscription::new(canvas, "mousedown", move |e| {
        e.prevent_default();
        if let Some(p) = i.mouse_point(&e) {
            i.on_pointer_down(p);
        }
    })?);

    // Drag continues outside the canvas, so moves and releases are tracked on window
    let i = Rc::clone(inner);
    subscriptions.push(EventSubscription::new(&window, "mousemove", move |e| {
        if let Some(p) = i.mouse_point(&e) {
            i.on_pointer_move(p);
        }
    })?);

    let i = Rc::clone(inner);
    subscriptions.push(EventSubscription::new(&window, "mouseup", move |e| {
        i.on_pointer_up(i.mouse_point(&e));
    })?);

    let i = Rc::clone(inner);
    subscriptions.push(EventSubscription::active(canvas, "touchstart", move |e| {
        e.prevent_default();
        if let Some(p) = i.touch_point(&e) {
            i.on_pointer_down(p);
        }
    })?);

    let i = Rc::clone(inner);
    subscriptions.push(EventSubscription::active(canvas, "touchmove", move |e| {
        e.prevent_default();
        if let Some(p) = i.touch_point(&e) {
            i.on_pointer_move(p);
        }
    })?);

    let i = Rc::clone(inner);
    subscriptions.push(EventSubscription::active(canvas, "touchend", move |e| {
        e.prevent_default();
        i.on_pointer_up(None);
    })?);

    Ok(subscriptions)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use std::cell::RefCell;
    use wasm_bindgen_test::*;
    use web_sys::Document;

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        web_sys::window().and_then(|w| w.document()).unwrap()
    }

    fn root_with(markup: &str) -> Element {
        let root = document().create_element("div").unwrap();
        root.set_inner_html(markup);
        root
    }

    fn noop_push() -> Function {
        Function::new_with_args("name, payload", "")
    }

    #[wasm_bindgen_test]
    fn test_mount_without_canvas_fails() {
        let root = root_with(r#"<input type="file" data-image-input>"#);
        assert!(CropperWidget::mount(&root, noop_push(), JsValue::UNDEFINED).is_err());
    }

    #[wasm_bindgen_test]
    fn test_mount_and_destroy() {
        let root = root_with(
            r#"<div data-cropper-container>
                 <input type="file" data-image-input>
                 <canvas data-crop-canvas class="hidden"></canvas>
                 <button data-crop-button>Crop</button>
               </div>"#,
        );
        let mut widget = CropperWidget::mount(&root, noop_push(), JsValue::UNDEFINED).unwrap();
        assert_eq!(widget.listener_count(), 8);

        widget.destroy();
        assert_eq!(widget.listener_count(), 0);
        assert!(widget.inner.session.borrow().is_closed());
    }

    #[wasm_bindgen_test]
    fn test_commit_before_load_pushes_nothing() {
        let root = root_with(r#"<canvas data-crop-canvas></canvas><button data-crop-button></button>"#);
        let pushed = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&pushed);
        let push = Closure::<dyn FnMut(JsValue, JsValue)>::new(move |_, _| {
            *counter.borrow_mut() += 1;
        });
        let push: Function = push.into_js_value().unchecked_into();

        let _widget = CropperWidget::mount(&root, push, JsValue::UNDEFINED).unwrap();
        let button: web_sys::HtmlElement = root
            .query_selector("[data-crop-button]")
            .unwrap()
            .unwrap()
            .unchecked_into();
        button.click();
        assert_eq!(*pushed.borrow(), 0);
    }

    fn cancelable(event_type: &str) -> Event {
        let init = web_sys::EventInit::new();
        init.set_cancelable(true);
        Event::new_with_event_init_dict(event_type, &init).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_canvas_presses_cancel_default_action() {
        let root = root_with(r#"<canvas data-crop-canvas></canvas>"#);
        let _widget = CropperWidget::mount(&root, noop_push(), JsValue::UNDEFINED).unwrap();
        let canvas = root.query_selector("[data-crop-canvas]").unwrap().unwrap();

        for event_type in ["mousedown", "touchend"] {
            let event = cancelable(event_type);
            canvas.dispatch_event(&event).unwrap();
            assert!(event.default_prevented(), "{event_type}");
        }
    }

    #[wasm_bindgen_test]
    fn test_handle_event_rejects_unknown() {
        let root = root_with(r#"<canvas data-crop-canvas></canvas>"#);
        let widget = CropperWidget::mount(&root, noop_push(), JsValue::UNDEFINED).unwrap();
        assert!(widget.handle_event("notify", JsValue::UNDEFINED).is_err());
        assert!(widget
            .handle_event("reset_file_input", JsValue::UNDEFINED)
            .is_ok());
    }
}
