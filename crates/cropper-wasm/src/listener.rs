//! Owned DOM event listeners.
//!
//! An [`EventSubscription`] keeps its closure alive for as long as the
//! listener is registered, and unregisters it when dropped. Dropping every
//! subscription of a widget leaves no handlers behind on shared targets such
//! as `window`.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Event, EventTarget};

pub struct EventSubscription {
    target: EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl EventSubscription {
    /// Register `handler` for `event_type` on `target`.
    pub fn new<F>(target: &EventTarget, event_type: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(event_type, callback.as_ref().unchecked_ref())?;

        Ok(Self {
            target: target.clone(),
            event_type,
            callback,
        })
    }

    /// Like [`EventSubscription::new`], but registered as non-passive so the
    /// handler may call `prevent_default` (needed for touch events).
    pub fn active<F>(target: &EventTarget, event_type: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            event_type,
            callback.as_ref().unchecked_ref(),
            &options,
        )?;

        Ok(Self {
            target: target.clone(),
            event_type,
            callback,
        })
    }

    pub fn event_type(&self) -> &'static str {
        self.event_type
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        // Removal only fails for a detached target, which has no listeners left
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event_type, self.callback.as_ref().unchecked_ref());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn target() -> EventTarget {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.create_element("div").ok())
            .map(EventTarget::from)
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn test_listener_fires_until_dropped() {
        let target = target();
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();

        let subscription = EventSubscription::new(&target, "ping", move |_| {
            counter.set(counter.get() + 1);
        })
        .unwrap();
        assert_eq!(subscription.event_type(), "ping");

        let event = Event::new("ping").unwrap();
        target.dispatch_event(&event).unwrap();
        assert_eq!(count.get(), 1);

        drop(subscription);
        target.dispatch_event(&event).unwrap();
        assert_eq!(count.get(), 1);
    }
}
