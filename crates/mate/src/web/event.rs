//! Event listeners that detach themselves.
use wasm_bindgen::{JsCast, prelude::Closure};

/// A callback registered on an event target.
///
/// The callback stays registered until the listener is dropped.
pub struct WebListener {
    /// Where the callback is registered.
    target: web_sys::EventTarget,
    /// What the callback is registered for.
    event_name: String,
    /// Unregistered and freed on drop.
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl Drop for WebListener {
    fn drop(&mut self) {
        if let Err(err) = self.target.remove_event_listener_with_callback(
            &self.event_name,
            self.callback.as_ref().unchecked_ref(),
        ) {
            log::error!("could not remove {} listener: {err:?}", self.event_name);
        } else {
            log::trace!("dropping listener for {}", self.event_name);
        }
    }
}

impl WebListener {
    pub fn new(
        target: impl AsRef<web_sys::EventTarget>,
        event_name: impl Into<String>,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Self {
        let event_name = event_name.into();
        let callback =
            Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
        let target = target.as_ref().clone();
        if let Err(err) = target
            .add_event_listener_with_callback(&event_name, callback.as_ref().unchecked_ref())
        {
            log::error!("could not add {event_name} listener: {err:?}");
        }
        Self {
            target,
            event_name,
            callback,
        }
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }
}
