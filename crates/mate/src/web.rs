//! The browser platform, through `web-sys`.
use std::cell::Cell;

use futures::{
    future::LocalFutureObj,
    task::{LocalSpawn, SpawnError},
};
use snafu::OptionExt;
use wasm_bindgen::{JsCast, JsValue, UnwrapThrowExt, prelude::Closure};

use crate::{
    Error, Mate,
    controller::ControllerRegistry,
    error::PlatformSnafu,
    view::*,
};

pub mod event;
pub mod fetch;
pub mod observer;

pub use event::WebListener;
pub use fetch::Fetch;
pub use observer::WebObserver;

pub mod prelude {
    pub use super::{Fetch, Web, WebListener, WebObserver, WebSpawner, start};
}

pub(crate) fn platform(err: JsValue) -> Error {
    Error::Platform {
        message: format!("{err:?}"),
    }
}

/// Returns the global window.
pub fn window() -> Result<web_sys::Window, Error> {
    web_sys::window().context(PlatformSnafu {
        message: "no global window",
    })
}

/// Returns the window's document.
pub fn document() -> Result<web_sys::Document, Error> {
    window()?.document().context(PlatformSnafu {
        message: "window has no document",
    })
}

/// Spawns tasks onto the browser's microtask queue.
#[derive(Clone, Copy, Debug, Default)]
pub struct WebSpawner;

impl LocalSpawn for WebSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

const KEY_PROPERTY: &str = "__mateKey";

thread_local! {
    static NEXT_KEY: Cell<usize> = const { Cell::new(1) };
}

impl ViewNode<Web> for web_sys::Node {
    fn as_element(&self) -> Option<web_sys::Element> {
        self.dyn_ref::<web_sys::Element>().cloned()
    }

    fn query_with_attribute(&self, attribute: &str) -> Result<Vec<web_sys::Element>, Error> {
        let selector = format!("[{attribute}]");
        let list = if let Some(element) = self.dyn_ref::<web_sys::Element>() {
            element.query_selector_all(&selector)
        } else if let Some(document) = self.dyn_ref::<web_sys::Document>() {
            document.query_selector_all(&selector)
        } else if let Some(fragment) = self.dyn_ref::<web_sys::DocumentFragment>() {
            fragment.query_selector_all(&selector)
        } else {
            return Ok(vec![]);
        };
        let list = list.map_err(platform)?;
        Ok((0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .collect())
    }
}

impl ViewProperties for web_sys::Element {
    fn has_property(&self, key: impl AsRef<str>) -> bool {
        self.has_attribute(key.as_ref())
    }

    fn get_property(&self, key: impl AsRef<str>) -> Option<String> {
        self.get_attribute(key.as_ref())
    }
}

impl ViewElement<Web> for web_sys::Element {
    fn key(&self) -> usize {
        let property = JsValue::from_str(KEY_PROPERTY);
        if let Some(key) = js_sys::Reflect::get(self, &property)
            .ok()
            .and_then(|value| value.as_f64())
        {
            return key as usize;
        }
        let key = NEXT_KEY.with(|next| {
            let key = next.get();
            next.set(key + 1);
            key
        });
        if let Err(err) = js_sys::Reflect::set(self, &property, &JsValue::from_f64(key as f64)) {
            log::error!("could not store element key: {err:?}");
        }
        key
    }

    fn as_node(&self) -> web_sys::Node {
        web_sys::Node::from(self.clone())
    }

    fn is_connected(&self) -> bool {
        web_sys::Node::is_connected(self)
    }

    fn is_form(&self) -> bool {
        self.dyn_ref::<web_sys::HtmlFormElement>().is_some()
    }

    fn form_fields(&self) -> Vec<(String, String)> {
        let Some(form) = self.dyn_ref::<web_sys::HtmlFormElement>() else {
            return vec![];
        };
        let Ok(data) = web_sys::FormData::new_with_form(form) else {
            return vec![];
        };
        let Ok(Some(entries)) = js_sys::try_iter(&data) else {
            return vec![];
        };
        entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let pair: js_sys::Array = entry.unchecked_into();
                // files have no string value and are skipped
                Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
            })
            .collect()
    }

    fn replace_inner(&self, html: &str) -> Result<(), Error> {
        self.set_inner_html(html);
        Ok(())
    }

    fn replace_outer(&self, html: &str) -> Result<(), Error> {
        if self.parent_node().is_none() {
            log::trace!("outer replacement of a detached element");
            return Ok(());
        }
        self.insert_adjacent_html("beforebegin", html)
            .map_err(platform)?;
        self.remove();
        Ok(())
    }

    fn insert_adjacent(&self, position: AdjacentPosition, html: &str) -> Result<(), Error> {
        self.insert_adjacent_html(position.as_str(), html)
            .map_err(platform)
    }

    fn listen(&self, event_name: &str, handler: impl FnMut(web_sys::Event) + 'static) -> WebListener {
        WebListener::new(self, event_name, handler)
    }
}

impl ViewDocument<Web> for web_sys::Document {
    fn as_node(&self) -> web_sys::Node {
        web_sys::Node::from(self.clone())
    }

    fn element_by_id(&self, id: &str) -> Option<web_sys::Element> {
        self.get_element_by_id(id)
    }

    fn elements_by_class_name(&self, class: &str) -> Vec<web_sys::Element> {
        let live = self.get_elements_by_class_name(class);
        (0..live.length()).filter_map(|i| live.item(i)).collect()
    }

    fn observe(&self, options: ObserveOptions) -> Result<WebObserver, Error> {
        WebObserver::new(self, options)
    }

    fn on_ready(&self, f: impl FnOnce() + 'static) {
        if self.ready_state() != web_sys::DocumentReadyState::Loading {
            f();
            return;
        }
        let callback = Closure::once_into_js(f);
        if let Err(err) =
            self.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
        {
            log::error!("could not wait for the document: {err:?}");
        }
    }
}

impl ViewEvent for web_sys::Event {
    fn placeholder() -> Self {
        web_sys::Event::new(PLACEHOLDER_EVENT).unwrap_throw()
    }

    fn prevent_default(&self) {
        web_sys::Event::prevent_default(self);
    }

    fn stop_propagation(&self) {
        web_sys::Event::stop_propagation(self);
    }
}

/// The browser platform.
#[derive(Clone, Copy, Debug)]
pub struct Web;

impl View for Web {
    type Document = web_sys::Document;
    type Node = web_sys::Node;
    type Element = web_sys::Element;
    type Event = web_sys::Event;
    type Listener = WebListener;
    type Observer = WebObserver;
}

/// Bind the global document with `controllers` once it is ready, and keep
/// binding whatever is inserted into it.
pub fn start(controllers: ControllerRegistry<Web>) -> Result<Mate<Web>, Error> {
    let mate = Mate::builder(document()?, Fetch, WebSpawner)
        .with_controllers(controllers)
        .build();
    mate.start();
    Ok(mate)
}
