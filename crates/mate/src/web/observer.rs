//! Mutation observation through `MutationObserver`.
use wasm_bindgen::{JsCast, prelude::Closure};

use super::{Web, platform};
use crate::{
    Error,
    view::{MutationKind, MutationRecord, ObserveOptions, ViewObserver},
};

type Batch = Vec<MutationRecord<Web>>;

/// Batches of changes reported by a `MutationObserver`.
///
/// Disconnects when dropped.
pub struct WebObserver {
    observer: web_sys::MutationObserver,
    rx: async_channel::Receiver<Batch>,
    _callback: Closure<dyn FnMut(js_sys::Array, web_sys::MutationObserver)>,
}

impl Drop for WebObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

impl ViewObserver<Web> for WebObserver {
    async fn next(&self) -> Option<Batch> {
        self.rx.recv().await.ok()
    }
}

fn nodes(list: web_sys::NodeList) -> Vec<web_sys::Node> {
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

fn convert(record: web_sys::MutationRecord) -> Option<MutationRecord<Web>> {
    let kind = match record.type_().as_str() {
        "childList" => MutationKind::ChildList,
        "attributes" => MutationKind::Attributes {
            name: record.attribute_name(),
        },
        _ => MutationKind::CharacterData,
    };
    Some(MutationRecord {
        kind,
        target: record.target()?,
        added: nodes(record.added_nodes()),
        removed: nodes(record.removed_nodes()),
    })
}

impl WebObserver {
    pub fn new(target: &web_sys::Node, options: ObserveOptions) -> Result<Self, Error> {
        let (tx, rx) = async_channel::unbounded();
        let callback = Closure::<dyn FnMut(js_sys::Array, web_sys::MutationObserver)>::new(
            move |records: js_sys::Array, _: web_sys::MutationObserver| {
                let batch = records
                    .iter()
                    .filter_map(|record| convert(record.unchecked_into()))
                    .collect::<Vec<_>>();
                if tx.try_send(batch).is_err() {
                    log::trace!("mutation batch dropped, nobody is watching");
                }
            },
        );
        let observer = web_sys::MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(platform)?;
        let init = web_sys::MutationObserverInit::new();
        init.set_child_list(options.child_list);
        init.set_subtree(options.subtree);
        init.set_attributes(options.attributes);
        observer
            .observe_with_options(target, &init)
            .map_err(platform)?;
        Ok(WebObserver {
            observer,
            rx,
            _callback: callback,
        })
    }
}
