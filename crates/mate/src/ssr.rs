//! An in-memory document for server-side rendering and native tests.
//!
//! Nodes are shared handles: cloning an [`SsrElement`] gives another handle to
//! the same element, and equality is identity.
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    sync::atomic::{AtomicUsize, Ordering},
};

use crate::{
    Error,
    sync::{Shared, WeakShared},
    view::*,
};

pub mod html;

pub mod prelude {
    pub use super::{Ssr, SsrDocument, SsrElement, SsrEvent, SsrNode, SsrText};
}

static NEXT_KEY: AtomicUsize = AtomicUsize::new(1);

fn next_key() -> usize {
    NEXT_KEY.fetch_add(1, Ordering::Relaxed)
}

type Callback = Rc<RefCell<dyn FnMut(SsrEvent)>>;

struct Handler {
    id: usize,
    name: String,
    callback: Callback,
}

pub(crate) struct ElementData {
    key: usize,
    pub name: String,
    pub attributes: Vec<(String, String)>,
    children: Vec<SsrNode>,
    parent: Option<WeakShared<ElementData>>,
    handlers: Vec<Handler>,
    /// Set only on a document's root.
    document: Option<WeakShared<DocumentState>>,
}

#[derive(Clone)]
pub struct SsrElement {
    pub(crate) data: Shared<ElementData>,
}

impl PartialEq for SsrElement {
    fn eq(&self, other: &Self) -> bool {
        self.data.ptr_eq(&other.data)
    }
}

impl std::fmt::Debug for SsrElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.html_string())
    }
}

pub(crate) struct TextData {
    pub text: String,
    parent: Option<WeakShared<ElementData>>,
}

#[derive(Clone)]
pub struct SsrText {
    pub(crate) data: Shared<TextData>,
}

impl PartialEq for SsrText {
    fn eq(&self, other: &Self) -> bool {
        self.data.ptr_eq(&other.data)
    }
}

impl SsrText {
    pub fn new(text: impl Into<String>) -> Self {
        SsrText {
            data: Shared::new(TextData {
                text: text.into(),
                parent: None,
            }),
        }
    }

    pub fn text(&self) -> String {
        self.data.get().text.clone()
    }

    pub fn parent(&self) -> Option<SsrElement> {
        let parent = self.data.get().parent.clone()?;
        parent.upgrade().map(|data| SsrElement { data })
    }
}

#[derive(Clone, PartialEq)]
pub enum SsrNode {
    Element(SsrElement),
    Text(SsrText),
}

impl From<SsrElement> for SsrNode {
    fn from(value: SsrElement) -> Self {
        SsrNode::Element(value)
    }
}

impl From<SsrText> for SsrNode {
    fn from(value: SsrText) -> Self {
        SsrNode::Text(value)
    }
}

impl std::fmt::Debug for SsrNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SsrNode::Element(element) => std::fmt::Debug::fmt(element, f),
            SsrNode::Text(text) => write!(f, "{:?}", text.text()),
        }
    }
}

impl SsrNode {
    fn set_parent(&self, parent: Option<WeakShared<ElementData>>) {
        match self {
            SsrNode::Element(element) => element.data.get_mut().parent = parent,
            SsrNode::Text(text) => text.data.get_mut().parent = parent,
        }
    }

    fn parent(&self) -> Option<SsrElement> {
        match self {
            SsrNode::Element(element) => element.parent(),
            SsrNode::Text(text) => text.parent(),
        }
    }

    fn text_content(&self, out: &mut String) {
        match self {
            SsrNode::Element(element) => {
                for child in element.data.get().children.iter() {
                    child.text_content(out);
                }
            }
            SsrNode::Text(text) => out.push_str(&text.data.get().text),
        }
    }
}

impl ViewNode<Ssr> for SsrNode {
    fn as_element(&self) -> Option<SsrElement> {
        match self {
            SsrNode::Element(element) if !element.is_document() => Some(element.clone()),
            _ => None,
        }
    }

    fn query_with_attribute(&self, attribute: &str) -> Result<Vec<SsrElement>, Error> {
        Ok(match self {
            SsrNode::Element(element) => {
                element.descendants(&|el: &SsrElement| el.has_property(attribute))
            }
            SsrNode::Text(_) => vec![],
        })
    }
}

impl SsrElement {
    pub fn new(name: impl Into<String>) -> Self {
        SsrElement {
            data: Shared::new(ElementData {
                key: next_key(),
                name: name.into(),
                attributes: vec![],
                children: vec![],
                parent: None,
                handlers: vec![],
                document: None,
            }),
        }
    }

    /// Parse `html` into a detached element named `name`.
    pub fn from_html(name: impl Into<String>, html: &str) -> Self {
        let element = SsrElement::new(name);
        for node in html::parse_fragment(html) {
            element.adopt(node);
        }
        element
    }

    pub fn name(&self) -> String {
        self.data.get().name.clone()
    }

    fn is_document(&self) -> bool {
        self.data.get().document.is_some()
    }

    pub fn parent(&self) -> Option<SsrElement> {
        let parent = self.data.get().parent.clone()?;
        parent.upgrade().map(|data| SsrElement { data })
    }

    pub fn children(&self) -> Vec<SsrNode> {
        self.data.get().children.clone()
    }

    pub fn element_children(&self) -> Vec<SsrElement> {
        self.data
            .get()
            .children
            .iter()
            .filter_map(|child| match child {
                SsrNode::Element(element) => Some(element.clone()),
                SsrNode::Text(_) => None,
            })
            .collect()
    }

    /// All descendants matching `predicate`, in document order.
    fn descendants(&self, predicate: &dyn Fn(&SsrElement) -> bool) -> Vec<SsrElement> {
        let mut found = vec![];
        for child in self.element_children() {
            if predicate(&child) {
                found.push(child.clone());
            }
            found.extend(child.descendants(predicate));
        }
        found
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        SsrNode::Element(self.clone()).text_content(&mut out);
        out
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        html::write_children(self, &mut out);
        out
    }

    pub fn html_string(&self) -> String {
        let mut out = String::new();
        html::write_node(&SsrNode::Element(self.clone()), false, &mut out);
        out
    }

    /// The state of the document this element is connected to.
    fn document_state(&self) -> Option<Shared<DocumentState>> {
        let mut top = self.clone();
        while let Some(parent) = top.parent() {
            top = parent;
        }
        let state = top.data.get().document.clone()?;
        state.upgrade()
    }

    /// Send `record` to the observers of this element's document.
    fn notify(&self, record: MutationRecord<Ssr>) {
        let Some(state) = self.document_state() else {
            return;
        };
        let is_root = self.is_document();
        let mut state = state.get_mut();
        state.observers.retain(|(options, tx)| {
            let wanted = (is_root || options.subtree)
                && match record.kind {
                    MutationKind::ChildList => options.child_list,
                    MutationKind::Attributes { .. } => options.attributes,
                    MutationKind::CharacterData => false,
                };
            !wanted || tx.try_send(vec![record.clone()]).is_ok()
        });
    }

    /// Attach `node` as the last child without notifying anyone.
    pub(crate) fn adopt(&self, node: SsrNode) {
        node.set_parent(Some(self.data.downgrade()));
        self.data.get_mut().children.push(node);
    }

    fn detach(node: &SsrNode) {
        if let Some(parent) = node.parent() {
            parent.remove_child(node);
        }
    }

    /// Replace the children in `range` with detached `nodes`, reporting one
    /// change.
    fn splice(&self, range: std::ops::Range<usize>, nodes: Vec<SsrNode>) {
        for node in nodes.iter() {
            node.set_parent(Some(self.data.downgrade()));
        }
        let removed = self
            .data
            .get_mut()
            .children
            .splice(range, nodes.iter().cloned())
            .collect::<Vec<_>>();
        for node in removed.iter() {
            node.set_parent(None);
        }
        if removed.is_empty() && nodes.is_empty() {
            return;
        }
        self.notify(MutationRecord {
            kind: MutationKind::ChildList,
            target: SsrNode::Element(self.clone()),
            added: nodes,
            removed,
        });
    }

    pub fn append_child(&self, node: impl Into<SsrNode>) {
        let node = node.into();
        SsrElement::detach(&node);
        let end = self.data.get().children.len();
        self.splice(end..end, vec![node]);
    }

    /// Remove `node` if it is a child. Returns whether it was.
    pub fn remove_child(&self, node: &SsrNode) -> bool {
        let index = self.data.get().children.iter().position(|child| child == node);
        match index {
            Some(index) => {
                self.splice(index..index + 1, vec![]);
                true
            }
            None => false,
        }
    }

    /// Remove this element from its parent.
    pub fn remove(&self) {
        SsrElement::detach(&SsrNode::Element(self.clone()));
    }

    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<String>) {
        let (name, value) = (name.into(), value.into());
        {
            let mut data = self.data.get_mut();
            match data.attributes.iter_mut().find(|(key, _)| *key == name) {
                Some((_, previous)) => *previous = value,
                None => data.attributes.push((name.clone(), value)),
            }
        }
        self.notify(MutationRecord {
            kind: MutationKind::Attributes { name: Some(name) },
            target: SsrNode::Element(self.clone()),
            added: vec![],
            removed: vec![],
        });
    }

    pub fn remove_attribute(&self, name: &str) {
        let removed = {
            let mut data = self.data.get_mut();
            let before = data.attributes.len();
            data.attributes.retain(|(key, _)| key != name);
            before != data.attributes.len()
        };
        if removed {
            self.notify(MutationRecord {
                kind: MutationKind::Attributes {
                    name: Some(name.to_string()),
                },
                target: SsrNode::Element(self.clone()),
                added: vec![],
                removed: vec![],
            });
        }
    }

    fn handlers_for(&self, name: &str) -> Vec<Callback> {
        self.data
            .get()
            .handlers
            .iter()
            .filter(|handler| handler.name == name)
            .map(|handler| handler.callback.clone())
            .collect()
    }

    /// Dispatch an event named `name` at this element.
    ///
    /// `click`, `submit` and `mouseover` bubble up through the ancestors until
    /// a handler stops propagation. Returns the event so callers can inspect
    /// what the handlers did with it.
    pub fn fire(&self, name: &str) -> SsrEvent {
        let event = SsrEvent::new(name);
        let bubbles = matches!(name, "click" | "submit" | "mouseover");
        let mut current = Some(self.clone());
        while let Some(element) = current {
            for callback in element.handlers_for(name) {
                (&mut *callback.borrow_mut())(event.clone());
            }
            if !bubbles || event.propagation_stopped() {
                break;
            }
            current = element.parent();
        }
        event
    }

    /// How many handlers are listening for `name` on this element.
    pub fn listener_count(&self, name: &str) -> usize {
        self.handlers_for(name).len()
    }

    fn form_field(&self, fields: &mut Vec<(String, String)>) {
        let Some(name) = self.get_property("name").filter(|name| !name.is_empty()) else {
            return;
        };
        if self.has_property("disabled") {
            return;
        }
        match self.name().as_str() {
            "input" => {
                let kind = self.get_property("type").unwrap_or_default().to_ascii_lowercase();
                match kind.as_str() {
                    "submit" | "button" | "reset" | "file" | "image" => {}
                    "checkbox" | "radio" => {
                        if self.has_property("checked") {
                            let value = self.get_property("value").unwrap_or_else(|| "on".into());
                            fields.push((name, value));
                        }
                    }
                    _ => fields.push((name, self.get_property("value").unwrap_or_default())),
                }
            }
            "textarea" => fields.push((name, self.text_content())),
            "select" => {
                let options = self.descendants(&|el: &SsrElement| el.data.get().name == "option");
                let selected = options
                    .iter()
                    .find(|option| option.has_property("selected"))
                    .or(options.first());
                if let Some(option) = selected {
                    let value = option
                        .get_property("value")
                        .unwrap_or_else(|| option.text_content().trim().to_string());
                    fields.push((name, value));
                }
            }
            _ => {}
        }
    }
}

impl ViewProperties for SsrElement {
    fn has_property(&self, key: impl AsRef<str>) -> bool {
        self.data
            .get()
            .attributes
            .iter()
            .any(|(k, _)| k == key.as_ref())
    }

    fn get_property(&self, key: impl AsRef<str>) -> Option<String> {
        self.data
            .get()
            .attributes
            .iter()
            .find(|(k, _)| k == key.as_ref())
            .map(|(_, v)| v.clone())
    }
}

impl ViewElement<Ssr> for SsrElement {
    fn key(&self) -> usize {
        self.data.get().key
    }

    fn as_node(&self) -> SsrNode {
        SsrNode::Element(self.clone())
    }

    fn is_connected(&self) -> bool {
        self.document_state().is_some()
    }

    fn is_form(&self) -> bool {
        self.data.get().name == "form"
    }

    fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![];
        if self.is_form() {
            for control in self.descendants(&|el: &SsrElement| {
                matches!(el.data.get().name.as_str(), "input" | "textarea" | "select")
            }) {
                control.form_field(&mut fields);
            }
        }
        fields
    }

    fn replace_inner(&self, html: &str) -> Result<(), Error> {
        let end = self.data.get().children.len();
        self.splice(0..end, html::parse_fragment(html));
        Ok(())
    }

    fn replace_outer(&self, html: &str) -> Result<(), Error> {
        let Some(parent) = self.parent() else {
            log::trace!("outer replacement of a detached element");
            return Ok(());
        };
        let this = SsrNode::Element(self.clone());
        let index = parent.data.get().children.iter().position(|child| *child == this);
        if let Some(index) = index {
            parent.splice(index..index + 1, html::parse_fragment(html));
        }
        Ok(())
    }

    fn insert_adjacent(&self, position: AdjacentPosition, html: &str) -> Result<(), Error> {
        let index = match position {
            AdjacentPosition::AfterBegin => 0,
            AdjacentPosition::BeforeEnd => self.data.get().children.len(),
        };
        self.splice(index..index, html::parse_fragment(html));
        Ok(())
    }

    fn listen(&self, event_name: &str, handler: impl FnMut(SsrEvent) + 'static) -> SsrListener {
        let id = next_key();
        self.data.get_mut().handlers.push(Handler {
            id,
            name: event_name.to_string(),
            callback: Rc::new(RefCell::new(handler)),
        });
        SsrListener {
            element: self.clone(),
            id,
        }
    }
}

/// Detaches its handler when dropped.
pub struct SsrListener {
    element: SsrElement,
    id: usize,
}

impl Drop for SsrListener {
    fn drop(&mut self) {
        let id = self.id;
        self.element.data.get_mut().handlers.retain(|handler| handler.id != id);
    }
}

#[derive(Default)]
struct EventState {
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

#[derive(Clone)]
pub struct SsrEvent {
    name: Rc<str>,
    state: Rc<EventState>,
}

impl SsrEvent {
    pub fn new(name: &str) -> Self {
        SsrEvent {
            name: name.into(),
            state: Default::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_prevented(&self) -> bool {
        self.state.default_prevented.get()
    }

    pub fn propagation_stopped(&self) -> bool {
        self.state.propagation_stopped.get()
    }
}

impl ViewEvent for SsrEvent {
    fn placeholder() -> Self {
        SsrEvent::new(PLACEHOLDER_EVENT)
    }

    fn prevent_default(&self) {
        self.state.default_prevented.set(true);
    }

    fn stop_propagation(&self) {
        self.state.propagation_stopped.set(true);
    }
}

/// Receives batches of changes made to a document.
pub struct SsrObserver {
    rx: async_channel::Receiver<Vec<MutationRecord<Ssr>>>,
}

impl ViewObserver<Ssr> for SsrObserver {
    async fn next(&self) -> Option<Vec<MutationRecord<Ssr>>> {
        self.rx.recv().await.ok()
    }
}

type Observers = Vec<(ObserveOptions, async_channel::Sender<Vec<MutationRecord<Ssr>>>)>;

#[derive(Default)]
struct DocumentState {
    ready: bool,
    on_ready: Vec<Box<dyn FnOnce()>>,
    observers: Observers,
}

/// An in-memory document.
///
/// The document starts out loading. Call [`SsrDocument::content_loaded`] to
/// mark it parsed, which runs anything waiting on it.
#[derive(Clone)]
pub struct SsrDocument {
    root: SsrElement,
    state: Shared<DocumentState>,
}

impl Default for SsrDocument {
    fn default() -> Self {
        let state = Shared::new(DocumentState::default());
        let root = SsrElement::new("#document");
        root.data.get_mut().document = Some(state.downgrade());
        SsrDocument { root, state }
    }
}

impl SsrDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document whose content is `html`.
    pub fn from_html(html: &str) -> Self {
        let document = SsrDocument::default();
        for node in html::parse_fragment(html) {
            document.root.adopt(node);
        }
        document
    }

    /// The document node. It holds the top-level content.
    pub fn root(&self) -> SsrElement {
        self.root.clone()
    }

    pub fn is_ready(&self) -> bool {
        self.state.get().ready
    }

    /// Mark the content as parsed and run the waiting callbacks.
    pub fn content_loaded(&self) {
        let callbacks = {
            let mut state = self.state.get_mut();
            if state.ready {
                return;
            }
            state.ready = true;
            std::mem::take(&mut state.on_ready)
        };
        log::debug!("content loaded, running {} callbacks", callbacks.len());
        for callback in callbacks {
            callback();
        }
    }

    pub fn html_string(&self) -> String {
        self.root.inner_html()
    }
}

impl ViewDocument<Ssr> for SsrDocument {
    fn as_node(&self) -> SsrNode {
        SsrNode::Element(self.root.clone())
    }

    fn element_by_id(&self, id: &str) -> Option<SsrElement> {
        self.root
            .descendants(&|el: &SsrElement| el.get_property("id").as_deref() == Some(id))
            .into_iter()
            .next()
    }

    fn elements_by_class_name(&self, class: &str) -> Vec<SsrElement> {
        self.root.descendants(&|el: &SsrElement| {
            el.get_property("class")
                .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
        })
    }

    fn observe(&self, options: ObserveOptions) -> Result<SsrObserver, Error> {
        let (tx, rx) = async_channel::unbounded();
        self.state.get_mut().observers.push((options, tx));
        Ok(SsrObserver { rx })
    }

    fn on_ready(&self, f: impl FnOnce() + 'static) {
        if self.is_ready() {
            f();
        } else {
            self.state.get_mut().on_ready.push(Box::new(f));
        }
    }
}

/// The in-memory platform.
#[derive(Clone, Copy, Debug)]
pub struct Ssr;

impl View for Ssr {
    type Document = SsrDocument;
    type Node = SsrNode;
    type Element = SsrElement;
    type Event = SsrEvent;
    type Listener = SsrListener;
    type Observer = SsrObserver;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn queries_in_document_order() {
        let doc = SsrDocument::from_html(
            r#"<div mt-on="a"><p mt-on="b"></p></div><span mt-on="c"></span><i></i>"#,
        );
        let found = doc.as_node().query_with_attribute("mt-on").unwrap();
        let values = found
            .iter()
            .map(|el| el.get_property("mt-on").unwrap())
            .collect::<Vec<_>>();
        assert_eq!(values, ["a", "b", "c"]);
        assert!(doc.as_node().as_element().is_none());
    }

    #[test]
    fn connection_follows_the_tree() {
        let doc = SsrDocument::from_html(r#"<div id="a"><p id="b"></p></div>"#);
        let b = doc.element_by_id("b").unwrap();
        assert!(b.is_connected());
        doc.element_by_id("a").unwrap().remove();
        assert!(!b.is_connected());
        assert!(doc.element_by_id("b").is_none());
        assert!(!SsrElement::new("div").is_connected());
    }

    #[test]
    fn content_replacement() {
        let doc = SsrDocument::from_html(r#"<div id="a"><span>existing</span></div>"#);
        let a = doc.element_by_id("a").unwrap();
        a.insert_adjacent(AdjacentPosition::BeforeEnd, "<p>end</p>").unwrap();
        a.insert_adjacent(AdjacentPosition::AfterBegin, "<p>start</p>").unwrap();
        assert_eq!(a.inner_html(), "<p>start</p><span>existing</span><p>end</p>");
        a.replace_inner("<b>new</b>").unwrap();
        assert_eq!(a.inner_html(), "<b>new</b>");
        a.replace_outer("<em>gone</em>").unwrap();
        assert_eq!(doc.html_string(), "<em>gone</em>");
        assert!(!a.is_connected());
        // detached elements have nothing to replace
        a.replace_outer("<em>again</em>").unwrap();
        assert_eq!(a.html_string(), r#"<div id="a"><b>new</b></div>"#);
    }

    #[test]
    fn class_lookup_is_a_snapshot() {
        let doc = SsrDocument::from_html(
            r#"<p class="row x">1</p><p class="rows">2</p><p class="x row">3</p>"#,
        );
        let rows = doc.elements_by_class_name("row");
        assert_eq!(rows.len(), 2);
        for row in rows.iter() {
            row.replace_outer(r#"<p class="row">new</p>"#).unwrap();
        }
        assert_eq!(doc.elements_by_class_name("row").len(), 2);
        assert!(doc.elements_by_class_name("").is_empty());
    }

    #[test]
    fn events_bubble_until_stopped() {
        let doc = SsrDocument::from_html(r#"<div id="outer"><button id="inner"></button></div>"#);
        let outer = doc.element_by_id("outer").unwrap();
        let inner = doc.element_by_id("inner").unwrap();
        let hits = Shared::new(vec![]);
        let _outer_listener = outer.listen("click", {
            let hits = hits.clone();
            move |_| hits.get_mut().push("outer")
        });
        let inner_listener = inner.listen("click", {
            let hits = hits.clone();
            move |ev: SsrEvent| {
                hits.get_mut().push("inner");
                ev.stop_propagation();
            }
        });
        let event = inner.fire("click");
        assert!(event.propagation_stopped());
        assert_eq!(*hits.get(), ["inner"]);

        drop(inner_listener);
        assert_eq!(inner.listener_count("click"), 0);
        inner.fire("click");
        assert_eq!(*hits.get(), ["inner", "outer"]);

        inner.fire("mouseenter");
        assert_eq!(hits.get().len(), 2);
    }

    #[test]
    fn observers_see_connected_changes() {
        let doc = SsrDocument::from_html(r#"<div id="a"></div>"#);
        let observer = doc.observe(ObserveOptions::WATCH).unwrap();
        let a = doc.element_by_id("a").unwrap();
        a.append_child(SsrElement::new("p"));
        a.set_attribute("class", "busy");
        // detached elements report nothing
        SsrElement::new("div").append_child(SsrElement::new("p"));

        futures_lite::future::block_on(async {
            let batch = observer.next().await.unwrap();
            assert_eq!(batch.len(), 1);
            assert_eq!(batch[0].kind, MutationKind::ChildList);
            assert_eq!(batch[0].target, a.as_node());
            assert_eq!(batch[0].added.len(), 1);

            let batch = observer.next().await.unwrap();
            assert_eq!(
                batch[0].kind,
                MutationKind::Attributes {
                    name: Some("class".into())
                }
            );
        });
        assert!(observer.rx.is_empty());
    }

    #[test]
    fn ready_callbacks_wait_for_content() {
        let doc = SsrDocument::from_html("<p></p>");
        let ran = Shared::new(0);
        doc.on_ready({
            let ran = ran.clone();
            move || *ran.get_mut() += 1
        });
        assert_eq!(*ran.get(), 0);
        doc.content_loaded();
        doc.content_loaded();
        assert_eq!(*ran.get(), 1);
        doc.on_ready({
            let ran = ran.clone();
            move || *ran.get_mut() += 1
        });
        assert_eq!(*ran.get(), 2);
    }

    #[test]
    fn form_fields() {
        let doc = SsrDocument::from_html(
            r#"<form id="f">
                <input name="user" value="ada">
                <input name="empty">
                <input type="checkbox" name="remember" checked>
                <input type="checkbox" name="unchecked" value="no">
                <input type="radio" name="lang" value="en">
                <input type="radio" name="lang" value="fr" checked>
                <input type="submit" name="go" value="Go">
                <input name="off" value="x" disabled>
                <input value="anonymous">
                <textarea name="bio">hello</textarea>
                <select name="color"><option>red</option><option value="b" selected>blue</option></select>
                <select name="size"><option> small </option><option>large</option></select>
            </form><div id="d"><input name="x" value="y"></div>"#,
        );
        let fields = doc.element_by_id("f").unwrap().form_fields();
        let expected = [
            ("user", "ada"),
            ("empty", ""),
            ("remember", "on"),
            ("lang", "fr"),
            ("bio", "hello"),
            ("color", "b"),
            ("size", "small"),
        ]
        .map(|(k, v)| (k.to_string(), v.to_string()));
        assert_eq!(fields, expected);
        assert!(doc.element_by_id("d").unwrap().form_fields().is_empty());
    }
}
