//! Traits the engine uses to talk to a document platform.
//!
//! The engine is written once against these traits. Each platform ("web"
//! through `web-sys`, "ssr" in memory) supplies the concrete types.
use crate::Error;

/// Read access to an element's attributes.
pub trait ViewProperties {
    fn has_property(&self, key: impl AsRef<str>) -> bool;
    fn get_property(&self, key: impl AsRef<str>) -> Option<String>;
}

/// Any node: a document, an element or text.
pub trait ViewNode<V: View>: Clone + 'static {
    /// The node as an element, if it is one.
    fn as_element(&self) -> Option<V::Element>;

    /// All descendants carrying `attribute`, in document order.
    ///
    /// The node itself is never included.
    fn query_with_attribute(&self, attribute: &str) -> Result<Vec<V::Element>, Error>;
}

/// Where [`ViewElement::insert_adjacent`] puts new content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdjacentPosition {
    /// Before the element's first child.
    AfterBegin,
    /// After the element's last child.
    BeforeEnd,
}

impl AdjacentPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjacentPosition::AfterBegin => "afterbegin",
            AdjacentPosition::BeforeEnd => "beforeend",
        }
    }
}

pub trait ViewElement<V: View>: ViewProperties + Clone + PartialEq + 'static {
    /// A process-unique identity for this element, stable for its lifetime.
    fn key(&self) -> usize;

    fn as_node(&self) -> V::Node;

    /// Whether the element is currently part of a document.
    fn is_connected(&self) -> bool;

    /// Whether the element is structurally a form.
    fn is_form(&self) -> bool;

    /// The form's current successful fields as name/value pairs.
    ///
    /// Empty for anything that is not a form.
    fn form_fields(&self) -> Vec<(String, String)>;

    /// Replace the element's content with raw `html`.
    fn replace_inner(&self, html: &str) -> Result<(), Error>;

    /// Replace the element itself with raw `html`.
    ///
    /// Does nothing when the element has no parent.
    fn replace_outer(&self, html: &str) -> Result<(), Error>;

    /// Insert raw `html` next to the element's existing content.
    fn insert_adjacent(&self, position: AdjacentPosition, html: &str) -> Result<(), Error>;

    /// Call `handler` every time `event_name` fires on this element.
    ///
    /// Dropping the returned listener detaches it.
    fn listen(&self, event_name: &str, handler: impl FnMut(V::Event) + 'static) -> V::Listener;
}

/// What an observer reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObserveOptions {
    pub child_list: bool,
    pub subtree: bool,
    pub attributes: bool,
}

impl ObserveOptions {
    /// Structural and attribute changes anywhere below the observed node.
    pub const WATCH: ObserveOptions = ObserveOptions {
        child_list: true,
        subtree: true,
        attributes: true,
    };
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    Attributes { name: Option<String> },
    CharacterData,
}

/// One reported change.
pub struct MutationRecord<V: View> {
    pub kind: MutationKind,
    pub target: V::Node,
    pub added: Vec<V::Node>,
    pub removed: Vec<V::Node>,
}

impl<V: View> Clone for MutationRecord<V> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            target: self.target.clone(),
            added: self.added.clone(),
            removed: self.removed.clone(),
        }
    }
}

/// A subscription to batches of structural changes.
pub trait ViewObserver<V: View>: 'static {
    /// The next batch, or `None` once the document is gone.
    fn next(&self) -> impl Future<Output = Option<Vec<MutationRecord<V>>>>;
}

pub trait ViewDocument<V: View>: Clone + 'static {
    fn as_node(&self) -> V::Node;

    fn element_by_id(&self, id: &str) -> Option<V::Element>;

    /// A snapshot of the elements with `class`, in document order.
    fn elements_by_class_name(&self, class: &str) -> Vec<V::Element>;

    /// Start observing the whole document.
    fn observe(&self, options: ObserveOptions) -> Result<V::Observer, Error>;

    /// Run `f` once the document's content is parsed.
    ///
    /// Runs `f` immediately if that has already happened.
    fn on_ready(&self, f: impl FnOnce() + 'static);
}

pub trait ViewEvent: Clone + 'static {
    /// The stand-in event handed to actions run by the immediate trigger.
    fn placeholder() -> Self;
    fn prevent_default(&self);
    fn stop_propagation(&self);
}

/// A document platform.
pub trait View: Sized + 'static {
    type Document: ViewDocument<Self>;
    type Node: ViewNode<Self>;
    type Element: ViewElement<Self>;
    type Event: ViewEvent;
    type Listener: 'static;
    type Observer: ViewObserver<Self>;
}

/// Name of the placeholder event.
pub const PLACEHOLDER_EVENT: &str = "__dummy__";
