//! The binding engine.
//!
//! [`Mate`] walks a subtree, wires every element carrying the trigger
//! attribute and instantiates every element carrying the controller
//! attribute. Once started it watches the document and does the same for
//! every node inserted later.
use std::{
    collections::HashMap,
    rc::{Rc, Weak},
};

use futures::task::{LocalSpawn, LocalSpawnExt};
use snafu::OptionExt;

use crate::{
    Error,
    action::Action,
    attribute::Attributes,
    controller::{Controller, ControllerRegistry},
    error::{MissingAttributeSnafu, UnknownControllerSnafu},
    event::TriggerSpec,
    presenter::PresenterSpec,
    sync::Shared,
    transport::Transport,
    view::{
        MutationKind, MutationRecord, ObserveOptions, View, ViewDocument, ViewElement, ViewNode,
        ViewObserver, ViewProperties,
    },
};

/// What the engine has attached to one element.
struct Binding<V: View> {
    trigger_bound: bool,
    listener: Option<V::Listener>,
    controller: Option<(String, Rc<dyn Controller<V>>)>,
}

impl<V: View> Default for Binding<V> {
    fn default() -> Self {
        Self {
            trigger_bound: false,
            listener: None,
            controller: None,
        }
    }
}

struct Inner<V: View> {
    attributes: Attributes,
    document: V::Document,
    transport: Rc<dyn Transport>,
    controllers: ControllerRegistry<V>,
    spawner: Rc<dyn LocalSpawn>,
    bindings: Shared<HashMap<usize, Binding<V>>>,
}

/// Builds a [`Mate`].
pub struct MateBuilder<V: View> {
    attributes: Attributes,
    document: V::Document,
    transport: Rc<dyn Transport>,
    controllers: ControllerRegistry<V>,
    spawner: Rc<dyn LocalSpawn>,
}

impl<V: View> MateBuilder<V> {
    /// Read a different attribute vocabulary.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Instantiate `mt-controller` elements from `controllers`.
    pub fn with_controllers(mut self, controllers: ControllerRegistry<V>) -> Self {
        self.controllers = controllers;
        self
    }

    /// Finish building. Nothing is bound until [`Mate::bind`] or [`Mate::start`].
    pub fn build(self) -> Mate<V> {
        Mate {
            inner: Rc::new(Inner {
                attributes: self.attributes,
                document: self.document,
                transport: self.transport,
                controllers: self.controllers,
                spawner: self.spawner,
                bindings: Default::default(),
            }),
        }
    }
}

/// The binding engine for one document.
///
/// Clones are cheap and share all state.
pub struct Mate<V: View> {
    inner: Rc<Inner<V>>,
}

impl<V: View> Clone for Mate<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// A [`Mate`] that does not keep the engine alive.
pub struct WeakMate<V: View> {
    inner: Weak<Inner<V>>,
}

impl<V: View> Clone for WeakMate<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V: View> WeakMate<V> {
    /// The engine, if any strong handle is still alive.
    pub fn upgrade(&self) -> Option<Mate<V>> {
        self.inner.upgrade().map(|inner| Mate { inner })
    }
}

impl<V: View> Mate<V> {
    /// Start building an engine for `document`.
    ///
    /// Actions issue requests through `transport` and handler tasks run on
    /// `spawner`.
    pub fn builder(
        document: V::Document,
        transport: impl Transport + 'static,
        spawner: impl LocalSpawn + 'static,
    ) -> MateBuilder<V> {
        MateBuilder {
            attributes: Attributes::default(),
            document,
            transport: Rc::new(transport),
            controllers: ControllerRegistry::default(),
            spawner: Rc::new(spawner),
        }
    }

    /// The attribute names this engine reads.
    pub fn attributes(&self) -> &Attributes {
        &self.inner.attributes
    }

    /// The document being bound.
    pub fn document(&self) -> &V::Document {
        &self.inner.document
    }

    /// A handle that does not keep the engine alive.
    pub fn downgrade(&self) -> WeakMate<V> {
        WeakMate {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Whether `element`'s trigger has been bound.
    pub fn is_bound(&self, element: &V::Element) -> bool {
        self.inner
            .bindings
            .get()
            .get(&element.key())
            .is_some_and(|binding| binding.trigger_bound)
    }

    /// The controller bound to `element`, if any.
    pub fn controller(&self, element: &V::Element) -> Option<Rc<dyn Controller<V>>> {
        self.bound_controller(element).map(|(_, controller)| controller)
    }

    pub(crate) fn bound_controller(
        &self,
        element: &V::Element,
    ) -> Option<(String, Rc<dyn Controller<V>>)> {
        self.inner
            .bindings
            .get()
            .get(&element.key())
            .and_then(|binding| binding.controller.clone())
    }

    /// Bind `root` and everything below it.
    ///
    /// Descendants with a trigger are bound first, then descendants with a
    /// controller, then the root itself. Elements that are already bound are
    /// skipped, so binding the same subtree twice attaches nothing new.
    pub fn bind(&self, root: &V::Node) -> Result<(), Error> {
        let attributes = &self.inner.attributes;
        for element in root.query_with_attribute(&attributes.trigger)? {
            self.bind_trigger(&element)?;
        }
        for element in root.query_with_attribute(&attributes.controller)? {
            self.bind_controller(&element)?;
        }
        if let Some(element) = root.as_element() {
            if element.has_property(&attributes.controller) {
                self.bind_controller(&element)?;
            }
            if element.has_property(&attributes.trigger) {
                self.bind_trigger(&element)?;
            }
        }
        Ok(())
    }

    fn bind_trigger(&self, element: &V::Element) -> Result<(), Error> {
        if self.is_bound(element) {
            log::trace!("element {} already has its trigger", element.key());
            return Ok(());
        }
        let attribute = &self.inner.attributes.trigger;
        let spec: TriggerSpec = element
            .get_property(attribute)
            .context(MissingAttributeSnafu { attribute })?
            .parse()?;
        log::trace!("binding {:?} on element {}", spec, element.key());
        let listener = spec.attach(self, element);
        let mut bindings = self.inner.bindings.get_mut();
        let binding = bindings.entry(element.key()).or_default();
        binding.trigger_bound = true;
        binding.listener = listener;
        Ok(())
    }

    fn bind_controller(&self, element: &V::Element) -> Result<(), Error> {
        if self.controller(element).is_some() {
            log::trace!("element {} already has its controller", element.key());
            return Ok(());
        }
        let attribute = &self.inner.attributes.controller;
        let name = element
            .get_property(attribute)
            .context(MissingAttributeSnafu { attribute })?;
        let controller = self
            .inner
            .controllers
            .instantiate(&name, element)
            .context(UnknownControllerSnafu { name: &name })?;
        log::trace!("instantiated '{name}' on element {}", element.key());
        self.inner
            .bindings
            .get_mut()
            .entry(element.key())
            .or_default()
            .controller = Some((name, controller));
        Ok(())
    }

    /// Drop everything bound to `node` and its attributed descendants, if
    /// `node` has left the document.
    fn release(&self, node: &V::Node) -> Result<(), Error> {
        let Some(element) = node.as_element() else {
            return Ok(());
        };
        if element.is_connected() {
            return Ok(());
        }
        let attributes = &self.inner.attributes;
        let mut keys = vec![element.key()];
        for attribute in [&attributes.trigger, &attributes.controller] {
            keys.extend(node.query_with_attribute(attribute)?.iter().map(|el| el.key()));
        }
        let released = {
            let mut bindings = self.inner.bindings.get_mut();
            keys.iter()
                .filter_map(|key| bindings.remove(key))
                .collect::<Vec<_>>()
        };
        if !released.is_empty() {
            log::trace!("released {} bindings", released.len());
        }
        Ok(())
    }

    /// React to one batch of document changes.
    ///
    /// Added nodes are bound, removed nodes are released. Attribute and text
    /// changes are not acted on.
    pub fn process_mutations(&self, records: Vec<MutationRecord<V>>) -> Result<(), Error> {
        for record in records {
            match record.kind {
                MutationKind::ChildList => {
                    for node in record.removed.iter() {
                        self.release(node)?;
                    }
                    for node in record.added.iter() {
                        if node.as_element().is_some_and(|el| !el.is_connected()) {
                            log::trace!("skipping a node that left the document");
                            continue;
                        }
                        self.bind(node)?;
                    }
                }
                MutationKind::Attributes { name } => {
                    log::trace!("attribute {name:?} changed");
                }
                MutationKind::CharacterData => {
                    log::trace!("character data changed");
                }
            }
        }
        Ok(())
    }

    /// Once the document is ready, watch it and bind it.
    ///
    /// The engine stays alive while the watcher runs, so the returned handle
    /// may be dropped.
    pub fn start(&self) {
        let mate = self.clone();
        self.inner.document.on_ready(move || {
            if let Err(err) = mate.watch() {
                log::error!("could not start: {err}");
            }
        });
    }

    fn watch(&self) -> Result<(), Error> {
        log::debug!("document ready, binding");
        let observer = self.inner.document.observe(ObserveOptions::WATCH)?;
        let mate = self.clone();
        self.spawn(async move {
            while let Some(batch) = observer.next().await {
                if let Err(err) = mate.process_mutations(batch) {
                    log::error!("could not bind inserted content: {err}");
                }
            }
            log::debug!("stopped watching");
        });
        self.bind(&self.inner.document.as_node())
    }

    fn spawn(&self, future: impl Future<Output = ()> + 'static) {
        if let Err(err) = self.inner.spawner.spawn_local(future) {
            log::error!("could not spawn: {err}");
        }
    }

    /// Run `action` for `element` on its own task, then present the outcome.
    pub(crate) fn fire(
        &self,
        element: V::Element,
        action: Action,
        argument: String,
        event: V::Event,
        hint: Option<String>,
    ) {
        let mate = self.clone();
        self.spawn(async move {
            if let Err(err) = mate
                .dispatch(&element, action, &argument, event, hint.as_deref())
                .await
            {
                log::error!("{} on element {} failed: {err}", action.key(), element.key());
            }
        });
    }

    /// Run `action` for `element`, then present the outcome.
    ///
    /// The presenter attribute is read before the action runs, so a bad
    /// presenter fails before any request is issued. `hint` is the immediate
    /// trigger's argument; it is logged and does not change which presenter
    /// runs.
    pub async fn dispatch(
        &self,
        element: &V::Element,
        action: Action,
        argument: &str,
        event: V::Event,
        hint: Option<&str>,
    ) -> Result<(), Error> {
        let presenter = PresenterSpec::of::<V>(&self.inner.attributes, element)?;
        let outcome = action
            .run::<V>(
                &self.inner.attributes,
                self.inner.transport.as_ref(),
                element,
                argument,
                event,
            )
            .await?;
        let Some(outcome) = outcome else {
            log::trace!("{} produced nothing to present", action.key());
            return Ok(());
        };
        if let Some(hint) = hint {
            log::trace!("presenter hint '{hint}'");
        }
        presenter.present(self, element, outcome).await
    }
}
