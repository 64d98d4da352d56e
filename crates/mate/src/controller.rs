//! Per-element controllers, created by name.
//!
//! An element carrying the controller attribute gets one controller instance,
//! built by the factory registered under the attribute's value. Presenters
//! address the instance with `@controller:method:_`.
use std::{collections::HashMap, rc::Rc};

use futures::future::LocalBoxFuture;

use crate::{Error, action::Outcome, view::View};

/// An object bound to one element, exposing methods by name.
pub trait Controller<V: View> {
    /// Call `method` with the outcome of an action.
    ///
    /// Returns `None` if this controller has no such method.
    fn invoke(
        &self,
        method: &str,
        outcome: Outcome<V>,
    ) -> Option<LocalBoxFuture<'_, Result<(), Error>>>;
}

type Factory<V> = Box<dyn Fn(&<V as View>::Element) -> Rc<dyn Controller<V>>>;

/// Controller factories by type name.
pub struct ControllerRegistry<V: View> {
    factories: HashMap<String, Factory<V>>,
}

impl<V: View> Default for ControllerRegistry<V> {
    fn default() -> Self {
        Self {
            factories: HashMap::default(),
        }
    }
}

impl<V: View> ControllerRegistry<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`, replacing any previous factory.
    pub fn register<C: Controller<V> + 'static>(
        mut self,
        name: impl Into<String>,
        factory: impl Fn(&V::Element) -> C + 'static,
    ) -> Self {
        self.factories.insert(
            name.into(),
            Box::new(move |element| Rc::new(factory(element)) as Rc<dyn Controller<V>>),
        );
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build the controller registered as `name` for `element`.
    pub fn instantiate(&self, name: &str, element: &V::Element) -> Option<Rc<dyn Controller<V>>> {
        self.factories.get(name).map(|factory| factory(element))
    }
}

#[cfg(all(test, feature = "ssr"))]
mod test {
    use super::*;
    use crate::ssr::{Ssr, SsrElement};

    struct Named;

    impl Controller<Ssr> for Named {
        fn invoke(
            &self,
            _method: &str,
            _outcome: Outcome<Ssr>,
        ) -> Option<LocalBoxFuture<'_, Result<(), Error>>> {
            None
        }
    }

    #[test]
    fn registry_builds_by_name() {
        let registry = ControllerRegistry::<Ssr>::new()
            .register("first", |_: &SsrElement| Named)
            .register("second", |_: &SsrElement| Named);
        assert!(registry.contains("first"));
        assert!(registry.contains("second"));
        assert!(!registry.contains("First"));

        let element = SsrElement::new("section");
        assert!(registry.instantiate("first", &element).is_some());
        assert!(registry.instantiate("third", &element).is_none());
    }

    #[test]
    fn registering_again_replaces() {
        let registry = ControllerRegistry::<Ssr>::new()
            .register("same", |_: &SsrElement| Named)
            .register("same", |_: &SsrElement| Named);
        assert!(registry.contains("same"));
        assert_eq!(registry.factories.len(), 1);
    }
}
