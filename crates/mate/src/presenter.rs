//! Presenters write an [`Outcome`] back into the document.
use std::str::FromStr;

use snafu::OptionExt;

use crate::{
    Error, Mate,
    action::Outcome,
    attribute::{Attributes, split_parts},
    error::{MissingTargetSnafu, NoControllerSnafu, UnknownMethodSnafu, UnknownPresenterSnafu},
    view::{AdjacentPosition, View, ViewDocument, ViewElement, ViewProperties},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presenter {
    /// `@inner`, replace the element's content.
    Inner,
    /// `@outer`, replace the element.
    Outer,
    /// `@id`, write into the element with the target id.
    Id,
    /// `@class`, write into every element with the target class.
    Class,
    /// `@append`, add after the element's content.
    Append,
    /// `@prepend`, add before the element's content.
    Prepend,
    /// `@controller`, call a method on the element's controller.
    Controller,
}

impl FromStr for Presenter {
    type Err = Error;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Ok(match key {
            "@inner" => Presenter::Inner,
            "@outer" => Presenter::Outer,
            "@id" => Presenter::Id,
            "@class" => Presenter::Class,
            "@append" => Presenter::Append,
            "@prepend" => Presenter::Prepend,
            "@controller" => Presenter::Controller,
            _ => return UnknownPresenterSnafu { key }.fail(),
        })
    }
}

/// Whether `@id` and `@class` replace their targets' content or the targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Inner,
    Outer,
}

impl From<&str> for Mode {
    fn from(value: &str) -> Self {
        if value == "outer" {
            Mode::Outer
        } else {
            Mode::Inner
        }
    }
}

impl Mode {
    fn apply<V: View>(self, element: &V::Element, html: &str) -> Result<(), Error> {
        match self {
            Mode::Inner => element.replace_inner(html),
            Mode::Outer => element.replace_outer(html),
        }
    }
}

/// A parsed presenter attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresenterSpec {
    pub presenter: Presenter,
    pub target: String,
    pub mode: Mode,
}

impl Default for PresenterSpec {
    fn default() -> Self {
        PresenterSpec {
            presenter: Presenter::Inner,
            target: String::new(),
            mode: Mode::Inner,
        }
    }
}

impl FromStr for PresenterSpec {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let [key, target, mode] = split_parts("presenter", value)?;
        Ok(PresenterSpec {
            presenter: key.parse()?,
            target: target.to_string(),
            mode: mode.into(),
        })
    }
}

impl PresenterSpec {
    /// The element's presenter, or `@inner` when it declares none.
    pub fn of<V: View>(attributes: &Attributes, element: &V::Element) -> Result<Self, Error> {
        match element.get_property(&attributes.presenter) {
            Some(value) => value.parse(),
            None => Ok(PresenterSpec::default()),
        }
    }

    /// Present `outcome` for `element`.
    ///
    /// The outcome's text is read at most once. Lookups that can fail before
    /// reading are done before reading, so a failed lookup leaves the
    /// document untouched.
    pub async fn present<V: View>(
        &self,
        mate: &Mate<V>,
        element: &V::Element,
        outcome: Outcome<V>,
    ) -> Result<(), Error> {
        log::trace!("presenting with {:?}", self.presenter);
        match self.presenter {
            Presenter::Inner => element.replace_inner(&outcome.text().await?),
            Presenter::Outer => element.replace_outer(&outcome.text().await?),
            Presenter::Id => {
                let target = mate
                    .document()
                    .element_by_id(&self.target)
                    .context(MissingTargetSnafu { id: &self.target })?;
                self.mode.apply::<V>(&target, &outcome.text().await?)
            }
            Presenter::Class => {
                let text = outcome.text().await?;
                let targets = mate.document().elements_by_class_name(&self.target);
                log::trace!("'{}' matched {} elements", self.target, targets.len());
                for target in targets {
                    self.mode.apply::<V>(&target, &text)?;
                }
                Ok(())
            }
            Presenter::Append => {
                element.insert_adjacent(AdjacentPosition::BeforeEnd, &outcome.text().await?)
            }
            Presenter::Prepend => {
                element.insert_adjacent(AdjacentPosition::AfterBegin, &outcome.text().await?)
            }
            Presenter::Controller => {
                let (name, controller) = mate.bound_controller(element).context(NoControllerSnafu)?;
                let invocation = controller
                    .invoke(&self.target, outcome)
                    .context(UnknownMethodSnafu {
                        controller: name,
                        method: &self.target,
                    })?;
                invocation.await
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn presenter_specs() {
        assert_eq!(
            "@id:results:outer".parse::<PresenterSpec>().unwrap(),
            PresenterSpec {
                presenter: Presenter::Id,
                target: "results".into(),
                mode: Mode::Outer,
            }
        );
        assert_eq!(
            "@class:row:".parse::<PresenterSpec>().unwrap().mode,
            Mode::Inner
        );
        assert_eq!(
            "@class:row:OUTER".parse::<PresenterSpec>().unwrap().mode,
            Mode::Inner
        );
        assert!("@append".parse::<PresenterSpec>().unwrap_err().is_shape());
        assert!("@replace:_:_".parse::<PresenterSpec>().unwrap_err().is_lookup());
    }
}
