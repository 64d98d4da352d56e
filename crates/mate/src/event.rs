//! Triggers decide when an element's action runs.
use std::str::FromStr;

use crate::{
    Error, Mate,
    action::Action,
    attribute::split_parts,
    error::UnknownTriggerSnafu,
    view::{View, ViewElement, ViewEvent},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    Click,
    /// Only binds on forms.
    Submit,
    /// `load`, runs once as soon as the element is bound.
    Immediate,
    MouseOver,
    MouseEnter,
    MouseLeave,
}

impl FromStr for Trigger {
    type Err = Error;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        Ok(match key {
            "click" => Trigger::Click,
            "submit" => Trigger::Submit,
            "load" => Trigger::Immediate,
            "mouseover" => Trigger::MouseOver,
            "mouseenter" => Trigger::MouseEnter,
            "mouseleave" => Trigger::MouseLeave,
            _ => return UnknownTriggerSnafu { key }.fail(),
        })
    }
}

impl Trigger {
    /// The platform event this trigger listens for.
    pub fn event_name(&self) -> &'static str {
        match self {
            Trigger::Click => "click",
            Trigger::Submit => "submit",
            Trigger::Immediate => "load",
            Trigger::MouseOver => "mouseover",
            Trigger::MouseEnter => "mouseenter",
            Trigger::MouseLeave => "mouseleave",
        }
    }
}

/// A parsed trigger attribute, `event:action:argument`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerSpec {
    pub trigger: Trigger,
    pub action: Action,
    pub argument: String,
}

impl FromStr for TriggerSpec {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let [trigger, action, argument] = split_parts("trigger", value)?;
        Ok(TriggerSpec {
            trigger: trigger.parse()?,
            action: action.parse()?,
            argument: argument.to_string(),
        })
    }
}

impl TriggerSpec {
    /// Wire this trigger onto `element`.
    ///
    /// Returns the listener keeping the wiring alive, if one was attached.
    /// The immediate trigger attaches nothing and fires right away with a
    /// placeholder event, forwarding its argument as a presenter hint.
    pub(crate) fn attach<V: View>(&self, mate: &Mate<V>, element: &V::Element) -> Option<V::Listener> {
        match self.trigger {
            Trigger::Immediate => {
                mate.fire(
                    element.clone(),
                    self.action,
                    self.argument.clone(),
                    V::Event::placeholder(),
                    Some(self.argument.clone()),
                );
                None
            }
            Trigger::Submit if !element.is_form() => {
                log::debug!("submit trigger on an element that is not a form, skipping");
                None
            }
            trigger => {
                let weak = mate.downgrade();
                let target = element.clone();
                let action = self.action;
                let argument = self.argument.clone();
                Some(element.listen(trigger.event_name(), move |event: V::Event| {
                    event.prevent_default();
                    event.stop_propagation();
                    if let Some(mate) = weak.upgrade() {
                        mate.fire(target.clone(), action, argument.clone(), event, None);
                    }
                }))
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn trigger_specs() {
        assert_eq!(
            "submit:@request:_".parse::<TriggerSpec>().unwrap(),
            TriggerSpec {
                trigger: Trigger::Submit,
                action: Action::Request,
                argument: "_".into(),
            }
        );
        let load = "load:@event:@id".parse::<TriggerSpec>().unwrap();
        assert_eq!(load.trigger, Trigger::Immediate);
        assert_eq!(load.trigger.event_name(), "load");
        assert_eq!(load.argument, "@id");
    }

    #[test]
    fn bad_trigger_specs() {
        assert!("dblclick:@request:_".parse::<TriggerSpec>().unwrap_err().is_lookup());
        assert!("click:@fetch:_".parse::<TriggerSpec>().unwrap_err().is_lookup());
        assert!("click:@request".parse::<TriggerSpec>().unwrap_err().is_shape());
        assert!("click".parse::<TriggerSpec>().unwrap_err().is_shape());
    }
}
