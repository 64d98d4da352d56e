//! The attribute vocabulary markup authors write.
//!
//! | Attribute       | Format                | Meaning                                    |
//! |-----------------|-----------------------|--------------------------------------------|
//! | `mt-on`         | `event:action:arg`    | binds event key, action key, action arg    |
//! | `mt-controller` | type name             | instantiate the named registered type      |
//! | `mt-method`     | HTTP verb             | overrides the default `GET`                |
//! | `mt-path`       | URL                   | request target                             |
//! | `mt-data`       | JSON text             | body for non-form, non-GET/HEAD requests   |
//! | `mt-pr`         | `presenter:arg1:arg2` | binds presenter key and its two arguments  |
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::{ConfigSnafu, Error, ShapeSnafu};

pub const TRIGGER: &str = "mt-on";
pub const CONTROLLER: &str = "mt-controller";
pub const REQUEST_METHOD: &str = "mt-method";
pub const REQUEST_PATH: &str = "mt-path";
pub const REQUEST_DATA: &str = "mt-data";
pub const PRESENTER: &str = "mt-pr";

/// Number of colon-delimited parts in trigger and presenter values.
pub(crate) const PARTS: usize = 3;

/// Names of the attributes the engine reads, by role.
///
/// Fixed for the life of a [`Mate`](crate::Mate).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub trigger: String,
    pub controller: String,
    pub method: String,
    pub path: String,
    pub payload: String,
    pub presenter: String,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            trigger: TRIGGER.into(),
            controller: CONTROLLER.into(),
            method: REQUEST_METHOD.into(),
            path: REQUEST_PATH.into(),
            payload: REQUEST_DATA.into(),
            presenter: PRESENTER.into(),
        }
    }
}

impl Attributes {
    /// The same vocabulary under a different prefix, eg `with_prefix("hx")`
    /// reads `hx-on`, `hx-path` and so on.
    pub fn with_prefix(prefix: impl AsRef<str>) -> Self {
        let prefix = prefix.as_ref();
        Self {
            trigger: format!("{prefix}-on"),
            controller: format!("{prefix}-controller"),
            method: format!("{prefix}-method"),
            path: format!("{prefix}-path"),
            payload: format!("{prefix}-data"),
            presenter: format!("{prefix}-pr"),
        }
    }

    /// Read attribute names from JSON. Missing roles keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).context(ConfigSnafu)
    }
}

/// Split an attribute value into exactly three colon-delimited parts.
pub(crate) fn split_parts<'a>(role: &'static str, value: &'a str) -> Result<[&'a str; PARTS], Error> {
    let mut parts = value.split(':');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), Some(third), None) => Ok([first, second, third]),
        _ => ShapeSnafu {
            role,
            value,
            expected: PARTS,
        }
        .fail(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_vocabulary() {
        let attributes = Attributes::default();
        assert_eq!(
            attributes,
            Attributes {
                trigger: "mt-on".into(),
                controller: "mt-controller".into(),
                method: "mt-method".into(),
                path: "mt-path".into(),
                payload: "mt-data".into(),
                presenter: "mt-pr".into(),
            }
        );
        assert_eq!(Attributes::with_prefix("mt"), attributes);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let attributes = Attributes::from_json(r#"{"trigger": "data-on"}"#).unwrap();
        assert_eq!(attributes.trigger, "data-on");
        assert_eq!(attributes.path, REQUEST_PATH);
        assert!(Attributes::from_json("{").is_err());
    }

    #[test]
    fn split_is_strict() {
        assert_eq!(split_parts("trigger", "click:@request:_").unwrap(), ["click", "@request", "_"]);
        assert_eq!(split_parts("trigger", "load:@event:").unwrap(), ["load", "@event", ""]);
        for value in ["", "click", "click:@request", "click:@request:_:extra"] {
            let err = split_parts("trigger", value).unwrap_err();
            assert!(err.is_shape(), "{value}: {err}");
        }
    }
}
