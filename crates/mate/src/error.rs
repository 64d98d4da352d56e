//! Errors.
//!
//! Every failure ends the firing (or bind pass) that raised it. Nothing is
//! retried and nothing is partially presented.
use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("{role} attribute '{value}' must split into {expected} colon-delimited parts"))]
    Shape {
        role: &'static str,
        value: String,
        expected: usize,
    },

    #[snafu(display("element is missing the '{attribute}' attribute"))]
    MissingAttribute { attribute: String },

    #[snafu(display("unknown trigger '{key}'"))]
    UnknownTrigger { key: String },

    #[snafu(display("unknown action '{key}'"))]
    UnknownAction { key: String },

    #[snafu(display("unknown presenter '{key}'"))]
    UnknownPresenter { key: String },

    #[snafu(display("no controller named '{name}' is registered"))]
    UnknownController { name: String },

    #[snafu(display("element has no bound controller"))]
    NoController,

    #[snafu(display("controller '{controller}' has no method '{method}'"))]
    UnknownMethod { controller: String, method: String },

    #[snafu(display("no element with id '{id}'"))]
    MissingTarget { id: String },

    #[snafu(display("request payload is not valid JSON"))]
    Payload { source: serde_json::Error },

    #[snafu(display("attribute configuration is not valid JSON"))]
    Config { source: serde_json::Error },

    #[snafu(display("request to '{url}' failed: {message}"))]
    Transport { url: String, message: String },

    #[snafu(display("outcome has no textual content"))]
    NoContent,

    #[snafu(display("controller failed: {message}"))]
    Controller { message: String },

    #[snafu(display("platform error: {message}"))]
    Platform { message: String },
}

impl Error {
    /// Whether this is a failure to resolve a key, name or target.
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            Error::UnknownTrigger { .. }
                | Error::UnknownAction { .. }
                | Error::UnknownPresenter { .. }
                | Error::UnknownController { .. }
                | Error::UnknownMethod { .. }
                | Error::NoController
                | Error::MissingTarget { .. }
        )
    }

    /// Whether this is a malformed attribute value.
    pub fn is_shape(&self) -> bool {
        matches!(self, Error::Shape { .. } | Error::MissingAttribute { .. })
    }

    /// Create an error from inside a controller method.
    pub fn controller(message: impl Into<String>) -> Self {
        Error::Controller {
            message: message.into(),
        }
    }
}
