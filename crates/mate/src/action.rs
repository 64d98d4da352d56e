//! Actions produce an [`Outcome`] when a trigger fires.
use std::str::FromStr;

use snafu::{OptionExt, ResultExt};

use crate::{
    Error,
    attribute::Attributes,
    error::{MissingAttributeSnafu, PayloadSnafu, UnknownActionSnafu},
    transport::{Body, CONTENT_TYPE, JSON, Request, Response, Transport},
    view::{View, ViewElement, ViewProperties},
};

/// What an action hands to a presenter.
pub enum Outcome<V: View> {
    /// The response to a request.
    Response(Response),
    /// The event that fired, unchanged.
    Event(V::Event),
}

impl<V: View> std::fmt::Debug for Outcome<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Response(response) => f.debug_tuple("Response").field(response).finish(),
            Outcome::Event(_) => f.write_str("Event"),
        }
    }
}

impl<V: View> Outcome<V> {
    pub fn status(&self) -> Option<u16> {
        match self {
            Outcome::Response(response) => Some(response.status()),
            Outcome::Event(_) => None,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        match self {
            Outcome::Response(response) => response.header(name),
            Outcome::Event(_) => None,
        }
    }

    /// Read the textual content, consuming the outcome.
    pub async fn text(self) -> Result<String, Error> {
        match self {
            Outcome::Response(response) => response.text().await,
            Outcome::Event(_) => Err(Error::NoContent),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// `@request`
    Request,
    /// `@event`
    Event,
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "@request" => Ok(Action::Request),
            "@event" => Ok(Action::Event),
            _ => UnknownActionSnafu { key }.fail(),
        }
    }
}

impl Action {
    pub fn key(&self) -> &'static str {
        match self {
            Action::Request => "@request",
            Action::Event => "@event",
        }
    }

    /// Run the action for `element`.
    ///
    /// `argument` is the third part of the trigger attribute. Neither built-in
    /// action reads it.
    pub async fn run<V: View>(
        &self,
        attributes: &Attributes,
        transport: &dyn Transport,
        element: &V::Element,
        argument: &str,
        event: V::Event,
    ) -> Result<Option<Outcome<V>>, Error> {
        log::trace!("running {} with argument '{argument}'", self.key());
        match self {
            Action::Request => {
                let request = build_request::<V>(attributes, element)?;
                log::debug!("{} {}", request.method, request.url);
                let response = transport.perform(request).await?;
                Ok(Some(Outcome::Response(response)))
            }
            Action::Event => Ok(Some(Outcome::Event(event))),
        }
    }
}

/// Build the request an element describes with its attributes.
pub fn build_request<V: View>(
    attributes: &Attributes,
    element: &V::Element,
) -> Result<Request, Error> {
    let method = element
        .get_property(&attributes.method)
        .map(|method| method.to_ascii_uppercase())
        .unwrap_or_else(|| "GET".to_string());
    let url = element
        .get_property(&attributes.path)
        .context(MissingAttributeSnafu {
            attribute: attributes.path.as_str(),
        })?;

    let mut headers = vec![];
    let body = if method == "GET" || method == "HEAD" {
        None
    } else if element.is_form() {
        Some(Body::Form(element.form_fields()))
    } else {
        let payload = element
            .get_property(&attributes.payload)
            .unwrap_or_else(|| "{}".to_string());
        let value: serde_json::Value = serde_json::from_str(&payload).context(PayloadSnafu)?;
        headers.push((CONTENT_TYPE.to_string(), JSON.to_string()));
        Some(Body::Json(value.to_string()))
    };

    Ok(Request {
        url,
        method,
        headers,
        body,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn action_keys() {
        assert_eq!("@request".parse::<Action>().unwrap(), Action::Request);
        assert_eq!("@event".parse::<Action>().unwrap(), Action::Event);
        for key in ["request", "@Request", "@fetch", ""] {
            let err = key.parse::<Action>().unwrap_err();
            assert!(err.is_lookup(), "{key}: {err}");
        }
    }

    #[cfg(feature = "ssr")]
    mod ssr {
        use super::super::*;
        use crate::ssr::{Ssr, SsrDocument};

        fn element(html: &str) -> crate::ssr::SsrElement {
            let doc = SsrDocument::from_html(html);
            doc.root().element_children().remove(0)
        }

        #[test]
        fn get_without_method() {
            let el = element(r#"<div mt-path="/x"></div>"#);
            let request = build_request::<Ssr>(&Attributes::default(), &el).unwrap();
            assert_eq!(request, Request::get("/x"));
        }

        #[test]
        fn lowercase_method_is_normalised() {
            let el = element(r#"<div mt-method="head" mt-path="/x"></div>"#);
            let request = build_request::<Ssr>(&Attributes::default(), &el).unwrap();
            assert_eq!(request.method, "HEAD");
            assert_eq!(request.body, None);
            assert!(request.headers.is_empty());
        }

        #[test]
        fn json_payload_is_reserialized() {
            let el = element(
                r#"<div mt-method="POST" mt-path="/save" mt-data='{ "foo" : "bar" }'></div>"#,
            );
            let request = build_request::<Ssr>(&Attributes::default(), &el).unwrap();
            assert_eq!(request.body, Some(Body::Json(r#"{"foo":"bar"}"#.into())));
            assert_eq!(
                request.headers,
                vec![("Content-Type".to_string(), "application/json".to_string())]
            );
        }

        #[test]
        fn payload_keys_keep_their_order() {
            let el = element(
                r#"<div mt-method="POST" mt-path="/save" mt-data='{"zeta":1,"alpha":{"b":2,"a":3},"mid":[true]}'></div>"#,
            );
            let request = build_request::<Ssr>(&Attributes::default(), &el).unwrap();
            assert_eq!(
                request.body,
                Some(Body::Json(r#"{"zeta":1,"alpha":{"b":2,"a":3},"mid":[true]}"#.into()))
            );
        }

        #[test]
        fn missing_payload_is_empty_object() {
            let el = element(r#"<div mt-method="DELETE" mt-path="/x"></div>"#);
            let request = build_request::<Ssr>(&Attributes::default(), &el).unwrap();
            assert_eq!(request.body, Some(Body::Json("{}".into())));
        }

        #[test]
        fn bad_payload_fails_before_sending() {
            let el = element(r#"<div mt-method="PUT" mt-path="/x" mt-data="{nope"></div>"#);
            let err = build_request::<Ssr>(&Attributes::default(), &el).unwrap_err();
            assert!(matches!(err, Error::Payload { .. }), "{err}");
        }

        #[test]
        fn missing_path() {
            let el = element(r#"<div mt-on="click:@request:_"></div>"#);
            let err = build_request::<Ssr>(&Attributes::default(), &el).unwrap_err();
            assert!(err.is_shape(), "{err}");
        }

        #[test]
        fn forms_send_their_fields() {
            let el = element(
                r#"<form mt-method="post" mt-path="/login"><input name="user" value="ada"><input name="pass" value="x y"></form>"#,
            );
            let request = build_request::<Ssr>(&Attributes::default(), &el).unwrap();
            assert!(request.headers.is_empty());
            assert_eq!(
                request.body,
                Some(Body::Form(vec![
                    ("user".into(), "ada".into()),
                    ("pass".into(), "x y".into())
                ]))
            );
        }
    }
}
