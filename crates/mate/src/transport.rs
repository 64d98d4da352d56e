//! Requests, responses and the transport that carries them.
use std::collections::HashMap;

use futures::future::LocalBoxFuture;

use crate::{Error, sync::Shared};

pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON: &str = "application/json";

/// A request body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    /// A JSON document, already serialized.
    Json(String),
    /// Form field pairs, sent URL-encoded.
    Form(Vec<(String, String)>),
}

impl Body {
    /// The body as it goes over the wire.
    pub fn encode(&self) -> String {
        match self {
            Body::Json(json) => json.clone(),
            Body::Form(fields) => url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(fields.iter())
                .finish(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl Request {
    /// A bodiless `GET`.
    pub fn get(url: impl Into<String>) -> Self {
        Request {
            url: url.into(),
            method: "GET".into(),
            headers: vec![],
            body: None,
        }
    }
}

/// A response whose body has not been read yet.
///
/// Reading the body consumes the response, so it happens at most once.
pub struct Response {
    status: u16,
    headers: Vec<(String, String)>,
    body: LocalBoxFuture<'static, Result<String, Error>>,
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl Response {
    pub fn new(
        status: u16,
        headers: Vec<(String, String)>,
        body: impl Future<Output = Result<String, Error>> + 'static,
    ) -> Self {
        Response {
            status,
            headers,
            body: Box::pin(body),
        }
    }

    /// A response with a body that is already in memory.
    pub fn from_text(status: u16, text: impl Into<String>) -> Self {
        let text = text.into();
        Response::new(status, vec![], async move { Ok(text) })
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// The first header named `name`, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Read the body.
    pub async fn text(self) -> Result<String, Error> {
        self.body.await
    }
}

/// Something that can perform requests.
pub trait Transport {
    fn perform(&self, request: Request) -> LocalBoxFuture<'static, Result<Response, Error>>;
}

struct Route {
    status: u16,
    headers: Vec<(String, String)>,
    body: String,
    reads: Shared<usize>,
}

/// A transport that answers from an in-process table of routes.
///
/// Useful for rendering on the server without a network. Every request is
/// recorded, and body reads are counted per route.
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: Shared<HashMap<(String, String), Route>>,
    requests: Shared<Vec<Request>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with a `200` and `body`.
    pub fn route(self, method: &str, path: &str, body: impl Into<String>) -> Self {
        self.route_with(method, path, 200, vec![], body)
    }

    /// Answer `method path` with the given status, headers and body.
    pub fn route_with(
        self,
        method: &str,
        path: &str,
        status: u16,
        headers: Vec<(String, String)>,
        body: impl Into<String>,
    ) -> Self {
        self.routes.get_mut().insert(
            (method.to_ascii_uppercase(), path.to_string()),
            Route {
                status,
                headers,
                body: body.into(),
                reads: Shared::new(0),
            },
        );
        self
    }

    /// Every request performed so far, in order.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.get().clone()
    }

    /// How many times the body of `method path` has been read.
    pub fn reads(&self, method: &str, path: &str) -> usize {
        self.routes
            .get()
            .get(&(method.to_ascii_uppercase(), path.to_string()))
            .map(|route| *route.reads.get())
            .unwrap_or_default()
    }
}

impl Transport for RouteTable {
    fn perform(&self, request: Request) -> LocalBoxFuture<'static, Result<Response, Error>> {
        log::trace!("routing {} {}", request.method, request.url);
        let key = (request.method.to_ascii_uppercase(), request.url.clone());
        let found = self.routes.get().get(&key).map(|route| {
            (
                route.status,
                route.headers.clone(),
                route.body.clone(),
                route.reads.clone(),
            )
        });
        self.requests.get_mut().push(request);
        Box::pin(async move {
            let (status, headers, body, reads) = found.ok_or_else(|| Error::Transport {
                url: key.1.clone(),
                message: format!("no route for {} {}", key.0, key.1),
            })?;
            Ok::<_, Error>(Response::new(status, headers, async move {
                *reads.get_mut() += 1;
                Ok(body)
            }))
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn form_bodies_are_url_encoded() {
        let body = Body::Form(vec![
            ("username".into(), "ada lovelace".into()),
            ("lang".into(), "en&fr".into()),
        ]);
        assert_eq!(body.encode(), "username=ada+lovelace&lang=en%26fr");
        assert_eq!(Body::Json(r#"{"foo":"bar"}"#.into()).encode(), r#"{"foo":"bar"}"#);
    }

    #[test]
    fn headers_ignore_case() {
        let response = Response::new(
            201,
            vec![("Content-Type".into(), "text/html".into())],
            async { Ok(String::new()) },
        );
        assert_eq!(response.status(), 201);
        assert_eq!(response.header("content-type"), Some("text/html"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn route_table_records_and_counts() {
        let routes = RouteTable::new().route("get", "/x", "<b>hi</b>");
        futures_lite::future::block_on(async {
            let response = routes.perform(Request::get("/x")).await.unwrap();
            assert_eq!(routes.reads("GET", "/x"), 0);
            assert_eq!(response.text().await.unwrap(), "<b>hi</b>");
            assert_eq!(routes.reads("GET", "/x"), 1);

            let err = routes.perform(Request::get("/nowhere")).await.unwrap_err();
            assert!(matches!(err, Error::Transport { .. }), "{err}");
        });
        assert_eq!(routes.requests(), vec![Request::get("/x"), Request::get("/nowhere")]);
    }
}
