//! Requests through `window.fetch`.
use futures::future::LocalBoxFuture;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use super::{platform, window};
use crate::{
    Error,
    transport::{Body, Request, Response, Transport},
};

/// A [`Transport`] backed by the browser's `fetch`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fetch;

fn rejected(url: &str, err: JsValue) -> Error {
    Error::Transport {
        url: url.to_string(),
        message: format!("{err:?}"),
    }
}

fn response_headers(headers: &web_sys::Headers) -> Vec<(String, String)> {
    let Ok(Some(entries)) = js_sys::try_iter(headers) else {
        return vec![];
    };
    entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let pair: js_sys::Array = entry.unchecked_into();
            Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
        })
        .collect()
}

async fn perform(request: Request) -> Result<Response, Error> {
    let init = web_sys::RequestInit::new();
    init.set_method(&request.method);
    let headers = web_sys::Headers::new().map_err(platform)?;
    for (name, value) in request.headers.iter() {
        headers.set(name, value).map_err(platform)?;
    }
    init.set_headers(&headers);
    match &request.body {
        Some(Body::Json(json)) => init.set_body(&JsValue::from_str(json)),
        Some(Body::Form(fields)) => {
            // The browser sets the urlencoded content type for these.
            let params = web_sys::UrlSearchParams::new().map_err(platform)?;
            for (name, value) in fields.iter() {
                params.append(name, value);
            }
            init.set_body(&params);
        }
        None => {}
    }

    let url = request.url;
    let promise = window()?.fetch_with_str_and_init(&url, &init);
    let response: web_sys::Response = JsFuture::from(promise)
        .await
        .map_err(|err| rejected(&url, err))?
        .dyn_into()
        .map_err(|err| rejected(&url, err))?;
    let status = response.status();
    let headers = response_headers(&response.headers());
    Ok(Response::new(status, headers, async move {
        let text = response.text().map_err(|err| rejected(&url, err))?;
        let text = JsFuture::from(text)
            .await
            .map_err(|err| rejected(&url, err))?;
        text.as_string().ok_or_else(|| Error::Platform {
            message: format!("body of '{url}' is not a string"),
        })
    }))
}

impl Transport for Fetch {
    fn perform(&self, request: Request) -> LocalBoxFuture<'static, Result<Response, Error>> {
        Box::pin(perform(request))
    }
}
