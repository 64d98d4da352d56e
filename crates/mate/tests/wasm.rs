#![cfg(all(target_arch = "wasm32", feature = "web"))]
use mate::{
    prelude::*,
    transport::RouteTable,
    web::{WebSpawner, document},
};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn init_logging() {
    let _ = console_log::init_with_level(log::Level::Trace);
}

/// Let spawned tasks run.
async fn settle() {
    for _ in 0..16 {
        let _ = JsFuture::from(js_sys::Promise::resolve(&JsValue::NULL)).await;
    }
}

fn container(html: &str) -> web_sys::Element {
    let document = document().unwrap();
    let container = document.create_element("div").unwrap();
    container.set_inner_html(html);
    document
        .document_element()
        .unwrap()
        .append_child(&container)
        .unwrap();
    container
}

fn click(element: &web_sys::Element) {
    let event = web_sys::Event::new("click").unwrap();
    element.dispatch_event(&event).unwrap();
}

#[wasm_bindgen_test]
async fn click_requests_and_replaces_content() {
    init_logging();
    let root = container(r#"<div id="wasm-click" mt-on="click:@request:_" mt-path="/x">old</div>"#);
    let routes = RouteTable::new().route("GET", "/x", "<b>hi</b>");
    let mate = Mate::<mate::web::Web>::builder(document().unwrap(), routes.clone(), WebSpawner)
        .build();
    mate.bind(&root.as_node()).unwrap();

    let target = document().unwrap().get_element_by_id("wasm-click").unwrap();
    assert!(mate.is_bound(&target));
    click(&target);
    settle().await;

    assert_eq!(routes.requests(), vec![Request::get("/x")]);
    assert_eq!(target.inner_html(), "<b>hi</b>");
    root.remove();
}

#[wasm_bindgen_test]
async fn watcher_binds_inserted_elements() {
    init_logging();
    let root = container("");
    let routes = RouteTable::new().route("GET", "/late", "late");
    let mate = Mate::<mate::web::Web>::builder(document().unwrap(), routes.clone(), WebSpawner)
        .build();
    mate.start();
    settle().await;

    root.set_inner_html(r#"<p id="wasm-late" mt-on="click:@request:_" mt-path="/late"></p>"#);
    settle().await;

    let late = document().unwrap().get_element_by_id("wasm-late").unwrap();
    assert!(mate.is_bound(&late));
    click(&late);
    settle().await;
    assert_eq!(late.inner_html(), "late");
    root.remove();
}
