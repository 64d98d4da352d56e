//! Declarative behavior for hypertext documents.
//!
//! ## Impetus
//!
//! Most interactivity on a page follows the same shape: something happens to an
//! element, a request goes out, and the response lands somewhere in the
//! document. Writing that glue by hand for every button and form is tedious.
//! `mate` lets markup authors declare it with attributes instead:
//!
//! ```html
//! <button mt-on="click:@request:_" mt-path="/greeting" mt-pr="@id:greeting:inner">
//!   Say hello
//! </button>
//! <p id="greeting"></p>
//! ```
//!
//! Clicking the button issues `GET /greeting` and writes the response text into
//! `#greeting`.
//!
//! ## Pipeline
//!
//! Every binding is three stages, each named by a key in an attribute:
//!
//! * a **trigger** (`click`, `submit`, `load`, `mouseover`, `mouseenter`,
//!   `mouseleave`) decides when to run, see [`event`]
//! * an **action** (`@request`, `@event`) produces an [`Outcome`], see [`action`]
//! * a **presenter** (`@inner`, `@outer`, `@id`, `@class`, `@append`,
//!   `@prepend`, `@controller`) writes the outcome into the document, see
//!   [`presenter`]
//!
//! Elements carrying `mt-controller` get a [`Controller`](controller::Controller)
//! instance built from a [`ControllerRegistry`](controller::ControllerRegistry),
//! which `@controller` presenters can call into.
//!
//! ## Platforms
//!
//! The engine, [`Mate`], is written against the traits in [`view`]. The `web`
//! feature implements them for the browser through `web-sys`, and the `ssr`
//! feature (on by default) implements them for an in-memory document that can
//! be rendered to a string on a server or driven in tests.
//!
//! ```rust
//! # #[cfg(feature = "ssr")]
//! # {
//! use futures::executor::LocalPool;
//! use mate::{prelude::*, ssr::prelude::*, transport::RouteTable};
//!
//! let document = SsrDocument::from_html(r#"<div mt-on="load:@request:_" mt-path="/x"></div>"#);
//! let routes = RouteTable::new().route("GET", "/x", "<b>hi</b>");
//! let mut pool = LocalPool::new();
//! let mate = Mate::<Ssr>::builder(document.clone(), routes, pool.spawner()).build();
//! mate.start();
//! document.content_loaded();
//! pool.run_until_stalled();
//! assert_eq!(document.html_string(), r#"<div mt-on="load:@request:_" mt-path="/x"><b>hi</b></div>"#);
//! # }
//! ```
pub mod action;
pub mod attribute;
pub mod controller;
pub mod engine;
pub mod error;
pub mod event;
pub mod presenter;
#[cfg(feature = "ssr")]
pub mod ssr;
pub mod sync;
pub mod transport;
pub mod view;
#[cfg(feature = "web")]
pub mod web;

pub use action::Outcome;
pub use engine::{Mate, MateBuilder};
pub use error::Error;

pub mod prelude {
    pub use crate::{
        Error, Mate, Outcome,
        attribute::Attributes,
        controller::{Controller, ControllerRegistry},
        transport::{Request, Response, Transport},
        view::*,
    };
}
