//! A radix tree HTTP request router built on hyper.
//!
//! Every method gets its own compressed prefix tree. Patterns are made of
//! static text, named parameters (`:name`, one segment) and catch-alls
//! (`*name`, the rest of the path, only at the end):
//!
//! ```
//! use radix_dispatch::{Dispatch, Router};
//!
//! let router = Router::new();
//! router.handle("GET", "/user/:id", "show_user");
//! router.handle("GET", "/files/*filepath", "serve_file");
//!
//! let lookup = router.lookup("GET", "/user/42");
//! assert_eq!(lookup.handler, Some("show_user"));
//! assert_eq!(lookup.params.by_name("id"), "42");
//!
//! let lookup = router.lookup("GET", "/files/css/site.css");
//! assert_eq!(lookup.params.by_name("filepath"), "css/site.css");
//!
//! // One trailing slash too many: the router recommends a redirect.
//! assert!(router.lookup("GET", "/user/42/").tsr);
//!
//! match router.dispatch("POST", "/user/42") {
//! 	Dispatch::MethodNotAllowed { allow } => assert_eq!(allow, ["GET", "OPTIONS"]),
//! 	other => panic!("unexpected {:?}", other),
//! }
//! ```
//!
//! With the `http` feature (on by default) a router of [`Handler`]s can be
//! served directly:
//!
//! ```no_run
//! # #[cfg(feature = "http")]
//! # mod demo {
//! use radix_dispatch::{handler_fn, hyper::{self, Body, Server}, HttpRouter, PathParams, Request, Response, RouterBuilder};
//!
//! async fn hello(params: PathParams, _req: Request) -> Response {
//! 	Ok(hyper::Response::new(Body::from(format!("hello, {}", params.by_name("name")))))
//! }
//!
//! pub async fn serve() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! 	let mut builder = RouterBuilder::default();
//! 	builder.get("/hello/:name", handler_fn(hello));
//!
//! 	let addr = ([127, 0, 0, 1], 3000).into();
//! 	Server::bind(&addr).serve(HttpRouter::from(builder.build())).await?;
//! 	Ok(())
//! }
//! # }
//! ```
//!
//! Registration problems are reported as [`RouteError`]s by
//! [`Router::try_handle`]; [`Router::handle`] treats them as programming
//! errors and panics.

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::*;

/// Errors raised while registering routes.
pub mod error;

/// A small free-list used to recycle parameter lists between lookups.
pub mod pool;

/// Parameter lists and method names.
pub mod route;

/// Contains the core structs of the router.
///
/// Use the RouterBuilder to create a Router, or register on a shared Router
/// directly: routes can be added and dropped while lookups run.
pub mod router;

mod tree;

pub use error::{Result, RouteError};
pub use pool::{Pool, Recyclable};
pub use route::*;
pub use router::*;
