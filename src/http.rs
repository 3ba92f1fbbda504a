use crate::{
	route::PathParams,
	router::{Dispatch, Router},
};
use anyhow::{Error, Result};
use hyper::{
	body::Body,
	header::{HeaderValue, ALLOW, LOCATION},
	service::Service,
	StatusCode,
};
use std::{
	convert::Infallible,
	fmt::{self, Debug, Formatter},
	future::{ready, Future, Ready},
	pin::Pin,
	sync::Arc,
	task::{Context, Poll},
};
use tracing::error;

pub use hyper;

pub use hyper::http::response::Builder as ResponseBuilder;
pub type Request = hyper::Request<Body>;
pub type Response = Result<hyper::Response<Body>>;
pub type ResponseFuture = Pin<Box<dyn Future<Output = Response> + Send>>;

/// A route handler: receives the captured path parameters and the request.
pub type Handler = Arc<dyn Fn(PathParams, Request) -> ResponseFuture + Send + Sync>;

/// Wraps an async function (or closure returning a future) as a [`Handler`].
pub fn handler_fn<F, Fut>(f: F) -> Handler
where
	F: Fn(PathParams, Request) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Response> + Send + 'static,
{
	Arc::new(move |params: PathParams, req: Request| -> ResponseFuture { Box::pin(f(params, req)) })
}

fn with_status(status: StatusCode, body: Body) -> hyper::Response<Body> {
	let mut res = hyper::Response::new(body);
	*res.status_mut() = status;
	res
}

fn default_error_handler(e: Error) -> hyper::Response<Body> {
	with_status(StatusCode::INTERNAL_SERVER_ERROR, e.to_string().into())
}

fn default_not_found_handler(_req: Request) -> hyper::Response<Body> {
	with_status(StatusCode::NOT_FOUND, Body::empty())
}

fn default_method_not_allowed_handler(_req: Request) -> hyper::Response<Body> {
	with_status(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed".into())
}

/// A function that can convert an error into a response.
pub type ErrorHandler = fn(e: Error) -> hyper::Response<Body>;

/// A function that handles unroutable requests and creates a response.
pub type NotFoundHandler = fn(req: Request) -> hyper::Response<Body>;

/// A function that answers a request whose path is served by other methods
/// only. The `Allow` header is added to its response unless already set.
pub type MethodNotAllowedHandler = fn(req: Request) -> hyper::Response<Body>;

/// Serves a [`Router`] of [`Handler`]s over hyper.
///
/// The router stays reachable through [`HttpRouter::router`], so routes can
/// be added or dropped while the server runs.
#[derive(Clone)]
pub struct HttpRouter {
	router: Arc<Router<Handler>>,
	internal_error: ErrorHandler,
	not_found: NotFoundHandler,
	method_not_allowed: MethodNotAllowedHandler,
}

impl From<Router<Handler>> for HttpRouter {
	fn from(inner: Router<Handler>) -> Self {
		Self {
			router: Arc::new(inner),
			internal_error: default_error_handler,
			not_found: default_not_found_handler,
			method_not_allowed: default_method_not_allowed_handler,
		}
	}
}

impl HttpRouter {
	pub fn router(&self) -> &Arc<Router<Handler>> {
		&self.router
	}

	pub fn internal_error_handler(mut self, handler: ErrorHandler) -> Self {
		self.internal_error = handler;
		self
	}

	pub fn not_found_handler(mut self, handler: NotFoundHandler) -> Self {
		self.not_found = handler;
		self
	}

	pub fn method_not_allowed_handler(mut self, handler: MethodNotAllowedHandler) -> Self {
		self.method_not_allowed = handler;
		self
	}

	/// A request service sharing this router.
	pub fn handler(&self) -> RouteHandler {
		RouteHandler {
			router: Arc::clone(&self.router),
			internal_error: self.internal_error,
			not_found: self.not_found,
			method_not_allowed: self.method_not_allowed,
		}
	}
}

impl Debug for HttpRouter {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("HttpRouter")
			.field("router", &self.router)
			.finish()
	}
}

impl<T> Service<T> for HttpRouter {
	type Response = RouteHandler;
	type Error = Infallible;
	type Future = Ready<Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _: &mut Context) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, _: T) -> Self::Future {
		ready(Ok(self.handler()))
	}
}

/// Responsible for handling the actual HTTP requests from hyper.
#[derive(Clone)]
pub struct RouteHandler {
	router: Arc<Router<Handler>>,
	internal_error: ErrorHandler,
	not_found: NotFoundHandler,
	method_not_allowed: MethodNotAllowedHandler,
}

impl Service<Request> for RouteHandler {
	type Response = hyper::Response<Body>;
	type Error = Infallible;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, req: Request) -> Self::Future {
		let method = req.method().clone();
		let uri = req.uri().clone();

		let response = match self.router.dispatch(method.as_str(), uri.path()) {
			Dispatch::Handler { handler, params } => {
				let fut = (*handler)(params, req);
				let internal_error = self.internal_error;
				return Box::pin(async move {
					Ok(fut.await.unwrap_or_else(|e| {
						error!(%method, path = uri.path(), error = %e, "handler failed");
						internal_error(e)
					}))
				});
			}
			Dispatch::Redirect { status, location } => {
				let location = match uri.query() {
					Some(query) => format!("{}?{}", location, query),
					None => location,
				};

				match HeaderValue::from_str(&location) {
					Ok(value) => {
						let status = StatusCode::from_u16(status).unwrap_or(StatusCode::TEMPORARY_REDIRECT);
						let mut res = with_status(status, Body::empty());
						res.headers_mut().insert(LOCATION, value);
						res
					}
					Err(_) => (self.not_found)(req),
				}
			}
			Dispatch::MethodNotAllowed { allow } => {
				let mut res = (self.method_not_allowed)(req);
				if let Ok(value) = HeaderValue::from_str(&allow.join(", ")) {
					res.headers_mut().entry(ALLOW).or_insert(value);
				}
				res
			}
			Dispatch::NotFound => (self.not_found)(req),
		};

		Box::pin(ready(Ok(response)))
	}
}
