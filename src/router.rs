use crate::{
	error::{Result, RouteError},
	pool::Pool,
	route::{methods, Params, PathParams},
	tree::{self, Node},
};
use parking_lot::{RwLock, RwLockUpgradableReadGuard, RwLockWriteGuard};
use std::{
	collections::HashMap,
	fmt::{self, Debug, Formatter},
	sync::atomic::{AtomicUsize, Ordering},
};
use tracing::{debug, trace, warn};

struct Trees<H> {
	roots: HashMap<String, RwLock<Node<H>>>,
	/// Cached answer for a server-wide `*` query.
	global_allowed: Vec<String>,
}

impl<H> Default for Trees<H> {
	fn default() -> Self {
		Self {
			roots: HashMap::new(),
			global_allowed: Vec::new(),
		}
	}
}

/// The result of resolving a method and path.
#[derive(Debug)]
pub struct Lookup<H> {
	pub handler: Option<H>,
	pub params: PathParams,
	/// Set on a miss when the path with one trailing slash removed or
	/// appended would have matched.
	pub tsr: bool,
}

impl<H> Lookup<H> {
	fn miss() -> Self {
		Self {
			handler: None,
			params: PathParams::default(),
			tsr: false,
		}
	}
}

/// What the caller should do with a request.
#[derive(Debug)]
pub enum Dispatch<H> {
	Handler { handler: H, params: PathParams },
	Redirect { status: u16, location: String },
	MethodNotAllowed { allow: Vec<String> },
	NotFound,
}

/// Status code for a trailing-slash redirect: body-less safe methods may be
/// downgraded to GET by clients, everything else must be replayed verbatim.
pub fn redirect_status(method: &str) -> u16 {
	match method {
		methods::GET | methods::HEAD => 301,
		_ => 307,
	}
}

/// `path` with exactly one trailing slash removed or appended.
pub fn toggle_trailing_slash(path: &str) -> String {
	match path.strip_suffix('/') {
		Some(stripped) => stripped.to_owned(),
		None => format!("{}/", path),
	}
}

/// A per-method collection of radix trees.
///
/// Lookups only take read locks, so any number of threads may resolve
/// requests at once. Registration and removal lock only the tree of the
/// method they touch.
pub struct Router<H> {
	trees: RwLock<Trees<H>>,
	params_pool: Pool<Params>,
	max_params: AtomicUsize,
	pub redirect_trailing_slash: bool,
	pub handle_method_not_allowed: bool,
}

impl<H> Default for Router<H> {
	fn default() -> Self {
		Self {
			trees: RwLock::default(),
			params_pool: Pool::new(Params::with_capacity),
			max_params: AtomicUsize::new(0),
			redirect_trailing_slash: true,
			handle_method_not_allowed: true,
		}
	}
}

impl<H> Router<H> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `handler` for `method` and `path`.
	///
	/// # Panics
	///
	/// On any [`RouteError`]: a bad route is a programming mistake and must
	/// stop startup.
	pub fn handle(&self, method: &str, path: &str, handler: H) {
		if let Err(e) = self.try_handle(method, path, handler) {
			panic!("{}", e);
		}
	}

	pub fn try_handle(&self, method: &str, path: &str, handler: H) -> Result<()> {
		let result = self.insert(method, path, handler);
		match &result {
			Ok(()) => debug!(method, path, "registered route"),
			Err(e) => warn!(method, path, error = %e, "rejected route"),
		}
		result
	}

	fn insert(&self, method: &str, path: &str, handler: H) -> Result<()> {
		if method.is_empty() {
			return Err(RouteError::EmptyMethod);
		}
		if !path.starts_with('/') {
			return Err(RouteError::MissingLeadingSlash {
				path: path.to_owned(),
			});
		}
		tree::validate(path)?;

		// raised before the tree changes so that no lookup can match a route
		// whose parameters it has no room for
		let params = tree::count_params(path);
		self.max_params.fetch_max(params, Ordering::Relaxed);
		self.params_pool.raise_capacity_hint(params);

		let trees = self.trees.upgradable_read();
		let trees = if trees.roots.contains_key(method) {
			RwLockUpgradableReadGuard::downgrade(trees)
		} else {
			let mut trees = RwLockUpgradableReadGuard::upgrade(trees);
			trees.roots.insert(method.to_owned(), RwLock::default());
			let global_allowed = allowed_everywhere(trees.roots.keys());
			trees.global_allowed = global_allowed;
			RwLockWriteGuard::downgrade(trees)
		};

		match trees.roots.get(method) {
			Some(root) => root.write().add_route(path, handler),
			None => Ok(()),
		}
	}

	/// Removes the route registered for exactly `method` and `path`.
	///
	/// Removing a route that was never registered does nothing. Returns
	/// whether a route was removed.
	pub fn drop_route(&self, method: &str, path: &str) -> bool {
		let trees = self.trees.read();
		let removed = trees
			.roots
			.get(method)
			.and_then(|root| root.write().remove(path))
			.is_some();

		if removed {
			debug!(method, path, "removed route");
		}
		removed
	}

	/// The largest number of parameters any registered route captures.
	pub fn max_params(&self) -> usize {
		self.max_params.load(Ordering::Relaxed)
	}

	pub fn has_method(&self, method: &str) -> bool {
		self.trees.read().roots.contains_key(method)
	}

	/// Methods with a tree, sorted.
	pub fn methods(&self) -> Vec<String> {
		let mut methods: Vec<String> = self.trees.read().roots.keys().cloned().collect();
		methods.sort();
		methods
	}

	/// Methods other than `req_method` that serve `path`, plus `OPTIONS`,
	/// sorted. An empty list means no method serves the path at all.
	///
	/// `path == "*"` asks about the whole server: with an empty `req_method`
	/// this lists every registered method.
	pub fn allowed(&self, path: &str, req_method: &str) -> Vec<String> {
		let trees = self.trees.read();

		if path == "*" {
			if req_method.is_empty() {
				return allowed_everywhere(trees.roots.keys());
			}
			return trees.global_allowed.clone();
		}

		let mut scratch = Params::default();
		let mut allowed: Vec<String> = trees
			.roots
			.iter()
			.filter(|(method, _)| *method != req_method && *method != methods::OPTIONS)
			.filter(|(_, root)| {
				scratch.clear();
				root.read().get_value(path, &mut scratch).0.is_some()
			})
			.map(|(method, _)| method.clone())
			.collect();

		finish_allowed(&mut allowed);
		allowed
	}

	/// Every method that serves `path`; drives the `Allow` header.
	pub fn allowed_methods(&self, path: &str) -> Vec<String> {
		self.allowed(path, "")
	}
}

impl<H: Clone> Router<H> {
	/// Resolves `method` and `path` to a handler and its parameters.
	///
	/// A method without any routes is a plain miss.
	pub fn lookup(&self, method: &str, path: &str) -> Lookup<H> {
		let trees = self.trees.read();
		let Some(root) = trees.roots.get(method) else {
			return Lookup::miss();
		};
		let root = root.read();

		if self.max_params() == 0 {
			let mut scratch = Params::default();
			let (handler, tsr) = root.get_value(path, &mut scratch);
			return Lookup {
				handler: handler.cloned(),
				params: PathParams::default(),
				tsr,
			};
		}

		let mut params = self.params_pool.take();
		params.clear();
		let (handler, tsr) = root.get_value(path, &mut params);
		Lookup {
			handler: handler.cloned(),
			params: PathParams::pooled(params),
			tsr,
		}
	}

	/// Decides how to answer a request for `method` and `path`.
	pub fn dispatch(&self, method: &str, path: &str) -> Dispatch<H> {
		let lookup = self.lookup(method, path);
		if let Some(handler) = lookup.handler {
			trace!(method, path, "matched route");
			return Dispatch::Handler {
				handler,
				params: lookup.params,
			};
		}

		if lookup.tsr && self.redirect_trailing_slash && method != methods::CONNECT && path != "/" {
			let location = toggle_trailing_slash(path);
			trace!(method, path, %location, "redirecting trailing slash");
			return Dispatch::Redirect {
				status: redirect_status(method),
				location,
			};
		}

		if self.handle_method_not_allowed {
			let allow = self.allowed(path, method);
			if !allow.is_empty() {
				trace!(method, path, ?allow, "method not allowed");
				return Dispatch::MethodNotAllowed { allow };
			}
		}

		trace!(method, path, "no route");
		Dispatch::NotFound
	}
}

impl<H> Debug for Router<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Router")
			.field("methods", &self.methods())
			.field("max_params", &self.max_params())
			.field("redirect_trailing_slash", &self.redirect_trailing_slash)
			.field("handle_method_not_allowed", &self.handle_method_not_allowed)
			.finish()
	}
}

fn allowed_everywhere<'a>(registered: impl Iterator<Item = &'a String>) -> Vec<String> {
	let mut allowed: Vec<String> = registered
		.filter(|method| *method != methods::OPTIONS)
		.cloned()
		.collect();
	finish_allowed(&mut allowed);
	allowed
}

fn finish_allowed(allowed: &mut Vec<String>) {
	if allowed.is_empty() {
		return;
	}
	allowed.push(methods::OPTIONS.to_owned());
	allowed.sort();
	allowed.dedup();
}

/// Collects routes and settings, then produces a [`Router`].
///
/// Every registration panics on a [`RouteError`], like [`Router::handle`].
pub struct RouterBuilder<H> {
	router: Router<H>,
}

impl<H> Default for RouterBuilder<H> {
	fn default() -> Self {
		Self {
			router: Router::default(),
		}
	}
}

impl<H> RouterBuilder<H> {
	pub fn register(&mut self, method: &str, path: &str, handler: H) -> &mut Self {
		self.router.handle(method, path, handler);
		self
	}

	pub fn get(&mut self, path: &str, handler: H) -> &mut Self {
		self.register(methods::GET, path, handler)
	}

	pub fn head(&mut self, path: &str, handler: H) -> &mut Self {
		self.register(methods::HEAD, path, handler)
	}

	pub fn post(&mut self, path: &str, handler: H) -> &mut Self {
		self.register(methods::POST, path, handler)
	}

	pub fn put(&mut self, path: &str, handler: H) -> &mut Self {
		self.register(methods::PUT, path, handler)
	}

	pub fn patch(&mut self, path: &str, handler: H) -> &mut Self {
		self.register(methods::PATCH, path, handler)
	}

	pub fn delete(&mut self, path: &str, handler: H) -> &mut Self {
		self.register(methods::DELETE, path, handler)
	}

	pub fn options(&mut self, path: &str, handler: H) -> &mut Self {
		self.register(methods::OPTIONS, path, handler)
	}

	pub fn connect(&mut self, path: &str, handler: H) -> &mut Self {
		self.register(methods::CONNECT, path, handler)
	}

	pub fn trace(&mut self, path: &str, handler: H) -> &mut Self {
		self.register(methods::TRACE, path, handler)
	}

	pub fn redirect_trailing_slash(&mut self, enabled: bool) -> &mut Self {
		self.router.redirect_trailing_slash = enabled;
		self
	}

	pub fn handle_method_not_allowed(&mut self, enabled: bool) -> &mut Self {
		self.router.handle_method_not_allowed = enabled;
		self
	}

	pub fn build(self) -> Router<H> {
		self.router
	}
}

impl<H: Clone> RouterBuilder<H> {
	/// Registers `handler` for every method in [`methods::ALL`].
	pub fn any(&mut self, path: &str, handler: H) -> &mut Self {
		self.matching(&methods::ALL, path, handler)
	}

	pub fn matching(&mut self, methods: &[&str], path: &str, handler: H) -> &mut Self {
		for method in methods {
			self.register(method, path, handler.clone());
		}
		self
	}
}

impl<H> Debug for RouterBuilder<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterBuilder")
			.field("router", &self.router)
			.finish()
	}
}
