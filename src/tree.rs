use crate::{
	error::{Result, RouteError},
	route::Params,
};
use std::{
	borrow::Cow,
	fmt::{self, Debug, Formatter},
	mem,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum NodeType {
	#[default]
	Static,
	Root,
	Param,
	CatchAll,
}

/// One node of a per-method radix tree.
///
/// Prefixes are stored as bytes: an edge split may fall inside a multi-byte
/// character, so no node prefix is guaranteed to be valid UTF-8 on its own.
pub(crate) struct Node<H> {
	prefix: Vec<u8>,
	wild_child: bool,
	node_type: NodeType,
	/// First byte of each child's prefix, parallel to `children`.
	indices: Vec<u8>,
	children: Vec<Node<H>>,
	/// Live routes at or below this node.
	priority: u32,
	handler: Option<H>,
}

impl<H> Default for Node<H> {
	fn default() -> Self {
		Self {
			prefix: Vec::new(),
			wild_child: false,
			node_type: NodeType::default(),
			indices: Vec::new(),
			children: Vec::new(),
			priority: 0,
			handler: None,
		}
	}
}

impl<H> Debug for Node<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Node")
			.field("prefix", &lossy(&self.prefix))
			.field("node_type", &self.node_type)
			.field("wild_child", &self.wild_child)
			.field("indices", &lossy(&self.indices))
			.field("priority", &self.priority)
			.field("handler", &self.handler.is_some())
			.field("children", &self.children)
			.finish()
	}
}

fn lossy(bytes: &[u8]) -> Cow<'_, str> {
	String::from_utf8_lossy(bytes)
}

fn common_prefix(a: &[u8], b: &[u8]) -> usize {
	a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn is_wildcard(c: u8) -> bool {
	c == b':' || c == b'*'
}

/// Number of wildcards in a route pattern.
pub(crate) fn count_params(path: &str) -> usize {
	path.bytes().filter(|&c| is_wildcard(c)).count()
}

/// Checks the wildcard syntax of a pattern before the tree is touched, so
/// that a rejected pattern never leaves half-built nodes behind.
pub(crate) fn validate(path: &str) -> Result<()> {
	let bytes = path.as_bytes();
	let mut i = 0;

	while i < bytes.len() {
		let c = bytes[i];
		if !is_wildcard(c) {
			i += 1;
			continue;
		}

		let mut end = i + 1;
		while end < bytes.len() && bytes[end] != b'/' {
			if is_wildcard(bytes[end]) {
				return Err(RouteError::MultipleWildcards {
					segment: path[i..].to_owned(),
					path: path.to_owned(),
				});
			}
			end += 1;
		}

		if end - i < 2 {
			return Err(RouteError::UnnamedWildcard {
				path: path.to_owned(),
			});
		}

		if c == b'*' {
			if end != bytes.len() {
				return Err(RouteError::CatchAllNotLast {
					path: path.to_owned(),
				});
			}
			if i == 0 || bytes[i - 1] != b'/' {
				return Err(RouteError::MissingSlashBeforeCatchAll {
					path: path.to_owned(),
				});
			}
		}

		i = end;
	}

	Ok(())
}

impl<H> Node<H> {
	fn is_empty(&self) -> bool {
		self.prefix.is_empty() && self.children.is_empty() && self.handler.is_none()
	}

	/// Registers `handler` for the pattern `path`.
	pub(crate) fn add_route(&mut self, path: &str, handler: H) -> Result<()> {
		validate(path)?;

		// every route was dropped; start over rather than splitting a dead prefix
		if self.priority == 0 {
			*self = Node::default();
		}

		if self.is_empty() {
			self.insert_child(path.as_bytes(), path, handler)?;
			self.node_type = NodeType::Root;
			self.priority += 1;
			return Ok(());
		}

		self.insert(path.as_bytes(), path, handler)
	}

	/// Priorities are only bumped once the route has landed, so a rejected
	/// route leaves them as they were.
	fn insert(&mut self, path: &[u8], full_path: &str, handler: H) -> Result<()> {
		self.insert_inner(path, full_path, handler)?;
		self.priority += 1;
		Ok(())
	}

	fn insert_inner(&mut self, path: &[u8], full_path: &str, handler: H) -> Result<()> {
		let common = common_prefix(&self.prefix, path);
		if common < self.prefix.len() {
			self.split(common);
		}

		if common == path.len() {
			if self.handler.is_some() {
				return Err(RouteError::DuplicateRoute {
					path: full_path.to_owned(),
				});
			}
			self.handler = Some(handler);
			return Ok(());
		}

		let path = &path[common..];

		if self.wild_child {
			let child = &mut self.children[0];
			let fits = path.starts_with(&child.prefix)
				// nothing can be added below a catch-all, only the catch-all itself
				&& (child.node_type != NodeType::CatchAll || path.len() == child.prefix.len())
				// rules out `:name` vs `:names`
				&& path.get(child.prefix.len()).map_or(true, |&c| c == b'/');

			if fits {
				return child.insert(path, full_path, handler);
			}
			return Err(wildcard_conflict(child, path, full_path));
		}

		let c = path[0];

		// slash after param
		if self.node_type == NodeType::Param && c == b'/' && self.children.len() == 1 {
			return self.children[0].insert(path, full_path, handler);
		}

		if let Some(pos) = self.indices.iter().position(|&i| i == c) {
			self.children[pos].insert(path, full_path, handler)?;
			self.reorder_child(pos);
			return Ok(());
		}

		if !is_wildcard(c) {
			let mut child = Node::default();
			child.insert_child(path, full_path, handler)?;
			child.priority = 1;
			self.indices.push(c);
			self.children.push(child);
			self.reorder_child(self.children.len() - 1);
			return Ok(());
		}

		self.insert_child(path, full_path, handler)
	}

	/// Moves the tail of this node's prefix, starting at `at`, into a new
	/// static child that inherits everything the node owned.
	fn split(&mut self, at: usize) {
		let child = Node {
			prefix: self.prefix.split_off(at),
			wild_child: self.wild_child,
			node_type: NodeType::Static,
			indices: mem::take(&mut self.indices),
			children: mem::take(&mut self.children),
			priority: self.priority,
			handler: self.handler.take(),
		};

		self.indices = vec![child.prefix[0]];
		self.children = vec![child];
		self.wild_child = false;
	}

	/// Builds the chain of nodes for `path` below this node, splitting at
	/// every wildcard.
	fn insert_child(&mut self, mut path: &[u8], full_path: &str, handler: H) -> Result<()> {
		let mut n = self;

		loop {
			let Some(i) = path.iter().position(|&c| is_wildcard(c)) else {
				n.prefix = path.to_vec();
				n.handler = Some(handler);
				return Ok(());
			};

			let end = path[i + 1..]
				.iter()
				.position(|&c| c == b'/')
				.map_or(path.len(), |p| i + 1 + p);

			// a wildcard here would make the existing children unreachable
			if !n.children.is_empty() {
				return Err(RouteError::WildcardChildConflict {
					wildcard: lossy(&path[i..end]).into_owned(),
					path: full_path.to_owned(),
				});
			}

			if path[i] == b':' {
				if i > 0 {
					n.prefix = path[..i].to_vec();
				}

				n.children = vec![Node {
					prefix: path[i..end].to_vec(),
					node_type: NodeType::Param,
					priority: 1,
					..Node::default()
				}];
				n.wild_child = true;
				n = &mut n.children[0];
				path = &path[end..];

				if path.is_empty() {
					n.handler = Some(handler);
					return Ok(());
				}

				// the rest is another subpath starting with '/'
				n.children = vec![Node {
					priority: 1,
					..Node::default()
				}];
				n = &mut n.children[0];
				continue;
			}

			if i == 0 || n.prefix.last() == Some(&b'/') {
				return Err(RouteError::CatchAllRootConflict {
					path: full_path.to_owned(),
				});
			}
			if path[i - 1] != b'/' {
				return Err(RouteError::MissingSlashBeforeCatchAll {
					path: full_path.to_owned(),
				});
			}

			n.prefix = path[..i - 1].to_vec();
			n.indices = vec![b'/'];
			n.children = vec![Node {
				wild_child: true,
				node_type: NodeType::CatchAll,
				priority: 1,
				children: vec![Node {
					prefix: path[i - 1..].to_vec(),
					node_type: NodeType::CatchAll,
					priority: 1,
					handler: Some(handler),
					..Node::default()
				}],
				..Node::default()
			}];
			return Ok(());
		}
	}

	/// Restores descending priority order after the child at `pos` changed,
	/// keeping `indices` in step. Returns the child's new position.
	///
	/// Children only move past strictly lower (or higher) priorities, so
	/// siblings that tie keep their current relative order.
	fn reorder_child(&mut self, pos: usize) -> usize {
		let priority = self.children[pos].priority;
		let mut new_pos = pos;

		while new_pos > 0 && self.children[new_pos - 1].priority < priority {
			self.children.swap(new_pos - 1, new_pos);
			self.indices.swap(new_pos - 1, new_pos);
			new_pos -= 1;
		}

		while new_pos + 1 < self.children.len() && self.children[new_pos + 1].priority > priority {
			self.children.swap(new_pos, new_pos + 1);
			self.indices.swap(new_pos, new_pos + 1);
			new_pos += 1;
		}

		new_pos
	}

	/// Resolves `path`, appending captured parameters to `params`.
	///
	/// On a miss, the second value tells whether the same path with exactly
	/// one trailing slash stripped or appended would have matched. Parameters
	/// pushed during a miss are discarded.
	pub(crate) fn get_value(&self, path: &str, params: &mut Params) -> (Option<&H>, bool) {
		let start = params.len();
		if let Some(handler) = self.find(path.as_bytes(), params) {
			return (Some(handler), false);
		}
		params.truncate(start);

		let tsr = match path.strip_suffix('/') {
			Some("") => false,
			Some(stripped) => self.find(stripped.as_bytes(), params).is_some(),
			None => {
				let mut appended = Vec::with_capacity(path.len() + 1);
				appended.extend_from_slice(path.as_bytes());
				appended.push(b'/');
				self.find(&appended, params).is_some()
			}
		};
		params.truncate(start);

		(None, tsr)
	}

	fn find<'n>(&'n self, mut path: &[u8], params: &mut Params) -> Option<&'n H> {
		let mut n = self;

		loop {
			path = path.strip_prefix(n.prefix.as_slice())?;
			if path.is_empty() {
				return n.handler.as_ref();
			}

			if !n.wild_child {
				let pos = n.indices.iter().position(|&c| c == path[0])?;
				n = &n.children[pos];
				continue;
			}

			n = &n.children[0];
			match n.node_type {
				NodeType::Param => {
					let end = path.iter().position(|&c| c == b'/').unwrap_or(path.len());
					params.push(&lossy(&n.prefix[1..]), &lossy(&path[..end]));
					path = &path[end..];

					if path.is_empty() {
						return n.handler.as_ref();
					}
					n = n.children.first()?;
				}
				NodeType::CatchAll => {
					// the leaf prefix is "/*name"; the value drops the leading slash
					params.push(&lossy(&n.prefix[2..]), &lossy(&path[1..]));
					return n.handler.as_ref();
				}
				NodeType::Static | NodeType::Root => return None,
			}
		}
	}

	/// Clears the handler registered for the exact pattern `path` and
	/// decrements priorities along the way.
	///
	/// Children left without any route are cut off, so a dropped wildcard no
	/// longer conflicts with new siblings. Branch nodes that still lead to a
	/// route are not merged back together.
	pub(crate) fn remove(&mut self, path: &str) -> Option<H> {
		self.remove_bytes(path.as_bytes())
	}

	fn remove_bytes(&mut self, path: &[u8]) -> Option<H> {
		let rest = path.strip_prefix(self.prefix.as_slice())?;

		let removed = if rest.is_empty() {
			self.handler.take()?
		} else {
			let single = self.wild_child || self.node_type == NodeType::Param;
			let pos = if single {
				0
			} else {
				self.indices.iter().position(|&c| c == rest[0])?
			};

			let removed = self.children.get_mut(pos)?.remove_bytes(rest)?;
			if self.children[pos].priority == 0 {
				self.prune_child(pos);
			} else if !single {
				self.reorder_child(pos);
			}
			removed
		};

		self.priority = self.priority.saturating_sub(1);
		Some(removed)
	}

	fn prune_child(&mut self, pos: usize) {
		self.children.remove(pos);
		if self.wild_child {
			self.wild_child = false;
		} else if pos < self.indices.len() {
			self.indices.remove(pos);
		}
	}
}

fn wildcard_conflict<H>(wildcard: &Node<H>, path: &[u8], full_path: &str) -> RouteError {
	let segment = if wildcard.node_type == NodeType::CatchAll {
		lossy(path).into_owned()
	} else {
		let end = path.iter().position(|&c| c == b'/').unwrap_or(path.len());
		lossy(&path[..end]).into_owned()
	};
	let consumed = full_path.len() - path.len();

	RouteError::WildcardConflict {
		prefix: format!(
			"{}{}",
			lossy(&full_path.as_bytes()[..consumed]),
			lossy(&wildcard.prefix)
		),
		wildcard: lossy(&wildcard.prefix).into_owned(),
		segment,
		path: full_path.to_owned(),
	}
}

#[cfg(test)]
mod test {
	use super::{count_params, Node, NodeType};
	use crate::{error::RouteError, route::Params};

	struct Request {
		path: &'static str,
		route: Option<&'static str>,
		params: &'static [(&'static str, &'static str)],
	}

	fn hit(
		path: &'static str,
		route: &'static str,
		params: &'static [(&'static str, &'static str)],
	) -> Request {
		Request {
			path,
			route: Some(route),
			params,
		}
	}

	fn miss(path: &'static str) -> Request {
		Request {
			path,
			route: None,
			params: &[],
		}
	}

	fn build_tree(routes: &[&'static str]) -> Node<&'static str> {
		let mut tree = Node::default();
		for route in routes {
			tree.add_route(route, *route).unwrap();
		}
		tree
	}

	fn check_requests(tree: &Node<&'static str>, requests: &[Request]) {
		for request in requests {
			let mut params = Params::default();
			let (handler, _) = tree.get_value(request.path, &mut params);
			assert_eq!(handler.copied(), request.route, "handler for {}", request.path);

			let expected: Params = request.params.iter().copied().collect();
			assert_eq!(params, expected, "params for {}", request.path);
		}
	}

	/// Returns the number of routes below `node`, asserting priorities and
	/// child order on the way.
	fn check_priorities<H>(node: &Node<H>) -> u32 {
		let mut routes = node.handler.is_some() as u32;
		for child in &node.children {
			routes += check_priorities(child);
		}
		assert_eq!(node.priority, routes, "priority of {:?}", node);

		for pair in node.children.windows(2) {
			assert!(pair[0].priority >= pair[1].priority);
		}
		assert!(node.wild_child || node.indices.len() == node.children.len() || node.node_type == NodeType::Param);
		routes
	}

	fn register(tree: &mut Node<&'static str>, route: &'static str) -> Result<(), RouteError> {
		tree.add_route(route, route)
	}

	#[test]
	fn counts_params() {
		assert_eq!(count_params("/"), 0);
		assert_eq!(count_params("/:a/b/:c/*d"), 3);
	}

	#[test]
	fn matches_static_routes() {
		let routes = [
			"/hi",
			"/contact",
			"/co",
			"/c",
			"/a",
			"/ab",
			"/doc/",
			"/doc/go_faq.html",
			"/doc/go1.html",
			"/α",
			"/β",
		];
		let tree = build_tree(&routes);

		check_requests(
			&tree,
			&[
				hit("/a", "/a", &[]),
				miss("/"),
				hit("/hi", "/hi", &[]),
				hit("/contact", "/contact", &[]),
				hit("/co", "/co", &[]),
				miss("/con"),
				miss("/cona"),
				miss("/no"),
				hit("/ab", "/ab", &[]),
				hit("/α", "/α", &[]),
				hit("/β", "/β", &[]),
			],
		);
		check_priorities(&tree);
	}

	#[test]
	fn matches_wildcards() {
		let routes = [
			"/",
			"/cmd/:tool/:sub",
			"/cmd/:tool/",
			"/src/*filepath",
			"/search/",
			"/search/:query",
			"/user_:name",
			"/user_:name/about",
			"/files/:dir/*filepath",
			"/doc/",
			"/doc/go_faq.html",
			"/doc/go1.html",
			"/info/:user/public",
			"/info/:user/project/:project",
		];
		let tree = build_tree(&routes);

		check_requests(
			&tree,
			&[
				hit("/", "/", &[]),
				hit("/cmd/test/", "/cmd/:tool/", &[("tool", "test")]),
				miss("/cmd/test"),
				hit("/cmd/test/3", "/cmd/:tool/:sub", &[("tool", "test"), ("sub", "3")]),
				hit("/src/", "/src/*filepath", &[("filepath", "")]),
				hit("/src/some/file.png", "/src/*filepath", &[("filepath", "some/file.png")]),
				hit("/search/", "/search/", &[]),
				hit(
					"/search/someth!ng+in+ünìcodé",
					"/search/:query",
					&[("query", "someth!ng+in+ünìcodé")],
				),
				miss("/search/someth!ng+in+ünìcodé/"),
				hit("/user_gopher", "/user_:name", &[("name", "gopher")]),
				hit("/user_gopher/about", "/user_:name/about", &[("name", "gopher")]),
				hit(
					"/files/js/inc/framework.js",
					"/files/:dir/*filepath",
					&[("dir", "js"), ("filepath", "inc/framework.js")],
				),
				hit("/info/gordon/public", "/info/:user/public", &[("user", "gordon")]),
				hit(
					"/info/gordon/project/go",
					"/info/:user/project/:project",
					&[("user", "gordon"), ("project", "go")],
				),
			],
		);
		check_priorities(&tree);
	}

	#[test]
	fn splits_inside_multibyte_characters() {
		// 'é' and 'è' share their first UTF-8 byte
		let tree = build_tree(&["/é", "/è", "/é/:id"]);

		check_requests(
			&tree,
			&[
				hit("/é", "/é", &[]),
				hit("/è", "/è", &[]),
				hit("/é/ü", "/é/:id", &[("id", "ü")]),
				miss("/ê"),
			],
		);
	}

	#[test]
	fn rejects_wildcard_conflicts() {
		let cases: &[(&'static str, bool)] = &[
			("/cmd/:tool/:sub", false),
			("/cmd/vet", true),
			("/src/*filepath", false),
			("/src/*filepathx", true),
			("/src/", true),
			("/src1/", false),
			("/src1/*filepath", true),
			("/src2*filepath", true),
			("/search/:query", false),
			("/search/invalid", true),
			("/user_:name", false),
			("/user_x", true),
			("/user_:name", true),
			("/id:id", false),
			("/id/:id", true),
		];

		let mut tree = Node::default();
		for &(route, conflict) in cases {
			let result = register(&mut tree, route);
			assert_eq!(result.is_err(), conflict, "{route}: {result:?}");
		}
		check_priorities(&tree);
	}

	#[test]
	fn reports_conflicting_param_names() {
		let mut tree = Node::default();
		register(&mut tree, "/user/:id").unwrap();

		match register(&mut tree, "/user/:name") {
			Err(RouteError::WildcardConflict {
				segment, wildcard, prefix, ..
			}) => {
				assert_eq!(segment, ":name");
				assert_eq!(wildcard, ":id");
				assert_eq!(prefix, "/user/:id");
			}
			other => panic!("unexpected result {other:?}"),
		}
	}

	#[test]
	fn rejects_static_after_wildcard_child() {
		let mut tree = Node::default();
		register(&mut tree, "/user/new").unwrap();
		register(&mut tree, "/user/edit").unwrap();

		assert!(matches!(
			register(&mut tree, "/user/:id"),
			Err(RouteError::WildcardChildConflict { .. })
		));
	}

	#[test]
	fn rejects_duplicates() {
		let routes = [
			"/",
			"/doc/",
			"/src/*filepath",
			"/search/:query",
			"/user_:name",
		];
		let mut tree = build_tree(&routes);
		for route in routes {
			assert_eq!(
				register(&mut tree, route),
				Err(RouteError::DuplicateRoute {
					path: route.to_owned()
				})
			);
		}
		check_priorities(&tree);
	}

	#[test]
	fn rejects_malformed_wildcards() {
		let mut tree = Node::default();
		assert!(matches!(
			register(&mut tree, "/user:"),
			Err(RouteError::UnnamedWildcard { .. })
		));
		assert!(matches!(
			register(&mut tree, "/src/*"),
			Err(RouteError::UnnamedWildcard { .. })
		));
		assert!(matches!(
			register(&mut tree, "/:foo:bar"),
			Err(RouteError::MultipleWildcards { .. })
		));
		assert!(matches!(
			register(&mut tree, "/src/*filepath/x"),
			Err(RouteError::CatchAllNotLast { .. })
		));
		assert!(matches!(
			register(&mut tree, "/src*filepath"),
			Err(RouteError::MissingSlashBeforeCatchAll { .. })
		));
		assert!(tree.is_empty());
	}

	#[test]
	fn rejects_catch_all_at_segment_root() {
		let mut tree = Node::default();
		register(&mut tree, "/src/").unwrap();
		assert!(matches!(
			register(&mut tree, "/src/*filepath"),
			Err(RouteError::CatchAllRootConflict { .. })
		));
	}

	#[test]
	fn failed_registration_keeps_priorities() {
		let mut tree = build_tree(&["/a", "/b/:id", "/c/*rest"]);
		let before = tree.priority;

		assert!(register(&mut tree, "/b/:name").is_err());
		assert!(register(&mut tree, "/c/x").is_err());
		assert!(register(&mut tree, "/a").is_err());

		assert_eq!(tree.priority, before);
		check_priorities(&tree);
	}

	#[test]
	fn recommends_trailing_slash_redirects() {
		let routes = [
			"/hi",
			"/b/",
			"/search/:query",
			"/cmd/:tool/",
			"/src/*filepath",
			"/x",
			"/x/y",
			"/y/",
			"/y/z",
			"/0/:id",
			"/0/:id/1",
			"/1/:id/",
			"/1/:id/2",
			"/aa",
			"/a/",
			"/admin",
			"/admin/:category",
			"/admin/:category/:page",
			"/doc",
			"/doc/go_faq.html",
			"/doc/go1.html",
			"/no/a",
			"/no/b",
			"/api/hello/:name",
		];
		let tree = build_tree(&routes);

		let redirects = [
			"/hi/",
			"/b",
			"/search/gopher/",
			"/cmd/vet",
			"/src",
			"/x/",
			"/y",
			"/0/go/",
			"/1/go",
			"/a",
			"/admin/",
			"/admin/config/",
			"/admin/config/permissions/",
			"/doc/",
		];
		for path in redirects {
			let mut params = Params::default();
			let (handler, tsr) = tree.get_value(path, &mut params);
			assert!(handler.is_none(), "{path} matched");
			assert!(tsr, "{path} should recommend a redirect");
			assert!(params.is_empty(), "{path} leaked params {params:?}");
		}

		let misses = ["/", "/no", "/no/", "/_", "/_/", "/api/world/abc"];
		for path in misses {
			let mut params = Params::default();
			let (handler, tsr) = tree.get_value(path, &mut params);
			assert!(handler.is_none(), "{path} matched");
			assert!(!tsr, "{path} should not recommend a redirect");
		}
	}

	#[test]
	fn root_wildcard_does_not_redirect_root() {
		let tree = build_tree(&["/:test"]);
		let mut params = Params::default();
		assert_eq!(tree.get_value("/", &mut params), (None, false));
	}

	#[test]
	fn keeps_children_sorted_by_priority() {
		let mut tree = build_tree(&["/a", "/b", "/c"]);
		for route in ["/c/1", "/c/2", "/c/3", "/b/1"] {
			tree.add_route(route, route).unwrap();
		}

		let order: Vec<u8> = tree.indices.clone();
		assert_eq!(order, b"cba".to_vec());
		check_priorities(&tree);
	}

	#[test]
	fn reordering_preserves_results() {
		let routes = ["/users/:id", "/posts/:id/comments", "/static/*path", "/about"];
		let mut tree = build_tree(&routes);

		let requests = [
			hit("/users/7", "/users/:id", &[("id", "7")]),
			hit("/posts/3/comments", "/posts/:id/comments", &[("id", "3")]),
			hit("/static/css/site.css", "/static/*path", &[("path", "css/site.css")]),
			hit("/about", "/about", &[]),
			miss("/nothing"),
		];
		check_requests(&tree, &requests);

		let extra: Vec<&'static str> = (0..40)
			.map(|i| &*Box::leak(format!("/about/page{i}").into_boxed_str()))
			.collect();
		for route in extra {
			tree.add_route(route, route).unwrap();
		}

		check_requests(&tree, &requests);
		check_priorities(&tree);
	}

	#[test]
	fn removes_routes() {
		let routes = ["/", "/users", "/users/:id", "/users/:id/posts", "/files/*path"];
		let mut tree = build_tree(&routes);

		assert_eq!(tree.remove("/users/:id"), Some("/users/:id"));
		assert_eq!(tree.remove("/users/:id"), None);
		assert_eq!(tree.remove("/users/:name"), None);
		assert_eq!(tree.remove("/nowhere"), None);
		assert_eq!(tree.remove("/files/*path"), Some("/files/*path"));
		check_priorities(&tree);

		check_requests(
			&tree,
			&[
				hit("/", "/", &[]),
				hit("/users", "/users", &[]),
				miss("/users/4"),
				hit("/users/4/posts", "/users/:id/posts", &[("id", "4")]),
				miss("/files/a"),
			],
		);
		assert_eq!(tree.priority, 3);

		// a dropped catch-all can come back
		tree.add_route("/files/*path", "/files/*path").unwrap();
		check_requests(&tree, &[hit("/files/a/b", "/files/*path", &[("path", "a/b")])]);

		// removed patterns can be registered again
		tree.add_route("/users/:id", "/users/:id").unwrap();
		check_requests(&tree, &[hit("/users/4", "/users/:id", &[("id", "4")])]);
		check_priorities(&tree);
	}

	#[test]
	fn removal_reorders_siblings() {
		let mut tree = build_tree(&["/a/1", "/a/2", "/b/1", "/b/2", "/c/1"]);
		assert_eq!(tree.indices, b"abc".to_vec());

		tree.remove("/a/1");
		tree.remove("/a/2");
		assert_eq!(tree.indices, b"bc".to_vec());
		check_priorities(&tree);

		tree.add_route("/a/3", "/a/3").unwrap();
		assert_eq!(tree.indices, b"bca".to_vec());
		check_priorities(&tree);
	}

	#[test]
	fn tied_siblings_keep_their_order() {
		let mut tree = build_tree(&["/a/1", "/b/1", "/b/2"]);
		assert_eq!(tree.indices, b"ba".to_vec());

		tree.remove("/b/2");
		assert_eq!(tree.indices, b"ba".to_vec());
		check_priorities(&tree);
		check_requests(
			&tree,
			&[hit("/a/1", "/a/1", &[]), hit("/b/1", "/b/1", &[]), miss("/b/2")],
		);
	}

	#[test]
	fn dropped_wildcards_stop_conflicting() {
		let mut tree = build_tree(&["/u/:id", "/f/*p", "/other"]);

		assert!(register(&mut tree, "/u/new").is_err());
		assert!(register(&mut tree, "/f/x").is_err());

		assert_eq!(tree.remove("/u/:id"), Some("/u/:id"));
		assert_eq!(tree.remove("/f/*p"), Some("/f/*p"));
		check_priorities(&tree);

		register(&mut tree, "/u/new").unwrap();
		register(&mut tree, "/f/x").unwrap();
		check_priorities(&tree);
		check_requests(
			&tree,
			&[
				hit("/u/new", "/u/new", &[]),
				miss("/u/42"),
				hit("/f/x", "/f/x", &[]),
				miss("/f/y/z"),
				hit("/other", "/other", &[]),
			],
		);
	}

	#[test]
	fn dropping_the_last_route_resets_the_tree() {
		let mut tree = build_tree(&["/u/:id"]);
		tree.remove("/u/:id");
		assert_eq!(tree.priority, 0);

		register(&mut tree, "/u/new").unwrap();
		register(&mut tree, "/v").unwrap();
		check_priorities(&tree);
		check_requests(
			&tree,
			&[hit("/u/new", "/u/new", &[]), hit("/v", "/v", &[]), miss("/u/42")],
		);
	}
}
