//! Configuration errors raised while registering routes.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouteError>;

/// A route that cannot be registered.
///
/// Every variant is a mistake in route setup, not a runtime condition:
/// [`Router::handle`](crate::Router::handle) turns them into panics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
	#[error("method must not be empty")]
	EmptyMethod,

	#[error("path must begin with '/' in path '{path}'")]
	MissingLeadingSlash { path: String },

	#[error("wildcards must be named with a non-empty name in path '{path}'")]
	UnnamedWildcard { path: String },

	#[error("only one wildcard per path segment is allowed, has: '{segment}' in path '{path}'")]
	MultipleWildcards { segment: String, path: String },

	#[error("catch-all routes are only allowed at the end of the path in path '{path}'")]
	CatchAllNotLast { path: String },

	#[error("no / before catch-all in path '{path}'")]
	MissingSlashBeforeCatchAll { path: String },

	#[error("catch-all conflicts with existing handle for the path segment root in path '{path}'")]
	CatchAllRootConflict { path: String },

	#[error(
		"'{segment}' in new path '{path}' conflicts with existing wildcard '{wildcard}' in existing prefix '{prefix}'"
	)]
	WildcardConflict {
		segment: String,
		path: String,
		wildcard: String,
		prefix: String,
	},

	#[error("wildcard route '{wildcard}' conflicts with existing children in path '{path}'")]
	WildcardChildConflict { wildcard: String, path: String },

	#[error("a handle is already registered for path '{path}'")]
	DuplicateRoute { path: String },
}
