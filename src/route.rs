use crate::pool::Recyclable;
use std::{
	fmt::{self, Debug, Formatter},
	ops::Deref,
};

/// Method names the router knows about by default.
pub mod methods {
	pub const CONNECT: &str = "CONNECT";
	pub const DELETE: &str = "DELETE";
	pub const GET: &str = "GET";
	pub const HEAD: &str = "HEAD";
	pub const OPTIONS: &str = "OPTIONS";
	pub const PATCH: &str = "PATCH";
	pub const POST: &str = "POST";
	pub const PROPFIND: &str = "PROPFIND";
	pub const PUT: &str = "PUT";
	pub const REPORT: &str = "REPORT";
	pub const TRACE: &str = "TRACE";

	/// Every method registered by [`RouterBuilder::any`](crate::RouterBuilder::any).
	pub const ALL: [&str; 11] = [
		CONNECT, DELETE, GET, HEAD, OPTIONS, PATCH, POST, PROPFIND, PUT, TRACE, REPORT,
	];
}

/// A single captured path parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Param {
	pub key: String,
	pub value: String,
}

impl Param {
	pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			value: value.into(),
		}
	}
}

/// The ordered parameters captured by one lookup.
///
/// The first parameter of the route pattern is also the first entry, so
/// reading by index is safe. Clearing keeps the string buffers of previous
/// entries around, which is what makes pooled lists cheap to refill.
#[derive(Clone, Default)]
pub struct Params {
	entries: Vec<Param>,
	len: usize,
}

impl Params {
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			entries: Vec::with_capacity(capacity),
			len: 0,
		}
	}

	pub fn push(&mut self, key: &str, value: &str) {
		match self.entries.get_mut(self.len) {
			Some(slot) => {
				slot.key.clear();
				slot.key.push_str(key);
				slot.value.clear();
				slot.value.push_str(value);
			}
			None => self.entries.push(Param::new(key, value)),
		}
		self.len += 1;
	}

	pub fn clear(&mut self) {
		self.len = 0;
	}

	pub(crate) fn truncate(&mut self, len: usize) {
		self.len = self.len.min(len);
	}

	/// Value of the first parameter named `name`.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.iter()
			.find(|param| param.key == name)
			.map(|param| param.value.as_str())
	}

	/// Like [`get`](Self::get), but an absent parameter reads as `""`.
	pub fn by_name(&self, name: &str) -> &str {
		self.get(name).unwrap_or_default()
	}
}

impl Deref for Params {
	type Target = [Param];

	fn deref(&self) -> &Self::Target {
		&self.entries[..self.len]
	}
}

impl PartialEq for Params {
	fn eq(&self, other: &Params) -> bool {
		**self == **other
	}
}

impl Debug for Params {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.iter()).finish()
	}
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let entries: Vec<Param> = iter.into_iter().map(|(k, v)| Param::new(k, v)).collect();
		Self {
			len: entries.len(),
			entries,
		}
	}
}

/// Parameters handed to the caller of a lookup.
///
/// Holds a list borrowed from the router's pool (or nothing, when the route
/// captured no parameters); the list goes back to the pool on drop.
#[derive(Default)]
pub struct PathParams(Option<Recyclable<Params>>);

impl PathParams {
	pub(crate) fn pooled(params: Recyclable<Params>) -> Self {
		if params.is_empty() {
			Self(None)
		} else {
			Self(Some(params))
		}
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.as_ref().and_then(|params| params.get(name))
	}

	pub fn by_name(&self, name: &str) -> &str {
		self.get(name).unwrap_or_default()
	}
}

impl Deref for PathParams {
	type Target = [Param];

	fn deref(&self) -> &Self::Target {
		match &self.0 {
			Some(params) => params,
			None => &[],
		}
	}
}

impl Debug for PathParams {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.iter()).finish()
	}
}
