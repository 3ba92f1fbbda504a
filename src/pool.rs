use parking_lot::Mutex;
use std::{
	fmt::{self, Debug, Formatter},
	mem,
	ops::{Deref, DerefMut},
	sync::{
		atomic::{AtomicUsize, Ordering},
		Arc,
	},
};

/// Number of idle values a pool keeps around by default.
pub const DEFAULT_RETAINED: usize = 64;

struct Shared<T> {
	constructor: fn(usize) -> T,
	buffer: Mutex<Vec<T>>,
	capacity_hint: AtomicUsize,
	retained: usize,
}

/// A shared free-list of reusable values.
///
/// Cloning a pool yields another handle to the same free-list. Values taken
/// from the pool go back into it when their [`Recyclable`] guard drops; a
/// guard that is leaked simply never returns and the pool builds a fresh
/// value next time.
pub struct Pool<T: Default> {
	shared: Arc<Shared<T>>,
}

impl<T: Default> Pool<T> {
	/// `constructor` receives the current capacity hint when the free-list
	/// is empty.
	pub fn new(constructor: fn(usize) -> T) -> Self {
		Self::with_retained(constructor, DEFAULT_RETAINED)
	}

	pub fn with_retained(constructor: fn(usize) -> T, retained: usize) -> Self {
		Self {
			shared: Arc::new(Shared {
				constructor,
				buffer: Mutex::default(),
				capacity_hint: AtomicUsize::new(0),
				retained,
			}),
		}
	}

	pub fn take(&self) -> Recyclable<T> {
		let data = self.shared.buffer.lock().pop().unwrap_or_else(|| {
			(self.shared.constructor)(self.shared.capacity_hint.load(Ordering::Relaxed))
		});

		Recyclable {
			parent: Arc::clone(&self.shared),
			data,
		}
	}

	pub fn capacity_hint(&self) -> usize {
		self.shared.capacity_hint.load(Ordering::Relaxed)
	}

	/// Raises the hint passed to the constructor. Values already in the
	/// free-list keep whatever capacity they have.
	pub fn raise_capacity_hint(&self, hint: usize) {
		self.shared.capacity_hint.fetch_max(hint, Ordering::Relaxed);
	}

	/// Number of idle values currently held.
	pub fn idle(&self) -> usize {
		self.shared.buffer.lock().len()
	}
}

impl<T: Default> Clone for Pool<T> {
	fn clone(&self) -> Self {
		Self {
			shared: Arc::clone(&self.shared),
		}
	}
}

impl<T: Default> Default for Pool<T> {
	fn default() -> Self {
		Self::new(|_| T::default())
	}
}

impl<T: Default> Debug for Pool<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Pool")
			.field("idle", &self.idle())
			.field("retained", &self.shared.retained)
			.field("capacity_hint", &self.capacity_hint())
			.finish()
	}
}

/// A value on loan from a [`Pool`].
pub struct Recyclable<T: Default> {
	parent: Arc<Shared<T>>,
	data: T,
}

impl<T: Default> Deref for Recyclable<T> {
	type Target = T;

	fn deref(&self) -> &Self::Target {
		&self.data
	}
}

impl<T: Default> DerefMut for Recyclable<T> {
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.data
	}
}

impl<T: Default + Debug> Debug for Recyclable<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		self.data.fmt(f)
	}
}

impl<T: Default> Drop for Recyclable<T> {
	fn drop(&mut self) {
		let data = mem::take(&mut self.data);
		let mut buf = self.parent.buffer.lock();
		if buf.len() < self.parent.retained {
			buf.push(data);
		}
	}
}
