//! Info side-channel attached to column and relationship declarations
//!
//! The ORM never interprets these entries. Extensions store their own
//! configuration here under a key they own and read it back with
//! [`Info::get_as`]. Cloning an `Info` clones every entry, so a copied
//! declaration never shares configuration with the original.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

/// A value that can be stored in an [`Info`] map
pub trait InfoValue: Any + fmt::Debug + Send + Sync {
	/// Clone into a new boxed value
	fn clone_value(&self) -> Box<dyn InfoValue>;

	/// Upcast for downcasting to the concrete type
	fn as_any(&self) -> &dyn Any;
}

impl<T> InfoValue for T
where
	T: Any + Clone + fmt::Debug + Send + Sync,
{
	fn clone_value(&self) -> Box<dyn InfoValue> {
		Box::new(self.clone())
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

/// String-keyed map of arbitrary values
#[derive(Debug, Default)]
pub struct Info {
	entries: BTreeMap<String, Box<dyn InfoValue>>,
}

impl Info {
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert `value` under `key`, replacing any previous entry
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_mapper::Info;
	///
	/// let mut info = Info::new();
	/// info.insert("searchable", true);
	/// assert_eq!(info.get_as::<bool>("searchable"), Some(&true));
	/// assert_eq!(info.get_as::<String>("searchable"), None);
	/// ```
	pub fn insert<T: InfoValue>(&mut self, key: impl Into<String>, value: T) {
		self.entries.insert(key.into(), Box::new(value));
	}

	/// Entry stored under `key`, whatever its type
	pub fn get(&self, key: &str) -> Option<&dyn InfoValue> {
		self.entries.get(key).map(|value| &**value)
	}

	/// Entry stored under `key` if it has type `T`
	pub fn get_as<T: Any>(&self, key: &str) -> Option<&T> {
		self.entries
			.get(key)
			.and_then(|value| (**value).as_any().downcast_ref::<T>())
	}

	pub fn remove(&mut self, key: &str) -> Option<Box<dyn InfoValue>> {
		self.entries.remove(key)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl Clone for Info {
	fn clone(&self) -> Self {
		Self {
			entries: self
				.entries
				.iter()
				.map(|(key, value)| (key.clone(), (**value).clone_value()))
				.collect(),
		}
	}
}
