//! Validation failures

use std::collections::BTreeMap;
use std::fmt;

/// Result of serializing or deserializing through a node.
pub type NodeResult<T> = Result<T, Invalid>;

/// Validation error tree
///
/// Mirrors the shape of the schema: a mapping node reports one child error
/// per failing field, a sequence node one per failing item (keyed by its
/// position).
#[derive(Debug, Clone, PartialEq)]
pub struct Invalid {
	/// Child name, or item position inside a sequence
	pub key: String,
	pub msg: Option<String>,
	pub children: Vec<Invalid>,
}

impl Invalid {
	pub fn new(key: impl Into<String>, msg: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			msg: Some(msg.into()),
			children: Vec::new(),
		}
	}

	/// Error carrying only child errors
	pub fn with_children(key: impl Into<String>, children: Vec<Invalid>) -> Self {
		Self {
			key: key.into(),
			msg: None,
			children,
		}
	}

	/// Re-key the error, used when a sequence item is reported by position
	pub fn at(mut self, key: impl Into<String>) -> Self {
		self.key = key.into();
		self
	}

	/// Flatten into dotted paths mapped to messages
	///
	/// The root key is left out of the paths. Several messages on the same
	/// path are joined with `"; "`.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_schema_nodes::Invalid;
	///
	/// let error = Invalid::with_children(
	///     "",
	///     vec![
	///         Invalid::new("name", "Required"),
	///         Invalid::with_children("pets", vec![Invalid::new("1", "Not a mapping")]),
	///     ],
	/// );
	///
	/// let flat = error.asdict();
	/// assert_eq!(flat["name"], "Required");
	/// assert_eq!(flat["pets.1"], "Not a mapping");
	/// ```
	pub fn asdict(&self) -> BTreeMap<String, String> {
		let mut flat = BTreeMap::new();
		if let Some(msg) = &self.msg {
			flat.insert(self.key.clone(), msg.clone());
		}
		for child in &self.children {
			child.collect_into("", &mut flat);
		}
		flat
	}

	fn collect_into(&self, prefix: &str, flat: &mut BTreeMap<String, String>) {
		let path = if prefix.is_empty() {
			self.key.clone()
		} else {
			format!("{}.{}", prefix, self.key)
		};
		if let Some(msg) = &self.msg {
			flat.entry(path.clone())
				.and_modify(|existing: &mut String| {
					existing.push_str("; ");
					existing.push_str(msg);
				})
				.or_insert_with(|| msg.clone());
		}
		for child in &self.children {
			child.collect_into(&path, flat);
		}
	}
}

impl fmt::Display for Invalid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let flat = self.asdict();
		if flat.is_empty() {
			return write!(f, "Invalid value for '{}'", self.key);
		}
		let parts: Vec<String> = flat
			.iter()
			.map(|(path, msg)| {
				if path.is_empty() {
					msg.clone()
				} else {
					format!("{}: {}", path, msg)
				}
			})
			.collect();
		write!(f, "{}", parts.join(", "))
	}
}

impl std::error::Error for Invalid {}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_display_lists_every_path() {
		// Arrange
		let error = Invalid::with_children(
			"",
			vec![
				Invalid::new("age", "Not a number"),
				Invalid::new("name", "Required"),
			],
		);

		// Act
		let rendered = error.to_string();

		// Assert
		assert_eq!(rendered, "age: Not a number, name: Required");
	}

	#[rstest]
	fn test_root_message_is_kept() {
		// Arrange
		let error = Invalid::new("", "Unrecognized keys in mapping: \"x\"");

		// Act
		let flat = error.asdict();

		// Assert
		assert_eq!(flat[""], "Unrecognized keys in mapping: \"x\"");
	}
}
