//! Override records and precedence resolution
//!
//! An attribute can be customized from two places: the declaration itself
//! (declarative overrides, see [`crate::declarative`]) and the call that
//! builds the schema (imperative overrides). Both are plain
//! [`OverrideRegistry`] records that are never mutated during derivation;
//! [`OverrideLayers`] answers "which value wins for this key" with
//! imperative over declarative over the inferred value.

use crate::error::{AttributeKind, OverrideSource, SchemaError, SchemaResult};
use reinhardt_schema_nodes::{Missing, SchemaDefault, SchemaNode, SchemaType, Validator};
use serde_json::Value;
use std::collections::BTreeMap;

/// Value of a single override entry
#[derive(Debug, Clone, PartialEq)]
pub enum OverrideValue {
	Bool(bool),
	Json(Value),
	/// Replacement schema type (`typ`)
	Type(SchemaType),
	Validator(Validator),
	Missing(Missing),
	Default(SchemaDefault),
	/// Explicit child nodes (`children`)
	Children(Vec<SchemaNode>),
	/// Attribute names (`includes`, `excludes`)
	Names(Vec<String>),
	/// Overrides for a nested node (`overrides`)
	Nested(Overrides),
}

impl OverrideValue {
	pub fn names<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		OverrideValue::Names(names.into_iter().map(Into::into).collect())
	}

	/// JSON form of the value, when it has one
	pub fn to_json(&self) -> Option<Value> {
		match self {
			OverrideValue::Bool(b) => Some(Value::Bool(*b)),
			OverrideValue::Json(value) => Some(value.clone()),
			OverrideValue::Names(names) => Some(Value::from(names.clone())),
			_ => None,
		}
	}

	/// Whether the value reads as `true`
	pub fn is_true(&self) -> bool {
		matches!(self, OverrideValue::Bool(true) | OverrideValue::Json(Value::Bool(true)))
	}
}

impl From<bool> for OverrideValue {
	fn from(value: bool) -> Self {
		OverrideValue::Bool(value)
	}
}

impl From<Value> for OverrideValue {
	fn from(value: Value) -> Self {
		OverrideValue::Json(value)
	}
}

impl From<&str> for OverrideValue {
	fn from(value: &str) -> Self {
		OverrideValue::Json(Value::String(value.to_string()))
	}
}

impl From<SchemaType> for OverrideValue {
	fn from(value: SchemaType) -> Self {
		OverrideValue::Type(value)
	}
}

impl From<Validator> for OverrideValue {
	fn from(value: Validator) -> Self {
		OverrideValue::Validator(value)
	}
}

impl From<Missing> for OverrideValue {
	fn from(value: Missing) -> Self {
		OverrideValue::Missing(value)
	}
}

impl From<SchemaDefault> for OverrideValue {
	fn from(value: SchemaDefault) -> Self {
		OverrideValue::Default(value)
	}
}

impl From<Vec<SchemaNode>> for OverrideValue {
	fn from(value: Vec<SchemaNode>) -> Self {
		OverrideValue::Children(value)
	}
}

impl From<Overrides> for OverrideValue {
	fn from(value: Overrides) -> Self {
		OverrideValue::Nested(value)
	}
}

/// Ordered key/value override record for one attribute
///
/// # Examples
///
/// ```
/// use reinhardt_model_schema::{OverrideRegistry, OverrideValue};
/// use serde_json::json;
///
/// let registry = OverrideRegistry::new()
///     .with("missing", json!("anonymous"))
///     .with("title", "Full name");
///
/// assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["missing", "title"]);
/// assert_eq!(registry.get("missing"), Some(&OverrideValue::Json(json!("anonymous"))));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverrideRegistry {
	entries: Vec<(String, OverrideValue)>,
}

impl OverrideRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, key: impl Into<String>, value: impl Into<OverrideValue>) -> Self {
		self.insert(key, value);
		self
	}

	/// Insert or replace `key`, keeping its original position on replace
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OverrideValue>) {
		let key = key.into();
		let value = value.into();
		match self.entries.iter().position(|(existing, _)| *existing == key) {
			Some(index) => self.entries[index].1 = value,
			None => self.entries.push((key, value)),
		}
	}

	pub fn get(&self, key: &str) -> Option<&OverrideValue> {
		self.entries
			.iter()
			.find(|(existing, _)| existing == key)
			.map(|(_, value)| value)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.get(key).is_some()
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|(key, _)| key.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideValue)> {
		self.entries.iter().map(|(key, value)| (key.as_str(), value))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<K, V> FromIterator<(K, V)> for OverrideRegistry
where
	K: Into<String>,
	V: Into<OverrideValue>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut registry = Self::new();
		for (key, value) in iter {
			registry.insert(key, value);
		}
		registry
	}
}

/// Imperative overrides keyed by attribute name
///
/// # Examples
///
/// ```
/// use reinhardt_model_schema::{OverrideRegistry, Overrides};
/// use serde_json::json;
///
/// let overrides = Overrides::new()
///     .attribute("name", OverrideRegistry::new().with("missing", json!("anonymous")));
/// assert!(overrides.get("name").is_some());
/// assert!(overrides.get("id").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Overrides {
	attributes: BTreeMap<String, OverrideRegistry>,
}

impl Overrides {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn attribute(mut self, name: impl Into<String>, registry: OverrideRegistry) -> Self {
		self.insert(name, registry);
		self
	}

	pub fn insert(&mut self, name: impl Into<String>, registry: OverrideRegistry) {
		self.attributes.insert(name.into(), registry);
	}

	pub fn get(&self, name: &str) -> Option<&OverrideRegistry> {
		self.attributes.get(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideRegistry)> {
		self.attributes
			.iter()
			.map(|(name, registry)| (name.as_str(), registry))
	}

	pub fn len(&self) -> usize {
		self.attributes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.attributes.is_empty()
	}
}

impl<S: Into<String>> FromIterator<(S, OverrideRegistry)> for Overrides {
	fn from_iter<I: IntoIterator<Item = (S, OverrideRegistry)>>(iter: I) -> Self {
		let mut overrides = Self::new();
		for (name, registry) in iter {
			overrides.insert(name, registry);
		}
		overrides
	}
}

/// The two override records of one attribute, resolved by precedence
#[derive(Debug, Clone, Copy)]
pub struct OverrideLayers<'a> {
	pub attribute: &'a str,
	pub kind: AttributeKind,
	pub imperative: &'a OverrideRegistry,
	pub declarative: &'a OverrideRegistry,
}

impl<'a> OverrideLayers<'a> {
	/// Winning value for `key`, imperative first
	pub fn resolve(&self, key: &str) -> Option<(OverrideSource, &'a OverrideValue)> {
		if let Some(value) = self.imperative.get(key) {
			return Some((OverrideSource::Imperative, value));
		}
		self.declarative
			.get(key)
			.map(|value| (OverrideSource::Declarative, value))
	}

	/// Whether the attribute is switched off through an `exclude` flag
	pub fn excluded(&self) -> bool {
		self.resolve("exclude")
			.is_some_and(|(_, value)| value.is_true())
	}

	/// Fail when either record sets one of the `reserved` keys
	pub fn check_reserved(&self, reserved: &[&str]) -> SchemaResult<()> {
		for key in reserved {
			let origin = if self.declarative.contains_key(key) {
				OverrideSource::Declarative
			} else if self.imperative.contains_key(key) {
				OverrideSource::Imperative
			} else {
				continue;
			};
			return Err(SchemaError::ReservedOverride {
				kind: self.kind,
				attribute: self.attribute.to_string(),
				key: key.to_string(),
				origin,
			});
		}
		Ok(())
	}

	/// Entries not in `consumed`, declarative first so imperative ones
	/// are applied last
	pub fn remaining(&self, consumed: &[&str]) -> Vec<(&'a str, &'a OverrideValue)> {
		self.declarative
			.iter()
			.chain(self.imperative.iter())
			.filter(|(key, _)| !consumed.contains(key))
			.collect()
	}

	/// Names stored under `key`
	pub fn names(&self, key: &str) -> SchemaResult<Option<Vec<String>>> {
		let Some((origin, value)) = self.resolve(key) else {
			return Ok(None);
		};
		let names = match value {
			OverrideValue::Names(names) => names.clone(),
			OverrideValue::Json(Value::Array(items)) => items
				.iter()
				.map(|item| item.as_str().map(str::to_string))
				.collect::<Option<Vec<_>>>()
				.ok_or_else(|| self.invalid(key, "a list of attribute names"))?,
			_ => return Err(self.invalid(key, "a list of attribute names")),
		};
		tracing::debug!(attribute = self.attribute, key, %origin, "{} overridden", key);
		Ok(Some(names))
	}

	pub(crate) fn invalid(&self, key: &str, expected: &'static str) -> SchemaError {
		SchemaError::InvalidOverride {
			attribute: self.attribute.to_string(),
			key: key.to_string(),
			expected,
		}
	}
}

/// Apply one override entry to a built node
///
/// Known node attributes are set directly; any other key is stored in
/// the node's `extra` map and must therefore be JSON.
pub(crate) fn apply(node: &mut SchemaNode, attribute: &str, key: &str, value: &OverrideValue) -> SchemaResult<()> {
	let invalid = |expected| SchemaError::InvalidOverride {
		attribute: attribute.to_string(),
		key: key.to_string(),
		expected,
	};
	match key {
		"missing" => {
			node.missing = match value {
				OverrideValue::Missing(missing) => missing.clone(),
				OverrideValue::Json(json) => Missing::from(json.clone()),
				OverrideValue::Bool(b) => Missing::Value(Value::Bool(*b)),
				_ => return Err(invalid("a missing value")),
			};
		}
		"default" => {
			node.default = match value {
				OverrideValue::Default(default) => default.clone(),
				OverrideValue::Json(json) => SchemaDefault::from(json.clone()),
				OverrideValue::Bool(b) => SchemaDefault::Value(Value::Bool(*b)),
				_ => return Err(invalid("a default value")),
			};
		}
		"validator" => {
			node.validator = match value {
				OverrideValue::Validator(validator) => Some(validator.clone()),
				OverrideValue::Json(Value::Null) => None,
				_ => return Err(invalid("a validator")),
			};
		}
		"title" | "description" | "missing_msg" => {
			let OverrideValue::Json(Value::String(text)) = value else {
				return Err(invalid("a string"));
			};
			match key {
				"title" => node.title = Some(text.clone()),
				"description" => node.description = Some(text.clone()),
				_ => node.missing_msg = text.clone(),
			}
		}
		_ => {
			let json = value.to_json().ok_or_else(|| invalid("a JSON value"))?;
			node.extra.insert(key.to_string(), json);
		}
	}
	Ok(())
}
