//! Schema nodes
//!
//! A [`SchemaNode`] is one typed unit of a schema tree. Mapping nodes own
//! one child per field, sequence nodes own a single child describing every
//! item, scalar nodes have no children.

use crate::error::{Invalid, NodeResult};
use crate::sentinels::{Missing, SchemaDefault};
use crate::types::{SchemaType, UnknownPolicy};
use crate::validators::Validator;
use serde_json::{Map, Value};

/// Message reported when a required value is absent
pub const DEFAULT_MISSING_MSG: &str = "Required";

/// A typed node of a schema tree
///
/// Fields are public so callers can adjust a derived tree in place.
///
/// # Examples
///
/// ```
/// use reinhardt_schema_nodes::{SchemaNode, SchemaType, Validator};
/// use serde_json::json;
///
/// let schema = SchemaNode::mapping()
///     .with_child(SchemaNode::new(SchemaType::Integer).with_name("id"))
///     .with_child(
///         SchemaNode::new(SchemaType::String)
///             .with_name("name")
///             .with_validator(Validator::length(Some(0), Some(10))),
///     );
///
/// let data = schema.deserialize(&json!({"id": "7", "name": "Rex"})).unwrap();
/// assert_eq!(data, json!({"id": 7, "name": "Rex"}));
///
/// let error = schema.deserialize(&json!({"name": "Rex"})).unwrap_err();
/// assert_eq!(error.asdict()["id"], "Required");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
	pub typ: SchemaType,
	pub name: String,
	pub children: Vec<SchemaNode>,
	/// Emitted by `serialize` for an absent value
	pub default: SchemaDefault,
	/// Produced by `deserialize` for an absent value
	pub missing: Missing,
	pub validator: Option<Validator>,
	pub title: Option<String>,
	pub description: Option<String>,
	pub missing_msg: String,
	/// Free-form attributes carried along with the node
	pub extra: Map<String, Value>,
}

impl SchemaNode {
	pub fn new(typ: SchemaType) -> Self {
		Self {
			typ,
			name: String::new(),
			children: Vec::new(),
			default: SchemaDefault::Null,
			missing: Missing::Required,
			validator: None,
			title: None,
			description: None,
			missing_msg: DEFAULT_MISSING_MSG.to_string(),
			extra: Map::new(),
		}
	}

	/// Mapping node ignoring unknown keys
	pub fn mapping() -> Self {
		Self::new(SchemaType::mapping())
	}

	/// Sequence node whose items are described by `item`
	pub fn sequence(item: SchemaNode) -> Self {
		Self::new(SchemaType::Sequence).with_child(item)
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	pub fn with_child(mut self, child: SchemaNode) -> Self {
		self.children.push(child);
		self
	}

	pub fn with_children(mut self, children: impl IntoIterator<Item = SchemaNode>) -> Self {
		self.children.extend(children);
		self
	}

	pub fn with_default(mut self, default: impl Into<SchemaDefault>) -> Self {
		self.default = default.into();
		self
	}

	pub fn with_missing(mut self, missing: impl Into<Missing>) -> Self {
		self.missing = missing.into();
		self
	}

	pub fn with_validator(mut self, validator: Validator) -> Self {
		self.validator = Some(validator);
		self
	}

	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn with_missing_msg(mut self, msg: impl Into<String>) -> Self {
		self.missing_msg = msg.into();
		self
	}

	pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
		self.extra.insert(key.into(), value);
		self
	}

	/// Append a child node
	pub fn add(&mut self, child: SchemaNode) {
		self.children.push(child);
	}

	pub fn child(&self, name: &str) -> Option<&SchemaNode> {
		self.children.iter().find(|child| child.name == name)
	}

	pub fn child_mut(&mut self, name: &str) -> Option<&mut SchemaNode> {
		self.children.iter_mut().find(|child| child.name == name)
	}

	pub fn child_names(&self) -> Vec<&str> {
		self.children.iter().map(|child| child.name.as_str()).collect()
	}

	/// Render an application value
	///
	/// An absent value (`Value::Null`) is replaced by the node's default.
	/// Absent mappings render each child's default, absent sequences render
	/// as an empty array.
	pub fn serialize(&self, value: &Value) -> NodeResult<Value> {
		let value = match value {
			Value::Null => self.default.resolve(),
			other => other.clone(),
		};
		match self.typ {
			SchemaType::Mapping { unknown } => {
				let object = match value {
					Value::Null => Map::new(),
					Value::Object(object) => object,
					other => return Err(self.invalid(format!("\"{}\" is not a mapping type", other))),
				};
				let mut output = Map::new();
				let mut errors = Vec::new();
				for child in &self.children {
					let item = object.get(&child.name).unwrap_or(&Value::Null);
					match child.serialize(item) {
						Ok(rendered) => {
							output.insert(child.name.clone(), rendered);
						}
						Err(error) => errors.push(error),
					}
				}
				if unknown == UnknownPolicy::Preserve {
					self.preserve_unknown(&object, &mut output);
				}
				if errors.is_empty() {
					Ok(Value::Object(output))
				} else {
					Err(Invalid::with_children(self.name.clone(), errors))
				}
			}
			SchemaType::Sequence => {
				let items = match value {
					Value::Null => Vec::new(),
					Value::Array(items) => items,
					other => return Err(self.invalid(format!("\"{}\" is not iterable", other))),
				};
				let mut output = Vec::with_capacity(items.len());
				let mut errors = Vec::new();
				for (index, item) in items.iter().enumerate() {
					match self.children.first() {
						Some(node) => match node.serialize(item) {
							Ok(rendered) => output.push(rendered),
							Err(error) => errors.push(error.at(index.to_string())),
						},
						None => output.push(item.clone()),
					}
				}
				if errors.is_empty() {
					Ok(Value::Array(output))
				} else {
					Err(Invalid::with_children(self.name.clone(), errors))
				}
			}
			typ => match value {
				Value::Null => Ok(Value::Null),
				other => typ.coerce(&other).map_err(|msg| self.invalid(msg)),
			},
		}
	}

	/// Validate an external value and convert it to its application form
	///
	/// An absent value yields the node's `missing` value, or an error when
	/// the node is required. Validators run only on values that were
	/// actually supplied.
	pub fn deserialize(&self, value: &Value) -> NodeResult<Value> {
		let converted = match self.typ {
			SchemaType::Mapping { unknown } => match value {
				Value::Null => Value::Null,
				Value::Object(object) => self.deserialize_mapping(object, unknown)?,
				other => return Err(self.invalid(format!("\"{}\" is not a mapping type", other))),
			},
			SchemaType::Sequence => match value {
				Value::Null => Value::Null,
				Value::Array(items) => self.deserialize_sequence(items)?,
				other => return Err(self.invalid(format!("\"{}\" is not iterable", other))),
			},
			typ => match value {
				Value::Null => Value::Null,
				Value::String(s) if s.is_empty() => Value::Null,
				other => typ.coerce(other).map_err(|msg| self.invalid(msg))?,
			},
		};

		if converted.is_null() {
			return match &self.missing {
				Missing::Required => Err(self.invalid(self.missing_msg.clone())),
				Missing::Null => Ok(Value::Null),
				Missing::Value(value) => Ok(value.clone()),
			};
		}

		if let Some(validator) = &self.validator {
			validator
				.validate(&converted)
				.map_err(|msg| self.invalid(msg))?;
		}
		Ok(converted)
	}

	fn deserialize_mapping(&self, object: &Map<String, Value>, unknown: UnknownPolicy) -> NodeResult<Value> {
		if unknown == UnknownPolicy::Raise {
			let unrecognized: Vec<String> = object
				.keys()
				.filter(|key| self.child(key).is_none())
				.map(|key| format!("\"{}\"", key))
				.collect();
			if !unrecognized.is_empty() {
				return Err(self.invalid(format!(
					"Unrecognized keys in mapping: {}",
					unrecognized.join(", ")
				)));
			}
		}

		let mut output = Map::new();
		let mut errors = Vec::new();
		for child in &self.children {
			let item = object.get(&child.name).unwrap_or(&Value::Null);
			match child.deserialize(item) {
				Ok(converted) => {
					output.insert(child.name.clone(), converted);
				}
				Err(error) => errors.push(error),
			}
		}
		if unknown == UnknownPolicy::Preserve {
			self.preserve_unknown(object, &mut output);
		}

		if errors.is_empty() {
			Ok(Value::Object(output))
		} else {
			Err(Invalid::with_children(self.name.clone(), errors))
		}
	}

	fn deserialize_sequence(&self, items: &[Value]) -> NodeResult<Value> {
		let Some(node) = self.children.first() else {
			return Ok(Value::Array(items.to_vec()));
		};
		let mut output = Vec::with_capacity(items.len());
		let mut errors = Vec::new();
		for (index, item) in items.iter().enumerate() {
			match node.deserialize(item) {
				Ok(converted) => output.push(converted),
				Err(error) => errors.push(error.at(index.to_string())),
			}
		}
		if errors.is_empty() {
			Ok(Value::Array(output))
		} else {
			Err(Invalid::with_children(self.name.clone(), errors))
		}
	}

	fn preserve_unknown(&self, object: &Map<String, Value>, output: &mut Map<String, Value>) {
		for (key, value) in object {
			if self.child(key).is_none() {
				output.insert(key.clone(), value.clone());
			}
		}
	}

	fn invalid(&self, msg: impl Into<String>) -> Invalid {
		Invalid::new(self.name.clone(), msg)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sentinels::DeferredValue;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn pet() -> SchemaNode {
		SchemaNode::new(SchemaType::Mapping {
			unknown: UnknownPolicy::Raise,
		})
		.with_child(SchemaNode::new(SchemaType::Integer).with_name("id"))
		.with_child(
			SchemaNode::new(SchemaType::String)
				.with_name("name")
				.with_missing(Value::Null)
				.with_validator(Validator::length(Some(0), Some(5))),
		)
	}

	#[rstest]
	fn test_required_scalar_rejects_absence() {
		// Arrange
		let node = SchemaNode::new(SchemaType::Integer).with_name("id");

		// Act
		let result = node.deserialize(&Value::Null);

		// Assert
		assert_eq!(result, Err(Invalid::new("id", "Required")));
	}

	#[rstest]
	fn test_empty_string_counts_as_absent() {
		// Arrange
		let node = SchemaNode::new(SchemaType::String)
			.with_name("status")
			.with_missing(json!("active"));

		// Act & Assert
		assert_eq!(node.deserialize(&json!("")), Ok(json!("active")));
	}

	#[rstest]
	fn test_missing_value_skips_validator() {
		// Arrange
		let node = SchemaNode::new(SchemaType::String)
			.with_missing(json!("far too long"))
			.with_validator(Validator::length(None, Some(3)));

		// Act & Assert
		assert_eq!(node.deserialize(&Value::Null), Ok(json!("far too long")));
		assert!(node.deserialize(&json!("abcd")).is_err());
	}

	#[rstest]
	fn test_serialize_uses_default_for_absent() {
		// Arrange
		let node = SchemaNode::mapping()
			.with_child(
				SchemaNode::new(SchemaType::String)
					.with_name("status")
					.with_default(json!("active")),
			)
			.with_child(
				SchemaNode::new(SchemaType::Integer)
					.with_name("seq")
					.with_default(SchemaDefault::Deferred(DeferredValue::new(|| json!(3)))),
			)
			.with_child(SchemaNode::new(SchemaType::String).with_name("note"));

		// Act
		let rendered = node.serialize(&json!({})).unwrap();

		// Assert
		assert_eq!(rendered, json!({"status": "active", "seq": 3, "note": null}));
	}

	#[rstest]
	fn test_mapping_raise_rejects_unknown_keys(pet: SchemaNode) {
		// Act
		let error = pet.deserialize(&json!({"id": 1, "color": "red"})).unwrap_err();

		// Assert
		assert_eq!(error.asdict()[""], "Unrecognized keys in mapping: \"color\"");
	}

	#[rstest]
	#[case(UnknownPolicy::Ignore, json!({"id": 1}))]
	#[case(UnknownPolicy::Preserve, json!({"id": 1, "color": "red"}))]
	fn test_mapping_unknown_policies(#[case] unknown: UnknownPolicy, #[case] expected: Value) {
		// Arrange
		let node = SchemaNode::new(SchemaType::Mapping { unknown })
			.with_child(SchemaNode::new(SchemaType::Integer).with_name("id"));

		// Act
		let result = node.deserialize(&json!({"id": "1", "color": "red"}));

		// Assert
		assert_eq!(result, Ok(expected));
	}

	#[rstest]
	fn test_absent_optional_field_yields_null(pet: SchemaNode) {
		// Act
		let result = pet.deserialize(&json!({"id": 1}));

		// Assert
		assert_eq!(result, Ok(json!({"id": 1, "name": null})));
	}

	#[rstest]
	fn test_sequence_errors_are_keyed_by_position(pet: SchemaNode) {
		// Arrange
		let pets = SchemaNode::sequence(pet).with_name("pets");
		let outer = SchemaNode::mapping().with_child(pets);

		// Act
		let error = outer
			.deserialize(&json!({"pets": [{"id": 1}, {"id": 2, "name": "Bartholomew"}]}))
			.unwrap_err();

		// Assert
		let flat = error.asdict();
		assert_eq!(flat.len(), 1);
		assert_eq!(flat["pets.1.name"], "Longer than maximum length 5");
	}

	#[rstest]
	fn test_sequence_rejects_non_arrays(pet: SchemaNode) {
		// Arrange
		let pets = SchemaNode::sequence(pet).with_name("pets");

		// Act & Assert
		assert!(pets.deserialize(&json!({"id": 1})).is_err());
		assert_eq!(pets.serialize(&Value::Null), Ok(json!([])));
	}

	#[rstest]
	fn test_child_mut_edits_in_place(mut pet: SchemaNode) {
		// Act
		if let Some(name) = pet.child_mut("name") {
			name.missing = Missing::Value(json!("unnamed"));
		}

		// Assert
		assert_eq!(pet.deserialize(&json!({"id": 1})), Ok(json!({"id": 1, "name": "unnamed"})));
		assert_eq!(pet.child_names(), vec!["id", "name"]);
	}
}
