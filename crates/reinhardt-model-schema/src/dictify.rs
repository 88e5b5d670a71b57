//! Shallow projection of mapped objects

use crate::error::SchemaResult;
use crate::node::ModelSchemaNode;
use reinhardt_mapper::{AttributeValue, MappedObject};
use serde_json::{Map, Value};

impl ModelSchemaNode {
	/// Project `object` onto the attributes of this schema
	///
	/// Columns are copied as they are. Related objects are reduced to their
	/// primary key values: an unset single-valued relationship becomes
	/// `Value::Null`, a collection becomes an array in collection order.
	/// Related objects are never projected further than their keys.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_mapper::{Column, MappedClass, Record, Relationship, StorageType};
	/// use reinhardt_model_schema::ModelSchemaNode;
	/// use serde_json::json;
	/// use std::sync::Arc;
	///
	/// let pet = MappedClass::builder("Pet")
	///     .column(Column::new("id", StorageType::Integer).primary_key())
	///     .column(Column::new("name", StorageType::string(30)))
	///     .build();
	/// let person = MappedClass::builder("Person")
	///     .column(Column::new("id", StorageType::Integer).primary_key())
	///     .relationship("pets", Relationship::new(Arc::clone(&pet)))
	///     .build();
	///
	/// let alice = Record::new(Arc::clone(&person))
	///     .set("id", json!(1))
	///     .push_related("pets", Record::new(pet).set("id", json!(7)).set("name", json!("Rex")));
	///
	/// let schema = ModelSchemaNode::new(person).unwrap();
	/// let projected = schema.dictify(&alice).unwrap();
	/// assert_eq!(serde_json::Value::Object(projected), json!({"id": 1, "pets": [{"id": 7}]}));
	/// ```
	pub fn dictify(&self, object: &dyn MappedObject) -> SchemaResult<Map<String, Value>> {
		let mut projected = Map::new();
		for name in self.class().attribute_names() {
			if self.child(name).is_none() {
				continue;
			}
			let value = match object.attribute(name)? {
				AttributeValue::Scalar(value) => value,
				AttributeValue::Object(None) => Value::Null,
				AttributeValue::Object(Some(related)) => Value::Object(related.primary_key_values()?),
				AttributeValue::Collection(items) => Value::Array(
					items
						.into_iter()
						.map(|related| related.primary_key_values().map(Value::Object))
						.collect::<Result<Vec<_>, _>>()?,
				),
			};
			projected.insert(name.to_string(), value);
		}
		Ok(projected)
	}
}
