//! Runtime instances of mapped classes

use crate::class::{MappedClass, MapperProperty};
use crate::error::MapperResult;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Value of one attribute read from an instance
#[derive(Debug)]
pub enum AttributeValue<'a> {
	/// Column value; `Value::Null` when unset
	Scalar(Value),
	/// Single related object; `None` when unset
	Object(Option<&'a dyn MappedObject>),
	/// Related objects in collection order
	Collection(Vec<&'a dyn MappedObject>),
}

/// An instance of a mapped class
pub trait MappedObject: std::fmt::Debug + Send + Sync {
	fn mapped_class(&self) -> &MappedClass;

	/// Read attribute `key`
	///
	/// Fails with [`MapperError::UnknownAttribute`](crate::MapperError::UnknownAttribute)
	/// when the class does not map `key`.
	fn attribute(&self, key: &str) -> MapperResult<AttributeValue<'_>>;

	/// Primary key values keyed by column key
	fn primary_key_values(&self) -> MapperResult<Map<String, Value>> {
		let mut values = Map::new();
		for column in self.mapped_class().primary_key() {
			let value = match self.attribute(&column.key)? {
				AttributeValue::Scalar(value) => value,
				_ => Value::Null,
			};
			values.insert(column.key.clone(), value);
		}
		Ok(values)
	}
}

/// Stored value of a [`Record`] attribute
#[derive(Debug, Clone)]
pub enum RecordValue {
	Scalar(Value),
	Object(Option<Box<Record>>),
	Collection(Vec<Record>),
}

/// Generic in-memory instance of a mapped class
///
/// # Examples
///
/// ```
/// use reinhardt_mapper::{AttributeValue, Column, MappedClass, MappedObject, Record, StorageType};
/// use serde_json::json;
///
/// let pet = MappedClass::builder("Pet")
///     .column(Column::new("id", StorageType::Integer).primary_key())
///     .column(Column::new("name", StorageType::string(30)))
///     .build();
///
/// let rex = Record::new(pet).set("id", json!(1)).set("name", json!("Rex"));
/// assert!(matches!(rex.attribute("name").unwrap(), AttributeValue::Scalar(v) if v == json!("Rex")));
/// assert_eq!(rex.primary_key_values().unwrap()["id"], json!(1));
/// ```
#[derive(Debug, Clone)]
pub struct Record {
	class: Arc<MappedClass>,
	values: BTreeMap<String, RecordValue>,
}

impl Record {
	pub fn new(class: Arc<MappedClass>) -> Self {
		Self {
			class,
			values: BTreeMap::new(),
		}
	}

	/// Set a column value
	pub fn set(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), RecordValue::Scalar(value));
		self
	}

	/// Set a single related object
	pub fn set_related(mut self, key: impl Into<String>, related: Record) -> Self {
		self.values
			.insert(key.into(), RecordValue::Object(Some(Box::new(related))));
		self
	}

	/// Append to a related collection
	pub fn push_related(mut self, key: impl Into<String>, related: Record) -> Self {
		let entry = self
			.values
			.entry(key.into())
			.or_insert_with(|| RecordValue::Collection(Vec::new()));
		match entry {
			RecordValue::Collection(items) => items.push(related),
			other => *other = RecordValue::Collection(vec![related]),
		}
		self
	}

	pub fn class(&self) -> &Arc<MappedClass> {
		&self.class
	}
}

impl MappedObject for Record {
	fn mapped_class(&self) -> &MappedClass {
		&self.class
	}

	fn attribute(&self, key: &str) -> MapperResult<AttributeValue<'_>> {
		let property = self.class.attribute(key)?;
		let value = match self.values.get(key) {
			Some(RecordValue::Scalar(value)) => AttributeValue::Scalar(value.clone()),
			Some(RecordValue::Object(related)) => {
				AttributeValue::Object(related.as_deref().map(|r| r as &dyn MappedObject))
			}
			Some(RecordValue::Collection(items)) => AttributeValue::Collection(
				items.iter().map(|r| r as &dyn MappedObject).collect(),
			),
			None => match property {
				MapperProperty::Column(_) => AttributeValue::Scalar(Value::Null),
				MapperProperty::Relationship(relationship) if relationship.uselist => {
					AttributeValue::Collection(Vec::new())
				}
				MapperProperty::Relationship(_) => AttributeValue::Object(None),
			},
		};
		Ok(value)
	}
}
