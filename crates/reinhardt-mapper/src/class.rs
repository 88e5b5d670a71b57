//! Mapped classes and their attribute metadata
//!
//! Similar to SQLAlchemy's mapper inspection: a [`MappedClass`] exposes its
//! attributes in declaration order, each one either a column or a
//! relationship.

use crate::column::Column;
use crate::error::{MapperError, MapperResult};
use crate::info::Info;
use crate::relationship::Relationship;
use std::sync::Arc;

/// One mapped attribute
#[derive(Debug, Clone)]
pub enum MapperProperty {
	Column(Column),
	Relationship(Relationship),
}

impl MapperProperty {
	/// Attribute key on the mapped class
	pub fn key(&self) -> &str {
		match self {
			MapperProperty::Column(column) => &column.key,
			MapperProperty::Relationship(relationship) => &relationship.key,
		}
	}

	pub fn info(&self) -> &Info {
		match self {
			MapperProperty::Column(column) => &column.info,
			MapperProperty::Relationship(relationship) => &relationship.info,
		}
	}

	pub fn as_column(&self) -> Option<&Column> {
		match self {
			MapperProperty::Column(column) => Some(column),
			MapperProperty::Relationship(_) => None,
		}
	}

	pub fn as_relationship(&self) -> Option<&Relationship> {
		match self {
			MapperProperty::Relationship(relationship) => Some(relationship),
			MapperProperty::Column(_) => None,
		}
	}
}

/// Metadata of a mapped class
#[derive(Debug, Clone)]
pub struct MappedClass {
	name: String,
	table_name: String,
	properties: Vec<MapperProperty>,
}

impl MappedClass {
	/// Start declaring a class
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_mapper::{Column, MappedClass, StorageType};
	///
	/// let person = MappedClass::builder("Person")
	///     .column(Column::new("id", StorageType::Integer).primary_key())
	///     .column(Column::new("name", StorageType::string(50)).not_null())
	///     .build();
	///
	/// assert_eq!(person.table_name(), "person");
	/// assert_eq!(person.attribute_names(), vec!["id", "name"]);
	/// ```
	pub fn builder(name: impl Into<String>) -> MappedClassBuilder {
		MappedClassBuilder::new(name)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn table_name(&self) -> &str {
		&self.table_name
	}

	/// All attributes in declaration order
	pub fn attrs(&self) -> &[MapperProperty] {
		&self.properties
	}

	pub fn attribute_names(&self) -> Vec<&str> {
		self.properties.iter().map(MapperProperty::key).collect()
	}

	/// Column attributes in declaration order
	pub fn column_attrs(&self) -> impl Iterator<Item = &Column> {
		self.properties.iter().filter_map(MapperProperty::as_column)
	}

	/// Relationship attributes in declaration order
	pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
		self.properties
			.iter()
			.filter_map(MapperProperty::as_relationship)
	}

	/// Look up an attribute by key
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_mapper::{Column, MappedClass, MapperError, StorageType};
	///
	/// let tag = MappedClass::builder("Tag")
	///     .column(Column::new("id", StorageType::Integer).primary_key())
	///     .build();
	///
	/// assert!(tag.attribute("id").is_ok());
	/// assert!(matches!(
	///     tag.attribute("label"),
	///     Err(MapperError::UnknownAttribute { .. })
	/// ));
	/// ```
	pub fn attribute(&self, key: &str) -> MapperResult<&MapperProperty> {
		self.properties
			.iter()
			.find(|property| property.key() == key)
			.ok_or_else(|| MapperError::UnknownAttribute {
				class: self.name.clone(),
				attribute: key.to_string(),
			})
	}

	/// Primary key columns in declaration order
	pub fn primary_key(&self) -> Vec<&Column> {
		self.column_attrs().filter(|column| column.primary_key).collect()
	}
}

/// Builder for [`MappedClass`]
#[derive(Debug)]
pub struct MappedClassBuilder {
	name: String,
	table_name: Option<String>,
	properties: Vec<MapperProperty>,
}

impl MappedClassBuilder {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			table_name: None,
			properties: Vec::new(),
		}
	}

	/// Table name; defaults to the lowercased class name
	pub fn table(mut self, table_name: impl Into<String>) -> Self {
		self.table_name = Some(table_name.into());
		self
	}

	/// Map a column under its key
	pub fn column(self, column: Column) -> Self {
		self.property(MapperProperty::Column(column))
	}

	/// Map a relationship under `key`
	pub fn relationship(self, key: impl Into<String>, mut relationship: Relationship) -> Self {
		relationship.key = key.into();
		self.property(MapperProperty::Relationship(relationship))
	}

	// A key declared twice keeps its original position.
	fn property(mut self, property: MapperProperty) -> Self {
		match self
			.properties
			.iter()
			.position(|existing| existing.key() == property.key())
		{
			Some(index) => self.properties[index] = property,
			None => self.properties.push(property),
		}
		self
	}

	pub fn build(self) -> Arc<MappedClass> {
		let table_name = self
			.table_name
			.unwrap_or_else(|| self.name.to_lowercase());
		Arc::new(MappedClass {
			name: self.name,
			table_name,
			properties: self.properties,
		})
	}
}
