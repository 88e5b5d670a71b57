//! # Reinhardt Schema
//!
//! Validation and serialization schemas derived from mapped classes.
//!
//! Describing a model once as a mapped class is enough: its columns and
//! relationships already state types, nullability, defaults and
//! cardinality, so the schema that validates and renders instances of the
//! model is derived from that metadata instead of written a second time.
//!
//! ## Crates
//!
//! - [`mapper`]: mapped class metadata (columns, relationships, instances)
//! - [`nodes`]: schema nodes, types, validators and validation errors
//! - [`schema`]: schema derivation and declarative overrides
//!
//! ## Quick Example
//!
//! ```
//! use reinhardt_schema::prelude::*;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let pet = MappedClass::builder("Pet")
//!     .column(Column::new("id", StorageType::Integer).primary_key())
//!     .column(Column::new("name", StorageType::string(30)))
//!     .build();
//!
//! let person = MappedClass::builder("Person")
//!     .column(Column::new("id", StorageType::Integer).primary_key())
//!     .column(Column::new("name", StorageType::string(50)).not_null())
//!     .column(
//!         Column::new("status", StorageType::enumeration(["active", "inactive"]))
//!             .with_default(json!("active")),
//!     )
//!     .relationship("pets", Relationship::new(Arc::clone(&pet)))
//!     .build();
//!
//! let schema = ModelSchemaNode::new(Arc::clone(&person)).unwrap();
//!
//! let alice = Record::new(person)
//!     .set("id", json!(1))
//!     .set("name", json!("Alice"))
//!     .push_related("pets", Record::new(pet).set("id", json!(7)));
//!
//! let projected = schema.dictify(&alice).unwrap();
//! let data = schema.deserialize(&serde_json::Value::Object(projected)).unwrap();
//! assert_eq!(data["status"], "active");
//! assert_eq!(data["pets"], json!([{"id": 7, "name": null}]));
//! ```

pub mod mapper;
pub mod nodes;
pub mod schema;

pub use reinhardt_model_schema::{
	DerivationSettings, ModelSchemaBuilder, ModelSchemaNode, OverrideRegistry, OverrideValue,
	Overrides, SchemaError, SchemaResult, declarative,
};

/// Commonly used types
pub mod prelude {
	pub use reinhardt_mapper::{
		AttributeValue, ClassRegistry, Column, ColumnDefault, MappedClass, MappedObject,
		MapperProperty, Record, Relationship, StorageType, TypeDecorator,
	};
	pub use reinhardt_model_schema::{
		DerivationSettings, ModelSchemaNode, OverrideRegistry, OverrideValue, Overrides,
		SchemaError, declarative,
	};
	pub use reinhardt_schema_nodes::{
		Invalid, Missing, SchemaDefault, SchemaNode, SchemaType, UnknownPolicy, Validator,
	};
}
