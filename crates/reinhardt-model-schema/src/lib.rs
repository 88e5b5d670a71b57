//! # Reinhardt Model Schema
//!
//! Derives validation schemas from mapped class metadata.
//!
//! ## Overview
//!
//! [`ModelSchemaNode`] walks the attributes of a [`MappedClass`] and builds
//! one schema node per attribute:
//!
//! - columns become scalar nodes typed after their storage type, with
//!   defaults, missing values and validators taken from the column
//! - relationships become nested mapping nodes (single-valued) or
//!   sequences of them (list-valued), derived from the related class
//!
//! Every attribute can be customized in two places. Declarative overrides
//! are attached to the declaration through `schema_`-prefixed keyword
//! arguments (see [`declarative`]). Imperative overrides are passed when the
//! schema is built. Imperative overrides win over declarative ones, which
//! win over whatever is inferred from the metadata.
//!
//! ## Example
//!
//! ```
//! use reinhardt_mapper::{Column, MappedClass, StorageType};
//! use reinhardt_model_schema::{ModelSchemaNode, OverrideRegistry, OverrideValue, Overrides, declarative};
//! use serde_json::json;
//!
//! let person = MappedClass::builder("Person")
//!     .column(Column::new("id", StorageType::Integer).primary_key())
//!     .column(declarative::column(
//!         Column::new("name", StorageType::string(50)),
//!         [("schema_missing", OverrideValue::from(json!("declared")))],
//!     ))
//!     .build();
//!
//! let schema = ModelSchemaNode::builder(person)
//!     .overrides(Overrides::new().attribute(
//!         "name",
//!         OverrideRegistry::new().with("missing", json!("anonymous")),
//!     ))
//!     .build()
//!     .unwrap();
//!
//! let data = schema.deserialize(&json!({"id": 1})).unwrap();
//! assert_eq!(data["name"], "anonymous");
//! ```
//!
//! [`MappedClass`]: reinhardt_mapper::MappedClass

pub mod column;
pub mod declarative;
mod dictify;
pub mod error;
pub mod node;
pub mod overrides;
mod relationship;
pub mod settings;

pub use column::infer_type;
pub use declarative::{DECLARATIVE_PREFIX, INFO_KEY, KwArgs, registry_of};
pub use error::{AttributeKind, OverrideSource, SchemaError, SchemaResult};
pub use node::{ModelSchemaBuilder, ModelSchemaNode, SkipReason, Skipped};
pub use overrides::{OverrideLayers, OverrideRegistry, OverrideValue, Overrides};
pub use settings::{DEFAULT_MAX_DEPTH, DerivationSettings};
