//! Declarative overrides attached to column and relationship declarations
//!
//! Keyword arguments whose name starts with [`DECLARATIVE_PREFIX`] are
//! collected, prefix stripped, into an [`OverrideRegistry`] stored in the
//! declaration's `info` under [`INFO_KEY`]. Every other keyword argument is
//! applied to the declaration as a regular option.
//!
//! ```
//! use reinhardt_mapper::{Column, StorageType};
//! use reinhardt_model_schema::declarative::{self, registry_of};
//! use reinhardt_model_schema::OverrideValue;
//! use serde_json::json;
//!
//! let column = declarative::column(
//!     Column::new("name", StorageType::string(50)),
//!     [
//!         ("schema_missing", OverrideValue::from(json!("anonymous"))),
//!         ("nullable", OverrideValue::from(false)),
//!     ],
//! );
//!
//! assert!(!column.nullable);
//! assert_eq!(
//!     registry_of(&column.info).get("missing"),
//!     Some(&OverrideValue::from(json!("anonymous")))
//! );
//! ```

use crate::overrides::{OverrideRegistry, OverrideValue};
use reinhardt_mapper::{Column, Info, Relationship, RelationshipTarget};
use serde_json::Value;

/// Prefix marking a keyword argument as a schema override
pub const DECLARATIVE_PREFIX: &str = "schema_";

/// `info` key the override registry is stored under
pub const INFO_KEY: &str = "reinhardt_schema";

/// Ordered keyword arguments of a declaration
pub type KwArgs = Vec<(String, OverrideValue)>;

/// Build a column, moving prefixed keyword arguments into its override
/// registry
pub fn column<K, I>(base: Column, kwargs: I) -> Column
where
	K: Into<String>,
	I: IntoIterator<Item = (K, OverrideValue)>,
{
	let (registry, options) = split_kwargs(kwargs);
	let mut column = base;
	for (key, value) in options {
		column.set_option(&key, value);
	}
	column.info.insert(INFO_KEY, registry);
	column
}

/// Build a relationship, moving prefixed keyword arguments into its
/// override registry
///
/// # Examples
///
/// ```
/// use reinhardt_mapper::{Column, MappedClass, StorageType};
/// use reinhardt_model_schema::declarative::{self, registry_of};
/// use reinhardt_model_schema::OverrideValue;
///
/// let pet = MappedClass::builder("Pet")
///     .column(Column::new("id", StorageType::Integer).primary_key())
///     .build();
///
/// let pets = declarative::relationship(
///     pet,
///     Some("person_pets"),
///     [
///         ("schema_includes", OverrideValue::names(["id"])),
///         ("back_populates", OverrideValue::from("owner")),
///     ],
/// );
///
/// assert_eq!(pets.secondary.as_deref(), Some("person_pets"));
/// assert_eq!(pets.back_populates.as_deref(), Some("owner"));
/// assert!(registry_of(&pets.info).contains_key("includes"));
/// ```
pub fn relationship<K, I>(
	target: impl Into<RelationshipTarget>,
	secondary: Option<&str>,
	kwargs: I,
) -> Relationship
where
	K: Into<String>,
	I: IntoIterator<Item = (K, OverrideValue)>,
{
	let (registry, options) = split_kwargs(kwargs);
	let mut relationship = Relationship::new(target);
	if let Some(secondary) = secondary {
		relationship = relationship.with_secondary(secondary);
	}
	for (key, value) in options {
		relationship.set_option(&key, value);
	}
	relationship.info.insert(INFO_KEY, registry);
	relationship
}

/// Override registry stored in `info`, empty when there is none
pub fn registry_of(info: &Info) -> OverrideRegistry {
	registry_at(info, INFO_KEY)
}

/// Override registry stored in `info` under `key`
pub fn registry_at(info: &Info, key: &str) -> OverrideRegistry {
	info.get_as::<OverrideRegistry>(key)
		.cloned()
		.unwrap_or_default()
}

fn split_kwargs<K, I>(kwargs: I) -> (OverrideRegistry, Vec<(String, Value)>)
where
	K: Into<String>,
	I: IntoIterator<Item = (K, OverrideValue)>,
{
	let mut registry = OverrideRegistry::new();
	let mut options = Vec::new();
	for (key, value) in kwargs {
		let key = key.into();
		if let Some(stripped) = key.strip_prefix(DECLARATIVE_PREFIX) {
			registry.insert(stripped, value);
			continue;
		}
		match value.to_json() {
			Some(json) => options.push((key, json)),
			None => tracing::warn!(option = %key, "dropping non-JSON value for declaration option"),
		}
	}
	(registry, options)
}
