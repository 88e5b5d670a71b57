//! Schema nodes for column attributes

use crate::error::{SchemaError, SchemaResult};
use crate::overrides::{self, OverrideLayers, OverrideValue};
use reinhardt_mapper::{Column, ColumnDefault, StorageType};
use reinhardt_schema_nodes::{
	DeferredValue, Missing, SchemaDefault, SchemaNode, SchemaType, Validator,
};
use std::sync::Arc;

/// Keys computed from the column that no override may set
const RESERVED: &[&str] = &["name", "children"];

/// Keys handled before the remaining overrides are applied
const CONSUMED: &[&str] = &["exclude", "typ"];

/// Build the node for `column`, or `None` when an override excludes it
pub(crate) fn build_column_node(column: &Column, layers: &OverrideLayers<'_>) -> SchemaResult<Option<SchemaNode>> {
	let name = column.key.as_str();
	if layers.excluded() {
		tracing::debug!(column = name, "column skipped due to overrides");
		return Ok(None);
	}
	layers.check_reserved(RESERVED)?;

	let (typ, validator) = match layers.resolve("typ") {
		Some((origin, OverrideValue::Type(typ))) => {
			tracing::debug!(column = name, %origin, %typ, "column type overridden");
			(*typ, None)
		}
		Some(_) => return Err(layers.invalid("typ", "a schema type")),
		None => infer_type(name, &column.storage_type)?,
	};

	let mut node = SchemaNode::new(typ).with_name(name);
	node.validator = validator;
	node.default = schema_default(column.default.as_ref());
	node.missing = schema_missing(column);
	node.description = column.doc.clone();

	for (key, value) in layers.remaining(CONSUMED) {
		overrides::apply(&mut node, name, key, value)?;
	}
	Ok(Some(node))
}

/// Schema type and validator for a storage type
///
/// Type decorators are looked through. Enumerations become strings limited
/// to their values, bounded strings get a length validator.
pub fn infer_type(attribute: &str, storage_type: &StorageType) -> SchemaResult<(SchemaType, Option<Validator>)> {
	let inferred = match storage_type.unwrap_decorated() {
		StorageType::Boolean => (SchemaType::Boolean, None),
		StorageType::Date => (SchemaType::Date, None),
		StorageType::DateTime => (SchemaType::DateTime, None),
		StorageType::Enum { values } => (SchemaType::String, Some(Validator::one_of(values.iter().cloned()))),
		StorageType::Float => (SchemaType::Float, None),
		StorageType::Integer | StorageType::SmallInteger | StorageType::BigInteger => (SchemaType::Integer, None),
		StorageType::String { length } => (SchemaType::String, Some(Validator::length(Some(0), *length))),
		StorageType::Text => (SchemaType::String, Some(Validator::length(Some(0), None))),
		StorageType::Numeric { .. } => (SchemaType::Decimal, None),
		StorageType::Time => (SchemaType::Time, None),
		other => {
			return Err(SchemaError::UnimplementedType {
				attribute: attribute.to_string(),
				type_name: other.type_name(),
			});
		}
	};
	Ok(inferred)
}

/// Value emitted for an absent attribute when serializing
fn schema_default(default: Option<&ColumnDefault>) -> SchemaDefault {
	match default {
		None => SchemaDefault::Null,
		Some(ColumnDefault::Callable(f)) => {
			let f = Arc::clone(f);
			SchemaDefault::Deferred(DeferredValue::new(move || f(None)))
		}
		Some(ColumnDefault::Scalar(value)) => SchemaDefault::from(value.clone()),
	}
}

/// Value accepted for an absent attribute when deserializing
///
/// Non-nullable columns are always required, whatever their default.
fn schema_missing(column: &Column) -> Missing {
	if !column.nullable {
		return Missing::Required;
	}
	match &column.default {
		Some(default) => Missing::from(default.arg(None)),
		None => Missing::Null,
	}
}
