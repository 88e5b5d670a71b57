//! Schema derivation errors

use reinhardt_mapper::MapperError;
use std::fmt;
use thiserror::Error;

/// Result type for schema derivation.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Kind of mapped attribute an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
	Column,
	Relationship,
}

impl fmt::Display for AttributeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AttributeKind::Column => f.write_str("Column"),
			AttributeKind::Relationship => f.write_str("Relationship"),
		}
	}
}

/// Where an override came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideSource {
	/// Passed when the schema node is constructed
	Imperative,
	/// Attached to the column or relationship declaration
	Declarative,
}

impl fmt::Display for OverrideSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OverrideSource::Imperative => f.write_str("imperatively"),
			OverrideSource::Declarative => f.write_str("via declarative overrides"),
		}
	}
}

/// Schema derivation errors.
///
/// Every error aborts derivation of the node being built; no partially
/// derived node is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SchemaError {
	/// Attribute listed in both includes and excludes.
	#[error("attribute '{attribute}': excludes and includes are mutually exclusive")]
	IncludeExcludeConflict {
		/// Attribute name.
		attribute: String,
	},

	/// Override of a key that is always computed.
	#[error("{kind} {attribute}: {key} cannot be overridden {origin}")]
	ReservedOverride {
		/// Column or relationship.
		kind: AttributeKind,
		/// Attribute name.
		attribute: String,
		/// Reserved key.
		key: String,
		/// Override source that supplied the key.
		origin: OverrideSource,
	},

	/// Storage type with no schema type counterpart.
	#[error("Column {attribute}: unknown type: {type_name}")]
	UnimplementedType {
		/// Attribute name.
		attribute: String,
		/// Storage type name.
		type_name: String,
	},

	/// Override value of the wrong shape for its key.
	#[error("attribute '{attribute}': override '{key}' must be {expected}")]
	InvalidOverride {
		/// Attribute name.
		attribute: String,
		/// Override key.
		key: String,
		/// Expected shape.
		expected: &'static str,
	},

	/// Relationship recursion went past the configured depth.
	#[error("relationship depth limit {max_depth} exceeded while deriving '{class}'")]
	DepthExceeded {
		/// Class that would have been derived past the limit.
		class: String,
		/// Configured limit.
		max_depth: usize,
	},

	/// Metadata lookup failure.
	#[error(transparent)]
	Mapper(#[from] MapperError),

	/// Settings document could not be parsed.
	#[error("invalid derivation settings: {0}")]
	Settings(String),
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(
		SchemaError::ReservedOverride {
			kind: AttributeKind::Column,
			attribute: "name".to_string(),
			key: "children".to_string(),
			origin: OverrideSource::Imperative,
		},
		"Column name: children cannot be overridden imperatively"
	)]
	#[case(
		SchemaError::ReservedOverride {
			kind: AttributeKind::Relationship,
			attribute: "pets".to_string(),
			key: "typ".to_string(),
			origin: OverrideSource::Declarative,
		},
		"Relationship pets: typ cannot be overridden via declarative overrides"
	)]
	#[case(
		SchemaError::UnimplementedType {
			attribute: "payload".to_string(),
			type_name: "JSON".to_string(),
		},
		"Column payload: unknown type: JSON"
	)]
	fn test_error_messages(#[case] error: SchemaError, #[case] expected: &str) {
		assert_eq!(error.to_string(), expected);
	}

	#[rstest]
	fn test_mapper_errors_convert() {
		// Arrange
		let mapper = MapperError::UnresolvedTarget {
			target: "Pet".to_string(),
		};

		// Act
		let error: SchemaError = mapper.clone().into();

		// Assert
		assert_eq!(error, SchemaError::Mapper(mapper));
	}
}
