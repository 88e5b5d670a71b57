//! Storage types of mapped columns
//!
//! The variants mirror the generic SQL types of the ORM. Dialect-specific
//! types are expected to be expressed as a [`TypeDecorator`] over one of
//! these, so that consumers only ever need to understand the generic set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage type of a column
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageType {
	Boolean,
	Date,
	DateTime,
	/// Enumerated string restricted to `values`
	Enum {
		values: Vec<String>,
	},
	Float,
	Integer,
	SmallInteger,
	BigInteger,
	/// Variable length string, optionally bounded
	String {
		length: Option<usize>,
	},
	/// Unbounded text
	Text,
	/// Arbitrary precision number
	Numeric {
		precision: Option<u32>,
		scale: Option<u32>,
	},
	Time,
	Interval,
	LargeBinary,
	Json,
	/// Custom type wrapping an underlying storage type
	Decorated(TypeDecorator),
}

impl StorageType {
	/// Bounded string type
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_mapper::StorageType;
	///
	/// assert_eq!(
	///     StorageType::string(50),
	///     StorageType::String { length: Some(50) }
	/// );
	/// ```
	pub fn string(length: usize) -> Self {
		StorageType::String {
			length: Some(length),
		}
	}

	/// Enumerated type over the given values
	pub fn enumeration<I, S>(values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		StorageType::Enum {
			values: values.into_iter().map(Into::into).collect(),
		}
	}

	/// Numeric type without precision or scale
	pub fn numeric() -> Self {
		StorageType::Numeric {
			precision: None,
			scale: None,
		}
	}

	/// Strips every [`TypeDecorator`] layer and returns the type actually stored
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_mapper::{StorageType, TypeDecorator};
	///
	/// let slug = StorageType::Decorated(TypeDecorator::new("Slug", StorageType::string(64)));
	/// assert_eq!(slug.unwrap_decorated(), &StorageType::string(64));
	/// assert_eq!(StorageType::Integer.unwrap_decorated(), &StorageType::Integer);
	/// ```
	pub fn unwrap_decorated(&self) -> &StorageType {
		let mut current = self;
		while let StorageType::Decorated(decorator) = current {
			current = &decorator.impl_type;
		}
		current
	}

	/// SQL-ish name of the type, used in diagnostics
	pub fn type_name(&self) -> String {
		match self {
			StorageType::Boolean => "BOOLEAN".to_string(),
			StorageType::Date => "DATE".to_string(),
			StorageType::DateTime => "DATETIME".to_string(),
			StorageType::Enum { values } => format!("ENUM({})", values.join(", ")),
			StorageType::Float => "FLOAT".to_string(),
			StorageType::Integer => "INTEGER".to_string(),
			StorageType::SmallInteger => "SMALLINT".to_string(),
			StorageType::BigInteger => "BIGINT".to_string(),
			StorageType::String { length: Some(n) } => format!("VARCHAR({})", n),
			StorageType::String { length: None } => "VARCHAR".to_string(),
			StorageType::Text => "TEXT".to_string(),
			StorageType::Numeric {
				precision: Some(p),
				scale: Some(s),
			} => format!("NUMERIC({}, {})", p, s),
			StorageType::Numeric { .. } => "NUMERIC".to_string(),
			StorageType::Time => "TIME".to_string(),
			StorageType::Interval => "INTERVAL".to_string(),
			StorageType::LargeBinary => "BLOB".to_string(),
			StorageType::Json => "JSON".to_string(),
			StorageType::Decorated(decorator) => decorator.name.clone(),
		}
	}
}

impl fmt::Display for StorageType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.type_name())
	}
}

/// Custom column type delegating storage to `impl_type`
///
/// Based on SQLAlchemy's TypeDecorator: the decorator only changes how
/// values are bound and loaded, the stored representation is `impl_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecorator {
	pub name: String,
	pub impl_type: Box<StorageType>,
}

impl TypeDecorator {
	/// Create a decorator named `name` over `impl_type`
	pub fn new(name: impl Into<String>, impl_type: StorageType) -> Self {
		Self {
			name: name.into(),
			impl_type: Box::new(impl_type),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_unwrap_nested_decorators() {
		// Arrange
		let inner = StorageType::Decorated(TypeDecorator::new("Lower", StorageType::Text));
		let outer = StorageType::Decorated(TypeDecorator::new("Trimmed", inner));

		// Act
		let stored = outer.unwrap_decorated();

		// Assert
		assert_eq!(stored, &StorageType::Text);
		assert_eq!(outer.type_name(), "Trimmed");
	}

	#[rstest]
	#[case(StorageType::string(50), "VARCHAR(50)")]
	#[case(StorageType::String { length: None }, "VARCHAR")]
	#[case(StorageType::enumeration(["a", "b"]), "ENUM(a, b)")]
	#[case(StorageType::Numeric { precision: Some(10), scale: Some(2) }, "NUMERIC(10, 2)")]
	fn test_type_name(#[case] storage_type: StorageType, #[case] expected: &str) {
		assert_eq!(storage_type.to_string(), expected);
	}
}
