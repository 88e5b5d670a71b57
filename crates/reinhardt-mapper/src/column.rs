//! Column declarations

use crate::info::Info;
use crate::types::StorageType;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Execution context handed to callable column defaults
///
/// Carries the parameters of the statement being executed. Outside of
/// statement execution (for example while deriving a schema) callables
/// receive `None`.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
	pub parameters: Map<String, Value>,
}

/// Callable producing a column default
pub type DefaultFn = Arc<dyn Fn(Option<&ExecutionContext>) -> Value + Send + Sync>;

/// Default value specification of a column
#[derive(Clone)]
pub enum ColumnDefault {
	/// Literal value
	Scalar(Value),
	/// Value computed on each insert
	Callable(DefaultFn),
}

impl ColumnDefault {
	/// Callable default ignoring its context
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_mapper::ColumnDefault;
	/// use serde_json::json;
	///
	/// let default = ColumnDefault::callable(|| json!(42));
	/// assert!(default.is_callable());
	/// assert_eq!(default.arg(None), json!(42));
	/// ```
	pub fn callable<F>(f: F) -> Self
	where
		F: Fn() -> Value + Send + Sync + 'static,
	{
		ColumnDefault::Callable(Arc::new(move |_: Option<&ExecutionContext>| f()))
	}

	pub fn is_callable(&self) -> bool {
		matches!(self, ColumnDefault::Callable(_))
	}

	/// Evaluate the default: literal values are cloned, callables invoked with `context`
	pub fn arg(&self, context: Option<&ExecutionContext>) -> Value {
		match self {
			ColumnDefault::Scalar(value) => value.clone(),
			ColumnDefault::Callable(f) => f(context),
		}
	}
}

impl fmt::Debug for ColumnDefault {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ColumnDefault::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
			ColumnDefault::Callable(_) => f.write_str("Callable(..)"),
		}
	}
}

impl From<Value> for ColumnDefault {
	fn from(value: Value) -> Self {
		ColumnDefault::Scalar(value)
	}
}

/// A mapped column
///
/// `name` is the storage name, `key` the attribute name on the mapped
/// class. Both are the same unless the column is declared with an
/// explicit key.
#[derive(Debug, Clone)]
pub struct Column {
	pub name: String,
	pub key: String,
	pub storage_type: StorageType,
	pub nullable: bool,
	pub primary_key: bool,
	pub default: Option<ColumnDefault>,
	pub doc: Option<String>,
	pub info: Info,
	/// Keyword options the column itself does not interpret
	pub dialect_kwargs: Map<String, Value>,
}

impl Column {
	/// Create a nullable, non-key column
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_mapper::{Column, StorageType};
	///
	/// let column = Column::new("name", StorageType::string(50));
	/// assert_eq!(column.key, "name");
	/// assert!(column.nullable);
	/// assert!(!column.primary_key);
	/// ```
	pub fn new(name: impl Into<String>, storage_type: StorageType) -> Self {
		let name = name.into();
		Self {
			key: name.clone(),
			name,
			storage_type,
			nullable: true,
			primary_key: false,
			default: None,
			doc: None,
			info: Info::new(),
			dialect_kwargs: Map::new(),
		}
	}

	/// Mark the column as primary key
	///
	/// Primary key columns are not nullable unless told otherwise afterwards.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_mapper::{Column, StorageType};
	///
	/// let id = Column::new("id", StorageType::Integer).primary_key();
	/// assert!(id.primary_key);
	/// assert!(!id.nullable);
	/// ```
	pub fn primary_key(mut self) -> Self {
		self.primary_key = true;
		self.nullable = false;
		self
	}

	pub fn nullable(mut self, nullable: bool) -> Self {
		self.nullable = nullable;
		self
	}

	/// Shorthand for `nullable(false)`
	pub fn not_null(self) -> Self {
		self.nullable(false)
	}

	pub fn with_default(mut self, default: impl Into<ColumnDefault>) -> Self {
		self.default = Some(default.into());
		self
	}

	pub fn with_key(mut self, key: impl Into<String>) -> Self {
		self.key = key.into();
		self
	}

	pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
		self.doc = Some(doc.into());
		self
	}

	pub fn with_info(mut self, info: Info) -> Self {
		self.info = info;
		self
	}

	/// Apply a keyword option by name
	///
	/// `nullable`, `primary_key`, `key` and `doc` are understood when the
	/// value has the matching JSON shape; everything else lands in
	/// `dialect_kwargs` untouched.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_mapper::{Column, StorageType};
	/// use serde_json::json;
	///
	/// let mut column = Column::new("code", StorageType::string(8));
	/// column.set_option("nullable", json!(false));
	/// column.set_option("postgresql_using", json!("gin"));
	/// assert!(!column.nullable);
	/// assert_eq!(column.dialect_kwargs["postgresql_using"], json!("gin"));
	/// ```
	pub fn set_option(&mut self, key: &str, value: Value) {
		match (key, value) {
			("nullable", Value::Bool(nullable)) => self.nullable = nullable,
			("primary_key", Value::Bool(primary_key)) => {
				self.primary_key = primary_key;
				if primary_key {
					self.nullable = false;
				}
			}
			("key", Value::String(attribute_key)) => self.key = attribute_key,
			("doc", Value::String(doc)) => self.doc = Some(doc),
			(other, value) => {
				self.dialect_kwargs.insert(other.to_string(), value);
			}
		}
	}
}
