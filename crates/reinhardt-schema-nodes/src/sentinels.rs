//! Missing-value and default-value sentinels
//!
//! `Value::Null` stands for "absent" throughout the node API. These types
//! decide what a node produces when it meets an absent value.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// What deserialization yields for an absent value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Missing {
	/// Absence is a validation error
	#[default]
	Required,
	/// Absence yields the absent sentinel
	Null,
	/// Absence yields this value; validators are not run on it
	Value(Value),
}

impl From<Value> for Missing {
	fn from(value: Value) -> Self {
		match value {
			Value::Null => Missing::Null,
			value => Missing::Value(value),
		}
	}
}

/// Value computed each time a default is needed
#[derive(Clone)]
pub struct DeferredValue(Arc<dyn Fn() -> Value + Send + Sync>);

impl DeferredValue {
	pub fn new<F>(f: F) -> Self
	where
		F: Fn() -> Value + Send + Sync + 'static,
	{
		Self(Arc::new(f))
	}

	pub fn call(&self) -> Value {
		(self.0)()
	}
}

impl fmt::Debug for DeferredValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("DeferredValue(..)")
	}
}

impl PartialEq for DeferredValue {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

/// What serialization emits for an absent value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SchemaDefault {
	/// Emit the absent sentinel
	#[default]
	Null,
	Value(Value),
	Deferred(DeferredValue),
}

impl SchemaDefault {
	/// The default as a concrete value
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_schema_nodes::{DeferredValue, SchemaDefault};
	/// use serde_json::{Value, json};
	///
	/// assert_eq!(SchemaDefault::Null.resolve(), Value::Null);
	/// assert_eq!(SchemaDefault::Value(json!(3)).resolve(), json!(3));
	/// assert_eq!(SchemaDefault::Deferred(DeferredValue::new(|| json!("now"))).resolve(), json!("now"));
	/// ```
	pub fn resolve(&self) -> Value {
		match self {
			SchemaDefault::Null => Value::Null,
			SchemaDefault::Value(value) => value.clone(),
			SchemaDefault::Deferred(deferred) => deferred.call(),
		}
	}
}

impl From<Value> for SchemaDefault {
	fn from(value: Value) -> Self {
		match value {
			Value::Null => SchemaDefault::Null,
			value => SchemaDefault::Value(value),
		}
	}
}
