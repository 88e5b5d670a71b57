//! Validators attached to schema nodes
//!
//! Validators run after type conversion, on the deserialized value. They
//! never run on values produced by [`Missing`](crate::Missing).

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Named user validation callback
#[derive(Clone)]
pub struct FunctionValidator {
	name: String,
	f: Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>,
}

impl FunctionValidator {
	pub fn name(&self) -> &str {
		&self.name
	}
}

impl fmt::Debug for FunctionValidator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "FunctionValidator({})", self.name)
	}
}

impl PartialEq for FunctionValidator {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.f, &other.f)
	}
}

/// Validator configuration
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
	/// Value must be one of `choices`
	OneOf(Vec<Value>),
	/// String character count or sequence length within bounds
	Length {
		min: Option<usize>,
		max: Option<usize>,
	},
	/// Numeric value within bounds
	Range {
		min: Option<f64>,
		max: Option<f64>,
	},
	/// Every validator must pass; failures are reported together
	All(Vec<Validator>),
	Function(FunctionValidator),
}

impl Validator {
	/// Membership validator
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_schema_nodes::Validator;
	/// use serde_json::json;
	///
	/// let status = Validator::one_of(["active", "inactive"]);
	/// assert!(status.validate(&json!("active")).is_ok());
	/// assert!(status.validate(&json!("deleted")).is_err());
	/// ```
	pub fn one_of<I, T>(choices: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<Value>,
	{
		Validator::OneOf(choices.into_iter().map(Into::into).collect())
	}

	/// Length validator with optional bounds
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_schema_nodes::Validator;
	/// use serde_json::json;
	///
	/// let name = Validator::length(Some(0), Some(3));
	/// assert!(name.validate(&json!("abc")).is_ok());
	/// assert!(name.validate(&json!("abcd")).is_err());
	/// ```
	pub fn length(min: Option<usize>, max: Option<usize>) -> Self {
		Validator::Length { min, max }
	}

	pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
		Validator::Range { min, max }
	}

	/// Validator backed by a callback returning an error message on failure
	pub fn function<F>(name: impl Into<String>, f: F) -> Self
	where
		F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
	{
		Validator::Function(FunctionValidator {
			name: name.into(),
			f: Arc::new(f),
		})
	}

	/// Check `value`, returning the failure message
	pub fn validate(&self, value: &Value) -> Result<(), String> {
		match self {
			Validator::OneOf(choices) => {
				if choices.contains(value) {
					Ok(())
				} else {
					let rendered: Vec<String> = choices.iter().map(render).collect();
					Err(format!(
						"\"{}\" is not one of {}",
						render(value),
						rendered.join(", ")
					))
				}
			}
			Validator::Length { min, max } => {
				let length = match value {
					Value::String(s) => s.chars().count(),
					Value::Array(items) => items.len(),
					other => return Err(format!("\"{}\" has no length", render(other))),
				};
				if let Some(min) = min
					&& length < *min
				{
					return Err(format!("Shorter than minimum length {}", min));
				}
				if let Some(max) = max
					&& length > *max
				{
					return Err(format!("Longer than maximum length {}", max));
				}
				Ok(())
			}
			Validator::Range { min, max } => {
				let number = value
					.as_f64()
					.or_else(|| value.as_str().and_then(|s| s.parse::<f64>().ok()))
					.ok_or_else(|| format!("\"{}\" is not a number", render(value)))?;
				if let Some(min) = min
					&& number < *min
				{
					return Err(format!("{} is less than minimum value {}", render(value), min));
				}
				if let Some(max) = max
					&& number > *max
				{
					return Err(format!(
						"{} is greater than maximum value {}",
						render(value),
						max
					));
				}
				Ok(())
			}
			Validator::All(validators) => {
				let failures: Vec<String> = validators
					.iter()
					.filter_map(|validator| validator.validate(value).err())
					.collect();
				if failures.is_empty() {
					Ok(())
				} else {
					Err(failures.join("; "))
				}
			}
			Validator::Function(function) => (function.f)(value),
		}
	}
}

// Strings render without JSON quotes so messages read naturally.
fn render(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}
