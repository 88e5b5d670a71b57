//! Schema node types and scalar conversion
//!
//! Scalar values are carried as JSON. Conversion accepts the lenient
//! inputs a form or query string would produce (numbers as strings,
//! `"false"`/`"0"` for booleans) and emits a canonical JSON form:
//! - Integer and Float as JSON numbers
//! - Decimal as a normalized string, so no precision is lost
//! - Date as `YYYY-MM-DD`, Time as `HH:MM:SS[.fff]`
//! - DateTime as RFC 3339, naive inputs taken as UTC

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

/// How a mapping treats keys that have no child node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPolicy {
	/// Drop unknown keys
	#[default]
	Ignore,
	/// Reject the mapping
	Raise,
	/// Keep unknown keys as they are
	Preserve,
}

impl FromStr for UnknownPolicy {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"ignore" => Ok(UnknownPolicy::Ignore),
			"raise" => Ok(UnknownPolicy::Raise),
			"preserve" => Ok(UnknownPolicy::Preserve),
			other => Err(format!("unknown policy must be ignore, raise or preserve, got '{}'", other)),
		}
	}
}

impl fmt::Display for UnknownPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			UnknownPolicy::Ignore => "ignore",
			UnknownPolicy::Raise => "raise",
			UnknownPolicy::Preserve => "preserve",
		};
		f.write_str(name)
	}
}

/// Type of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaType {
	Mapping {
		#[serde(default)]
		unknown: UnknownPolicy,
	},
	Sequence,
	Boolean,
	Date,
	DateTime,
	String,
	Float,
	Integer,
	Decimal,
	Time,
}

impl SchemaType {
	/// Mapping ignoring unknown keys
	pub fn mapping() -> Self {
		SchemaType::Mapping {
			unknown: UnknownPolicy::Ignore,
		}
	}

	pub fn type_name(&self) -> &'static str {
		match self {
			SchemaType::Mapping { .. } => "mapping",
			SchemaType::Sequence => "sequence",
			SchemaType::Boolean => "boolean",
			SchemaType::Date => "date",
			SchemaType::DateTime => "datetime",
			SchemaType::String => "string",
			SchemaType::Float => "float",
			SchemaType::Integer => "integer",
			SchemaType::Decimal => "decimal",
			SchemaType::Time => "time",
		}
	}

	pub fn is_scalar(&self) -> bool {
		!matches!(self, SchemaType::Mapping { .. } | SchemaType::Sequence)
	}

	/// Convert a non-null scalar to this type's canonical form
	///
	/// Returns the failure message when `value` cannot be converted.
	/// Calling this on a mapping or sequence type returns `value` unchanged.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_schema_nodes::SchemaType;
	/// use serde_json::json;
	///
	/// assert_eq!(SchemaType::Integer.coerce(&json!("42")), Ok(json!(42)));
	/// assert_eq!(SchemaType::Decimal.coerce(&json!(1.50)), Ok(json!("1.5")));
	/// assert_eq!(SchemaType::Date.coerce(&json!("2024-02-29")), Ok(json!("2024-02-29")));
	/// assert!(SchemaType::Date.coerce(&json!("2023-02-29")).is_err());
	/// ```
	pub fn coerce(&self, value: &Value) -> Result<Value, String> {
		match self {
			SchemaType::Mapping { .. } | SchemaType::Sequence => Ok(value.clone()),
			SchemaType::String => coerce_string(value),
			SchemaType::Boolean => coerce_boolean(value),
			SchemaType::Integer => coerce_integer(value),
			SchemaType::Float => coerce_float(value),
			SchemaType::Decimal => coerce_decimal(value),
			SchemaType::Date => coerce_date(value),
			SchemaType::DateTime => coerce_datetime(value),
			SchemaType::Time => coerce_time(value),
		}
	}
}

impl fmt::Display for SchemaType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.type_name())
	}
}

fn render(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

fn coerce_string(value: &Value) -> Result<Value, String> {
	match value {
		Value::String(_) => Ok(value.clone()),
		Value::Number(n) => Ok(Value::String(n.to_string())),
		Value::Bool(b) => Ok(Value::String(b.to_string())),
		other => Err(format!("{} is not a string", other)),
	}
}

fn coerce_boolean(value: &Value) -> Result<Value, String> {
	match value {
		Value::Bool(_) => Ok(value.clone()),
		Value::String(s) => {
			let lowered = s.trim().to_lowercase();
			Ok(Value::Bool(!matches!(lowered.as_str(), "false" | "0")))
		}
		Value::Number(n) => Ok(Value::Bool(n.as_f64() != Some(0.0))),
		other => Err(format!("{} is neither in (\"false\", \"0\") nor a boolean", other)),
	}
}

fn coerce_integer(value: &Value) -> Result<Value, String> {
	let not_a_number = || format!("\"{}\" is not a number", render(value));
	match value {
		Value::Number(n) if n.is_i64() || n.is_u64() => Ok(value.clone()),
		Value::Number(n) => match n.as_f64() {
			Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Value::from(f as i64)),
			_ => Err(not_a_number()),
		},
		Value::String(s) => s
			.trim()
			.parse::<i64>()
			.map(Value::from)
			.map_err(|_| not_a_number()),
		_ => Err(not_a_number()),
	}
}

fn coerce_float(value: &Value) -> Result<Value, String> {
	let not_a_number = || format!("\"{}\" is not a number", render(value));
	let parsed = match value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse::<f64>().ok(),
		_ => None,
	};
	parsed
		.and_then(Number::from_f64)
		.map(Value::Number)
		.ok_or_else(not_a_number)
}

fn coerce_decimal(value: &Value) -> Result<Value, String> {
	let not_a_number = || format!("\"{}\" is not a number", render(value));
	let text = match value {
		Value::Number(n) => n.to_string(),
		Value::String(s) => s.trim().to_string(),
		_ => return Err(not_a_number()),
	};
	Decimal::from_str(&text)
		.or_else(|_| Decimal::from_scientific(&text))
		.map(|d| Value::String(d.normalize().to_string()))
		.map_err(|_| not_a_number())
}

fn coerce_date(value: &Value) -> Result<Value, String> {
	let text = value
		.as_str()
		.ok_or_else(|| format!("Invalid date: {}", value))?
		.trim();
	let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
		.ok()
		.or_else(|| parse_datetime(text).map(|dt| dt.date_naive()))
		.ok_or_else(|| format!("Invalid date: \"{}\"", text))?;
	Ok(Value::String(date.format("%Y-%m-%d").to_string()))
}

fn coerce_datetime(value: &Value) -> Result<Value, String> {
	let text = value
		.as_str()
		.ok_or_else(|| format!("Invalid date: {}", value))?
		.trim();
	let datetime = parse_datetime(text)
		.or_else(|| {
			NaiveDate::parse_from_str(text, "%Y-%m-%d")
				.ok()
				.and_then(|d| d.and_hms_opt(0, 0, 0))
				.map(|naive| naive.and_utc())
		})
		.ok_or_else(|| format!("Invalid date: \"{}\"", text))?;
	Ok(Value::String(datetime.to_rfc3339()))
}

fn coerce_time(value: &Value) -> Result<Value, String> {
	let text = value
		.as_str()
		.ok_or_else(|| format!("Invalid time: {}", value))?
		.trim();
	let time = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"]
		.iter()
		.find_map(|format| NaiveTime::parse_from_str(text, format).ok())
		.ok_or_else(|| format!("Invalid time: \"{}\"", text))?;
	Ok(Value::String(time.to_string()))
}

fn parse_datetime(text: &str) -> Option<DateTime<Utc>> {
	if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
		return Some(dt.with_timezone(&Utc));
	}
	["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
		.iter()
		.find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
		.map(|naive| naive.and_utc())
}
