//! Derivation settings

use crate::declarative::INFO_KEY;
use crate::error::{SchemaError, SchemaResult};
use reinhardt_schema_nodes::UnknownPolicy;
use serde::{Deserialize, Serialize};

/// Default relationship recursion limit
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Settings shared by a derived node and every node nested under it
///
/// # Examples
///
/// ```
/// use reinhardt_model_schema::DerivationSettings;
/// use reinhardt_schema_nodes::UnknownPolicy;
///
/// let settings = DerivationSettings::from_toml_str(
///     r#"
///     max_depth = 2
///     unknown = "preserve"
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(settings.max_depth, Some(2));
/// assert_eq!(settings.unknown, UnknownPolicy::Preserve);
/// assert_eq!(settings.info_key, "reinhardt_schema");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivationSettings {
	/// Deepest relationship nesting allowed; `None` disables the check
	pub max_depth: Option<usize>,
	/// Unknown-key policy of derived mapping nodes
	pub unknown: UnknownPolicy,
	/// `info` key declarative overrides are read from
	pub info_key: String,
}

impl Default for DerivationSettings {
	fn default() -> Self {
		Self {
			max_depth: Some(DEFAULT_MAX_DEPTH),
			unknown: UnknownPolicy::Raise,
			info_key: INFO_KEY.to_string(),
		}
	}
}

impl DerivationSettings {
	pub fn from_toml_str(source: &str) -> SchemaResult<Self> {
		toml::from_str(source).map_err(|e| SchemaError::Settings(e.to_string()))
	}

	pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
		self.max_depth = max_depth;
		self
	}

	pub fn with_unknown(mut self, unknown: UnknownPolicy) -> Self {
		self.unknown = unknown;
		self
	}

	pub fn with_info_key(mut self, info_key: impl Into<String>) -> Self {
		self.info_key = info_key.into();
		self
	}

	/// Fail when nesting at `depth` would exceed the limit
	pub(crate) fn check_depth(&self, class: &str, depth: usize) -> SchemaResult<()> {
		match self.max_depth {
			Some(max_depth) if depth > max_depth => Err(SchemaError::DepthExceeded {
				class: class.to_string(),
				max_depth,
			}),
			_ => Ok(()),
		}
	}
}
