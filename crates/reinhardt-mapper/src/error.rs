//! Mapper error types.

use thiserror::Error;

/// Result type for metadata lookups.
pub type MapperResult<T> = Result<T, MapperError>;

/// Errors raised while inspecting mapped classes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MapperError {
	/// The class has neither a column nor a relationship with this key.
	#[error("class '{class}' has no mapped attribute '{attribute}'")]
	UnknownAttribute {
		/// Mapped class name.
		class: String,
		/// Requested attribute key.
		attribute: String,
	},

	/// A deferred relationship target could not be resolved.
	#[error("relationship target '{target}' could not be resolved")]
	UnresolvedTarget {
		/// Name of the class the relationship points to.
		target: String,
	},
}
