//! Schema derivation module.
//!
//! # Examples
//!
//! ```
//! use reinhardt_schema::schema::{DECLARATIVE_PREFIX, INFO_KEY};
//!
//! assert_eq!(DECLARATIVE_PREFIX, "schema_");
//! assert_eq!(INFO_KEY, "reinhardt_schema");
//! ```

pub use reinhardt_model_schema::*;
