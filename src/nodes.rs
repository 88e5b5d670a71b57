//! Schema node module.

pub use reinhardt_schema_nodes::*;
