//! # Reinhardt Schema Nodes
//!
//! Typed schema trees used to validate and render structured data.
//!
//! ## Overview
//!
//! A schema is a tree of [`SchemaNode`]s. Mapping nodes hold one child per
//! field, sequence nodes hold the node describing their items and scalar
//! nodes convert values to a canonical JSON form.
//!
//! `Value::Null` is the absent value on both sides:
//! - [`SchemaNode::serialize`] replaces it with the node's [`SchemaDefault`]
//! - [`SchemaNode::deserialize`] replaces it with the node's [`Missing`]
//!   value, or fails when the node is required
//!
//! Failures are reported as an [`Invalid`] tree that mirrors the schema.

pub mod error;
pub mod node;
pub mod sentinels;
pub mod types;
pub mod validators;

pub use error::{Invalid, NodeResult};
pub use node::{DEFAULT_MISSING_MSG, SchemaNode};
pub use sentinels::{DeferredValue, Missing, SchemaDefault};
pub use types::{SchemaType, UnknownPolicy};
pub use validators::{FunctionValidator, Validator};
