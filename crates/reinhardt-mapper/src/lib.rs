//! Mapped-class metadata for Reinhardt
//!
//! This crate describes ORM-mapped classes the way schema tooling needs to
//! see them:
//! - Columns with storage type, nullability, defaults and an info side-channel
//! - Relationships with direct or deferred targets and cardinality
//! - A registry for resolving classes by name
//! - Runtime instances exposing attribute values and primary keys
//!
//! Attribute kinds are an explicit [`MapperProperty`] enum, so consumers
//! dispatch with a `match` instead of probing lookups.

pub mod class;
pub mod column;
pub mod error;
pub mod info;
pub mod instance;
pub mod registry;
pub mod relationship;
pub mod types;

pub use class::{MappedClass, MappedClassBuilder, MapperProperty};
pub use column::{Column, ColumnDefault, DefaultFn, ExecutionContext};
pub use error::{MapperError, MapperResult};
pub use info::{Info, InfoValue};
pub use instance::{AttributeValue, MappedObject, Record, RecordValue};
pub use registry::ClassRegistry;
pub use relationship::{ClassResolver, Relationship, RelationshipTarget};
pub use types::{StorageType, TypeDecorator};
