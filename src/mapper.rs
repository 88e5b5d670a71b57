//! Mapped class metadata module.
//!
//! # Examples
//!
//! ```
//! use reinhardt_schema::mapper::{Column, MappedClass, StorageType};
//!
//! let tag = MappedClass::builder("Tag")
//!     .column(Column::new("id", StorageType::Integer).primary_key())
//!     .build();
//! assert_eq!(tag.table_name(), "tag");
//! ```

pub use reinhardt_mapper::*;
