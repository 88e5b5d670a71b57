//! Relationship declarations

use crate::class::MappedClass;
use crate::error::MapperResult;
use crate::info::Info;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Resolver invoked to obtain a relationship target declared by name
pub type ClassResolver = Arc<dyn Fn() -> MapperResult<Arc<MappedClass>> + Send + Sync>;

/// Target of a relationship
///
/// Targets that do not exist yet when the relationship is declared
/// (back-references, self-references) are given as a resolver and looked
/// up on first use.
#[derive(Clone)]
pub enum RelationshipTarget {
	Class(Arc<MappedClass>),
	Deferred(ClassResolver),
}

impl RelationshipTarget {
	/// Deferred target from any resolver function
	pub fn deferred<F>(resolver: F) -> Self
	where
		F: Fn() -> MapperResult<Arc<MappedClass>> + Send + Sync + 'static,
	{
		RelationshipTarget::Deferred(Arc::new(resolver))
	}

	/// The target class, invoking the resolver if needed
	pub fn resolve(&self) -> MapperResult<Arc<MappedClass>> {
		match self {
			RelationshipTarget::Class(class) => Ok(Arc::clone(class)),
			RelationshipTarget::Deferred(resolver) => resolver(),
		}
	}
}

impl fmt::Debug for RelationshipTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RelationshipTarget::Class(class) => write!(f, "Class({})", class.name()),
			RelationshipTarget::Deferred(_) => f.write_str("Deferred(..)"),
		}
	}
}

impl From<Arc<MappedClass>> for RelationshipTarget {
	fn from(class: Arc<MappedClass>) -> Self {
		RelationshipTarget::Class(class)
	}
}

/// A relationship from one mapped class to another
///
/// `key` is assigned when the relationship is attached to a class through
/// [`MappedClassBuilder::relationship`](crate::MappedClassBuilder::relationship).
#[derive(Debug, Clone)]
pub struct Relationship {
	pub key: String,
	pub target: RelationshipTarget,
	/// Association table for many-to-many relationships
	pub secondary: Option<String>,
	/// `true` when the attribute holds a list of related objects
	pub uselist: bool,
	pub back_populates: Option<String>,
	pub info: Info,
	/// Keyword options the relationship itself does not interpret
	pub options: Map<String, Value>,
}

impl Relationship {
	/// Create a list-valued relationship to `target`
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_mapper::{MappedClass, Relationship};
	///
	/// let pet = MappedClass::builder("Pet").build();
	/// let pets = Relationship::new(pet);
	/// assert!(pets.uselist);
	/// assert!(!pets.clone().scalar().uselist);
	/// ```
	pub fn new(target: impl Into<RelationshipTarget>) -> Self {
		Self {
			key: String::new(),
			target: target.into(),
			secondary: None,
			uselist: true,
			back_populates: None,
			info: Info::new(),
			options: Map::new(),
		}
	}

	/// Make the relationship single-valued
	pub fn scalar(mut self) -> Self {
		self.uselist = false;
		self
	}

	pub fn uselist(mut self, uselist: bool) -> Self {
		self.uselist = uselist;
		self
	}

	pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
		self.secondary = Some(secondary.into());
		self
	}

	pub fn back_populates(mut self, attribute: impl Into<String>) -> Self {
		self.back_populates = Some(attribute.into());
		self
	}

	pub fn with_info(mut self, info: Info) -> Self {
		self.info = info;
		self
	}

	/// Apply a keyword option by name
	///
	/// `uselist`, `back_populates` and `secondary` are understood when the
	/// value has the matching JSON shape; everything else lands in `options`.
	pub fn set_option(&mut self, key: &str, value: Value) {
		match (key, value) {
			("uselist", Value::Bool(uselist)) => self.uselist = uselist,
			("back_populates", Value::String(attribute)) => self.back_populates = Some(attribute),
			("secondary", Value::String(table)) => self.secondary = Some(table),
			(other, value) => {
				self.options.insert(other.to_string(), value);
			}
		}
	}
}
