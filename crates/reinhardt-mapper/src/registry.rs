//! Name-based registry of mapped classes
//!
//! Relationships pointing at classes that are declared later (or at the
//! declaring class itself) take a deferred target obtained from
//! [`ClassRegistry::deferred`]. The lookup happens when the target is
//! resolved, not when the relationship is declared.

use crate::class::MappedClass;
use crate::error::{MapperError, MapperResult};
use crate::relationship::RelationshipTarget;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// Registry of mapped classes keyed by class name
#[derive(Debug, Default)]
pub struct ClassRegistry {
	classes: RwLock<HashMap<String, Arc<MappedClass>>>,
}

impl ClassRegistry {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Register `class` under its name, replacing any previous registration
	pub fn register(&self, class: Arc<MappedClass>) -> Arc<MappedClass> {
		self.classes
			.write()
			.insert(class.name().to_string(), Arc::clone(&class));
		class
	}

	pub fn get(&self, name: &str) -> Option<Arc<MappedClass>> {
		self.classes.read().get(name).cloned()
	}

	pub fn get_or_err(&self, name: &str) -> MapperResult<Arc<MappedClass>> {
		self.get(name).ok_or_else(|| MapperError::UnresolvedTarget {
			target: name.to_string(),
		})
	}

	pub fn contains(&self, name: &str) -> bool {
		self.classes.read().contains_key(name)
	}

	/// Deferred relationship target looked up by `name` on resolution
	///
	/// The resolver holds a weak reference, so classes stored in the
	/// registry do not keep the registry alive through their relationships.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_mapper::{ClassRegistry, Column, MappedClass, Relationship, StorageType};
	///
	/// let registry = ClassRegistry::new();
	/// let node = registry.register(
	///     MappedClass::builder("Node")
	///         .column(Column::new("id", StorageType::Integer).primary_key())
	///         .relationship("parent", Relationship::new(registry.deferred("Node")).scalar())
	///         .build(),
	/// );
	///
	/// let parent = node.attribute("parent").unwrap().as_relationship().unwrap();
	/// assert_eq!(parent.target.resolve().unwrap().name(), "Node");
	/// ```
	pub fn deferred(self: &Arc<Self>, name: impl Into<String>) -> RelationshipTarget {
		let registry: Weak<Self> = Arc::downgrade(self);
		let name = name.into();
		RelationshipTarget::deferred(move || match registry.upgrade() {
			Some(registry) => registry.get_or_err(&name),
			None => Err(MapperError::UnresolvedTarget {
				target: name.clone(),
			}),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::column::Column;
	use crate::relationship::Relationship;
	use crate::types::StorageType;
	use rstest::rstest;

	#[rstest]
	fn test_forward_reference_resolves_after_registration() {
		// Arrange
		let registry = ClassRegistry::new();
		let target = registry.deferred("Address");

		// Act
		let before = target.resolve();
		registry.register(
			MappedClass::builder("Address")
				.column(Column::new("id", StorageType::Integer).primary_key())
				.build(),
		);
		let after = target.resolve();

		// Assert
		assert!(matches!(before, Err(MapperError::UnresolvedTarget { .. })));
		assert_eq!(after.unwrap().name(), "Address");
	}

	#[rstest]
	fn test_resolver_fails_once_registry_is_dropped() {
		// Arrange
		let registry = ClassRegistry::new();
		registry.register(MappedClass::builder("Tag").build());
		let target = registry.deferred("Tag");

		// Act
		drop(registry);
		let result = target.resolve();

		// Assert
		assert_eq!(
			result.unwrap_err(),
			MapperError::UnresolvedTarget {
				target: "Tag".to_string()
			}
		);
	}

	#[rstest]
	fn test_self_reference() {
		// Arrange
		let registry = ClassRegistry::new();
		let employee = registry.register(
			MappedClass::builder("Employee")
				.column(Column::new("id", StorageType::Integer).primary_key())
				.relationship("reports", Relationship::new(registry.deferred("Employee")))
				.build(),
		);

		// Act
		let reports = employee.attribute("reports").unwrap().as_relationship().unwrap();
		let resolved = reports.target.resolve().unwrap();

		// Assert
		assert!(Arc::ptr_eq(&resolved, &employee));
		assert!(registry.contains("Employee"));
	}
}
