//! Schema nodes derived from mapped classes

use crate::column::build_column_node;
use crate::declarative::registry_at;
use crate::error::{AttributeKind, SchemaError, SchemaResult};
use crate::overrides::{OverrideLayers, OverrideRegistry, Overrides};
use crate::relationship::build_relationship_node;
use crate::settings::DerivationSettings;
use reinhardt_mapper::{MappedClass, MapperProperty};
use reinhardt_schema_nodes::{SchemaNode, SchemaType, UnknownPolicy};
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Why an attribute of the class has no child node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
	/// Filtered out by includes or excludes
	Imperative,
	/// Switched off by an `exclude` override
	Declarative,
}

/// Attribute left out of a derived node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
	pub attribute: String,
	pub reason: SkipReason,
}

/// Mapping schema node derived from a mapped class
///
/// Construction walks the class attributes in order, filters them through
/// includes and excludes and builds one child per remaining attribute.
/// Relationships recurse into the related class. The result dereferences
/// to the assembled [`SchemaNode`].
///
/// # Examples
///
/// ```
/// use reinhardt_mapper::{Column, MappedClass, StorageType};
/// use reinhardt_model_schema::ModelSchemaNode;
/// use serde_json::json;
///
/// let person = MappedClass::builder("Person")
///     .column(Column::new("id", StorageType::Integer).primary_key())
///     .column(Column::new("name", StorageType::string(50)).not_null())
///     .build();
///
/// let schema = ModelSchemaNode::new(person).unwrap();
/// assert_eq!(schema.child_names(), vec!["id", "name"]);
///
/// let error = schema.deserialize(&json!({"id": 1})).unwrap_err();
/// assert_eq!(error.asdict()["name"], "Required");
/// ```
#[derive(Debug, Clone)]
pub struct ModelSchemaNode {
	class: Arc<MappedClass>,
	includes: Vec<String>,
	excludes: Vec<String>,
	overrides: Overrides,
	unknown: UnknownPolicy,
	settings: DerivationSettings,
	declarative_overrides: BTreeMap<String, OverrideRegistry>,
	skipped: Vec<Skipped>,
	node: SchemaNode,
}

impl ModelSchemaNode {
	/// Derive a schema for every attribute of `class`
	pub fn new(class: Arc<MappedClass>) -> SchemaResult<Self> {
		Self::builder(class).build()
	}

	pub fn builder(class: Arc<MappedClass>) -> ModelSchemaBuilder {
		ModelSchemaBuilder::new(class)
	}

	pub fn class(&self) -> &Arc<MappedClass> {
		&self.class
	}

	pub fn includes(&self) -> &[String] {
		&self.includes
	}

	pub fn excludes(&self) -> &[String] {
		&self.excludes
	}

	pub fn overrides(&self) -> &Overrides {
		&self.overrides
	}

	pub fn unknown(&self) -> UnknownPolicy {
		self.unknown
	}

	pub fn settings(&self) -> &DerivationSettings {
		&self.settings
	}

	/// Declarative overrides found on each visited attribute
	pub fn declarative_overrides(&self) -> &BTreeMap<String, OverrideRegistry> {
		&self.declarative_overrides
	}

	/// Attributes left out of the schema, in class order
	pub fn skipped(&self) -> &[Skipped] {
		&self.skipped
	}

	pub fn schema_node(&self) -> &SchemaNode {
		&self.node
	}

	pub fn into_schema_node(self) -> SchemaNode {
		self.node
	}
}

impl Deref for ModelSchemaNode {
	type Target = SchemaNode;

	fn deref(&self) -> &SchemaNode {
		&self.node
	}
}

impl DerefMut for ModelSchemaNode {
	fn deref_mut(&mut self) -> &mut SchemaNode {
		&mut self.node
	}
}

impl From<ModelSchemaNode> for SchemaNode {
	fn from(node: ModelSchemaNode) -> Self {
		node.into_schema_node()
	}
}

/// Builder for [`ModelSchemaNode`]
#[derive(Debug, Clone)]
pub struct ModelSchemaBuilder {
	class: Arc<MappedClass>,
	includes: Vec<String>,
	excludes: Vec<String>,
	overrides: Overrides,
	unknown: Option<UnknownPolicy>,
	settings: DerivationSettings,
}

impl ModelSchemaBuilder {
	pub fn new(class: Arc<MappedClass>) -> Self {
		Self {
			class,
			includes: Vec::new(),
			excludes: Vec::new(),
			overrides: Overrides::new(),
			unknown: None,
			settings: DerivationSettings::default(),
		}
	}

	/// Only derive these attributes; empty means all
	pub fn includes<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.includes = names.into_iter().map(Into::into).collect();
		self
	}

	pub fn excludes<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.excludes = names.into_iter().map(Into::into).collect();
		self
	}

	pub fn overrides(mut self, overrides: Overrides) -> Self {
		self.overrides = overrides;
		self
	}

	/// Unknown-key policy of this node; defaults to the settings' policy
	pub fn unknown(mut self, unknown: UnknownPolicy) -> Self {
		self.unknown = Some(unknown);
		self
	}

	pub fn settings(mut self, settings: DerivationSettings) -> Self {
		self.settings = settings;
		self
	}

	pub fn build(self) -> SchemaResult<ModelSchemaNode> {
		self.build_at(0)
	}

	/// Derive the node as if nested `depth` relationships deep
	pub(crate) fn build_at(self, depth: usize) -> SchemaResult<ModelSchemaNode> {
		self.settings.check_depth(self.class.name(), depth)?;

		let span = tracing::debug_span!("derive_schema", class = %self.class.name(), depth);
		let _enter = span.enter();

		let unknown = self.unknown.unwrap_or(self.settings.unknown);
		let mut derived = ModelSchemaNode {
			node: SchemaNode::new(SchemaType::Mapping { unknown }),
			class: self.class,
			includes: self.includes,
			excludes: self.excludes,
			overrides: self.overrides,
			unknown,
			settings: self.settings,
			declarative_overrides: BTreeMap::new(),
			skipped: Vec::new(),
		};
		derived.add_nodes(depth)?;
		Ok(derived)
	}
}

impl ModelSchemaNode {
	fn add_nodes(&mut self, depth: usize) -> SchemaResult<()> {
		let class = Arc::clone(&self.class);
		let no_overrides = OverrideRegistry::new();

		for name in class.attribute_names() {
			let included = self.includes.iter().any(|n| n == name);
			let excluded = self.excludes.iter().any(|n| n == name);
			if included && excluded {
				return Err(SchemaError::IncludeExcludeConflict {
					attribute: name.to_string(),
				});
			}
			if excluded || (!self.includes.is_empty() && !included) {
				tracing::debug!(attribute = name, "attribute skipped imperatively");
				self.skip(name, SkipReason::Imperative);
				continue;
			}

			let property = class.attribute(name)?;
			let declarative = registry_at(property.info(), &self.settings.info_key);
			self.declarative_overrides
				.insert(name.to_string(), declarative.clone());
			let imperative = self.overrides.get(name).unwrap_or(&no_overrides);

			let built = match property {
				MapperProperty::Column(column) => {
					let layers = OverrideLayers {
						attribute: name,
						kind: AttributeKind::Column,
						imperative,
						declarative: &declarative,
					};
					build_column_node(column, &layers)?
				}
				MapperProperty::Relationship(relationship) => {
					let layers = OverrideLayers {
						attribute: name,
						kind: AttributeKind::Relationship,
						imperative,
						declarative: &declarative,
					};
					build_relationship_node(relationship, &layers, &self.settings, depth)?
				}
			};

			match built {
				Some(child) => self.node.add(child),
				None => self.skip(name, SkipReason::Declarative),
			}
		}
		Ok(())
	}

	fn skip(&mut self, attribute: &str, reason: SkipReason) {
		self.skipped.push(Skipped {
			attribute: attribute.to_string(),
			reason,
		});
	}
}
