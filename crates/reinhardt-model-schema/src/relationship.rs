//! Schema nodes for relationship attributes
//!
//! Unless explicit children are given, a relationship is derived by
//! recursing into the related class. By default only the related class'
//! columns are included, so the recursion stops after one level unless
//! includes ask for more; the depth limit in
//! [`DerivationSettings`] bounds whatever the includes ask for.
//!
//! An unset single-valued relationship is absent, so its node accepts a
//! null value unless a `missing` override says otherwise.

use crate::error::SchemaResult;
use crate::node::ModelSchemaNode;
use crate::overrides::{self, OverrideLayers, OverrideValue, Overrides};
use crate::settings::DerivationSettings;
use reinhardt_mapper::Relationship;
use reinhardt_schema_nodes::{Missing, SchemaNode, SchemaType};

/// Keys computed from the relationship that no override may set
const RESERVED: &[&str] = &["name", "typ"];

/// Keys handled before the remaining overrides are applied
const CONSUMED: &[&str] = &["exclude", "children", "includes", "excludes", "overrides"];

/// Build the node for `relationship`, or `None` when an override excludes it
///
/// `depth` is the depth of the node that owns the relationship.
pub(crate) fn build_relationship_node(
	relationship: &Relationship,
	layers: &OverrideLayers<'_>,
	settings: &DerivationSettings,
	depth: usize,
) -> SchemaResult<Option<SchemaNode>> {
	let name = relationship.key.as_str();
	let class = relationship.target.resolve()?;

	if layers.excluded() {
		tracing::debug!(relationship = name, "relationship skipped due to overrides");
		return Ok(None);
	}
	layers.check_reserved(RESERVED)?;

	let children = match layers.resolve("children") {
		Some((origin, OverrideValue::Children(children))) => {
			tracing::debug!(relationship = name, %origin, "children overridden");
			children.clone()
		}
		Some(_) => return Err(layers.invalid("children", "a list of schema nodes")),
		None => Vec::new(),
	};

	let mut node = if children.is_empty() {
		let includes = match layers.names("includes")? {
			Some(includes) => includes,
			None => class.column_attrs().map(|column| column.key.clone()).collect(),
		};
		let excludes = layers.names("excludes")?.unwrap_or_default();
		let nested_overrides = match layers.resolve("overrides") {
			Some((origin, OverrideValue::Nested(nested))) => {
				tracing::debug!(relationship = name, %origin, "overrides overridden");
				nested.clone()
			}
			Some(_) => return Err(layers.invalid("overrides", "nested overrides")),
			None => Overrides::new(),
		};

		let nested = ModelSchemaNode::builder(class)
			.includes(includes)
			.excludes(excludes)
			.overrides(nested_overrides)
			.settings(settings.clone())
			.build_at(depth + 1)?
			.into_schema_node();

		if relationship.uselist {
			SchemaNode::sequence(nested)
		} else {
			nested.with_missing(Missing::Null)
		}
	} else if relationship.uselist {
		SchemaNode::new(SchemaType::Sequence).with_children(children)
	} else {
		SchemaNode::mapping()
			.with_children(children)
			.with_missing(Missing::Null)
	};
	node.name = name.to_string();

	for (key, value) in layers.remaining(CONSUMED) {
		overrides::apply(&mut node, name, key, value)?;
	}
	Ok(Some(node))
}
