//! Property-based tests for derived column constraints
//!
//! # Properties Tested
//!
//! - String columns accept values up to their declared length and reject longer ones
//! - Enumeration columns accept exactly their declared values
//! - Cloning yields a structurally equal schema

use proptest::prelude::*;
use reinhardt_mapper::{Column, MappedClass, StorageType};
use reinhardt_model_schema::ModelSchemaNode;
use serde_json::json;
use std::sync::Arc;

fn tagged(length: usize, choices: &[String]) -> Arc<MappedClass> {
	MappedClass::builder("Tagged")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.column(Column::new("label", StorageType::string(length)))
		.column(Column::new("kind", StorageType::enumeration(choices.iter().cloned())))
		.build()
}

fn choices_strategy() -> impl Strategy<Value = Vec<String>> {
	prop::collection::hash_set("[a-z]{1,8}", 1..6).prop_map(|set| set.into_iter().collect())
}

proptest! {
	#[test]
	fn prop_string_length_is_bounded(length in 1usize..80, over in 1usize..10) {
		let schema = ModelSchemaNode::new(tagged(length, &["a".to_string()])).unwrap();

		let at_limit = json!({"id": 1, "label": "y".repeat(length)});
		let over_limit = json!({"id": 1, "label": "y".repeat(length + over)});

		prop_assert!(schema.deserialize(&at_limit).is_ok());
		prop_assert!(schema.deserialize(&over_limit).is_err());
	}

	#[test]
	fn prop_enumeration_accepts_exactly_its_values(choices in choices_strategy(), candidate in "[a-z]{1,8}") {
		let schema = ModelSchemaNode::new(tagged(10, &choices)).unwrap();

		for choice in &choices {
			let input = json!({"id": 1, "kind": choice});
			prop_assert!(schema.deserialize(&input).is_ok());
		}
		let input = json!({"id": 1, "kind": candidate});
		let accepted = schema.deserialize(&input).is_ok();
		prop_assert_eq!(accepted, choices.contains(&candidate));
	}

	#[test]
	fn prop_clone_is_structurally_equal(length in 1usize..80, choices in choices_strategy()) {
		let schema = ModelSchemaNode::new(tagged(length, &choices)).unwrap();

		let copy = schema.clone();

		prop_assert_eq!(copy.schema_node(), schema.schema_node());
		prop_assert_eq!(copy.declarative_overrides(), schema.declarative_overrides());
	}
}
