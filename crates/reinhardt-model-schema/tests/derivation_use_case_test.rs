//! End-to-end schema derivation scenarios

use reinhardt_mapper::{
	ClassRegistry, Column, ColumnDefault, MappedClass, Record, Relationship, StorageType,
};
use reinhardt_model_schema::{
	DerivationSettings, ModelSchemaNode, OverrideRegistry, OverrideSource, OverrideValue, Overrides,
	SchemaError, SkipReason, declarative,
};
use reinhardt_schema_nodes::{Missing, SchemaType, UnknownPolicy};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

// Test helper: Person(id, name, status) without relationships
#[fixture]
fn person() -> Arc<MappedClass> {
	MappedClass::builder("Person")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.column(Column::new("name", StorageType::string(50)).not_null())
		.column(
			Column::new("status", StorageType::enumeration(["active", "inactive"]))
				.with_default(json!("active")),
		)
		.build()
}

// Test helper: Pet and Person with a list-valued `pets` relationship
#[fixture]
fn pet_owner() -> (Arc<MappedClass>, Arc<MappedClass>) {
	let pet = MappedClass::builder("Pet")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.column(Column::new("name", StorageType::string(30)))
		.build();
	let person = MappedClass::builder("Person")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.column(Column::new("name", StorageType::string(50)).not_null())
		.relationship("pets", Relationship::new(Arc::clone(&pet)))
		.build();
	(person, pet)
}

#[rstest]
fn test_person_schema_has_three_fields(person: Arc<MappedClass>) {
	// Act
	let schema = ModelSchemaNode::new(person).unwrap();

	// Assert
	assert_eq!(schema.child_names(), vec!["id", "name", "status"]);
	assert_eq!(
		schema.typ,
		SchemaType::Mapping {
			unknown: UnknownPolicy::Raise
		}
	);
	assert!(schema.skipped().is_empty());
}

#[rstest]
fn test_missing_status_defaults_to_active(person: Arc<MappedClass>) {
	// Arrange
	let schema = ModelSchemaNode::new(person).unwrap();

	// Act
	let data = schema.deserialize(&json!({"id": 1, "name": "Alice"})).unwrap();

	// Assert
	assert_eq!(data["status"], json!("active"));
}

#[rstest]
#[case(50, true)]
#[case(51, false)]
fn test_name_length_limit(person: Arc<MappedClass>, #[case] length: usize, #[case] accepted: bool) {
	// Arrange
	let schema = ModelSchemaNode::new(person).unwrap();
	let input = json!({"id": 1, "name": "x".repeat(length)});

	// Act
	let result = schema.deserialize(&input);

	// Assert
	assert_eq!(result.is_ok(), accepted);
	if let Err(error) = result {
		assert_eq!(error.asdict()["name"], "Longer than maximum length 50");
	}
}

#[rstest]
fn test_status_outside_enumeration_fails(person: Arc<MappedClass>) {
	// Arrange
	let schema = ModelSchemaNode::new(person).unwrap();

	// Act
	let error = schema
		.deserialize(&json!({"id": 1, "name": "Alice", "status": "deleted"}))
		.unwrap_err();

	// Assert
	assert_eq!(
		error.asdict()["status"],
		"\"deleted\" is not one of active, inactive"
	);
}

#[rstest]
fn test_absent_required_name_fails(person: Arc<MappedClass>) {
	// Arrange
	let schema = ModelSchemaNode::new(person).unwrap();

	// Act
	let error = schema.deserialize(&json!({"id": 1})).unwrap_err();

	// Assert
	assert_eq!(error.asdict()["name"], "Required");
}

#[rstest]
fn test_pets_derive_as_sequence_of_mappings(pet_owner: (Arc<MappedClass>, Arc<MappedClass>)) {
	// Arrange
	let (person, _) = pet_owner;

	// Act
	let schema = ModelSchemaNode::new(person).unwrap();

	// Assert
	let pets = schema.child("pets").unwrap();
	assert_eq!(pets.typ, SchemaType::Sequence);
	assert_eq!(pets.children.len(), 1);
	assert!(matches!(pets.children[0].typ, SchemaType::Mapping { .. }));
	assert_eq!(pets.children[0].child_names(), vec!["id", "name"]);
}

#[rstest]
fn test_dictify_projects_pets_to_primary_keys(pet_owner: (Arc<MappedClass>, Arc<MappedClass>)) {
	// Arrange
	let (person, pet) = pet_owner;
	let schema = ModelSchemaNode::new(Arc::clone(&person)).unwrap();
	let alice = Record::new(person)
		.set("id", json!(1))
		.set("name", json!("Alice"))
		.push_related(
			"pets",
			Record::new(Arc::clone(&pet)).set("id", json!(11)).set("name", json!("Rex")),
		)
		.push_related(
			"pets",
			Record::new(pet).set("id", json!(10)).set("name", json!("Tom")),
		);

	// Act
	let projected = schema.dictify(&alice).unwrap();

	// Assert
	assert_eq!(projected["pets"], json!([{"id": 11}, {"id": 10}]));
	assert_eq!(projected["name"], json!("Alice"));
}

#[rstest]
fn test_dictify_result_validates(pet_owner: (Arc<MappedClass>, Arc<MappedClass>)) {
	// Arrange
	let (person, pet) = pet_owner;
	let schema = ModelSchemaNode::new(Arc::clone(&person)).unwrap();
	let alice = Record::new(person)
		.set("id", json!(1))
		.set("name", json!("Alice"))
		.push_related("pets", Record::new(pet).set("id", json!(11)));

	// Act
	let projected = schema.dictify(&alice).unwrap();
	let result = schema.deserialize(&Value::Object(projected));

	// Assert
	assert_eq!(
		result,
		Ok(json!({"id": 1, "name": "Alice", "pets": [{"id": 11, "name": null}]}))
	);
}

#[rstest]
fn test_dictify_with_unset_single_relationship_validates(pet_owner: (Arc<MappedClass>, Arc<MappedClass>)) {
	// Arrange
	let (_, pet) = pet_owner;
	let person = MappedClass::builder("Person")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.relationship("favorite", Relationship::new(pet).scalar())
		.build();
	let schema = ModelSchemaNode::new(Arc::clone(&person)).unwrap();
	let bob = Record::new(person).set("id", json!(2));

	// Act
	let projected = schema.dictify(&bob).unwrap();
	let result = schema.deserialize(&Value::Object(projected));

	// Assert
	assert_eq!(result, Ok(json!({"id": 2, "favorite": null})));
}

#[rstest]
fn test_dictify_omits_required_related_columns() {
	// Arrange
	let pet = MappedClass::builder("Pet")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.column(Column::new("name", StorageType::string(30)).not_null())
		.build();
	let person = MappedClass::builder("Person")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.relationship("pets", Relationship::new(Arc::clone(&pet)))
		.build();
	let schema = ModelSchemaNode::new(Arc::clone(&person)).unwrap();
	let alice = Record::new(person)
		.set("id", json!(1))
		.push_related("pets", Record::new(pet).set("id", json!(7)).set("name", json!("Rex")));

	// Act
	let projected = schema.dictify(&alice).unwrap();
	let error = schema.deserialize(&Value::Object(projected.clone())).unwrap_err();

	// Assert
	assert_eq!(projected["pets"], json!([{"id": 7}]));
	assert_eq!(error.asdict()["pets.0.name"], "Required");
}

#[rstest]
fn test_imperative_missing_beats_declarative() {
	// Arrange
	let person = MappedClass::builder("Person")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.column(declarative::column(
			Column::new("name", StorageType::string(50)),
			[("schema_missing", OverrideValue::from(json!("declared")))],
		))
		.build();
	let overrides = Overrides::new().attribute(
		"name",
		OverrideRegistry::new().with("missing", json!("anonymous")),
	);

	// Act
	let declared = ModelSchemaNode::new(Arc::clone(&person)).unwrap();
	let imperative = ModelSchemaNode::builder(person)
		.overrides(overrides)
		.build()
		.unwrap();

	// Assert
	assert_eq!(
		declared.child("name").map(|n| n.missing.clone()),
		Some(Missing::Value(json!("declared")))
	);
	assert_eq!(
		imperative.deserialize(&json!({"id": 1})).unwrap()["name"],
		json!("anonymous")
	);
	assert_eq!(
		imperative.declarative_overrides()["name"].get("missing"),
		Some(&OverrideValue::from(json!("declared")))
	);
}

#[rstest]
#[case(true, OverrideSource::Declarative)]
#[case(false, OverrideSource::Imperative)]
fn test_column_name_cannot_be_overridden(#[case] declared: bool, #[case] origin: OverrideSource) {
	// Arrange
	let name = if declared {
		declarative::column(
			Column::new("name", StorageType::Text),
			[("schema_name", OverrideValue::from("full_name"))],
		)
	} else {
		Column::new("name", StorageType::Text)
	};
	let person = MappedClass::builder("Person").column(name).build();
	let overrides = if declared {
		Overrides::new()
	} else {
		Overrides::new().attribute("name", OverrideRegistry::new().with("name", "full_name"))
	};

	// Act
	let result = ModelSchemaNode::builder(person).overrides(overrides).build();

	// Assert
	assert!(matches!(
		result,
		Err(SchemaError::ReservedOverride { origin: o, .. }) if o == origin
	));
}

#[rstest]
fn test_unimplemented_column_type_aborts() {
	// Arrange
	let document = MappedClass::builder("Document")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.column(Column::new("body", StorageType::Json))
		.build();

	// Act
	let result = ModelSchemaNode::new(Arc::clone(&document));
	let without_body = ModelSchemaNode::builder(document).excludes(["body"]).build();

	// Assert
	assert_eq!(
		result.unwrap_err(),
		SchemaError::UnimplementedType {
			attribute: "body".to_string(),
			type_name: "JSON".to_string(),
		}
	);
	assert!(without_body.is_ok());
}

#[rstest]
fn test_declarative_exclude_skips_relationship(pet_owner: (Arc<MappedClass>, Arc<MappedClass>)) {
	// Arrange
	let (_, pet) = pet_owner;
	let person = MappedClass::builder("Person")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.relationship(
			"pets",
			declarative::relationship(pet, None, [("schema_exclude", OverrideValue::from(true))]),
		)
		.build();

	// Act
	let schema = ModelSchemaNode::new(person).unwrap();

	// Assert
	assert_eq!(schema.child_names(), vec!["id"]);
	assert_eq!(schema.skipped()[0].attribute, "pets");
	assert_eq!(schema.skipped()[0].reason, SkipReason::Declarative);
}

#[rstest]
fn test_self_reference_through_registry() {
	// Arrange
	let registry = ClassRegistry::new();
	let employee = registry.register(
		MappedClass::builder("Employee")
			.column(Column::new("id", StorageType::Integer).primary_key())
			.column(Column::new("name", StorageType::string(50)).not_null())
			.relationship("manager", Relationship::new(registry.deferred("Employee")).scalar())
			.relationship("reports", Relationship::new(registry.deferred("Employee")))
			.build(),
	);

	// Act
	let schema = ModelSchemaNode::new(employee).unwrap();

	// Assert
	let manager = schema.child("manager").unwrap();
	assert_eq!(manager.child_names(), vec!["id", "name"]);
	let reports = schema.child("reports").unwrap();
	assert_eq!(reports.children[0].child_names(), vec!["id", "name"]);
}

#[rstest]
#[case(Some(3))]
#[case(Some(0))]
fn test_recursive_includes_hit_depth_limit(#[case] max_depth: Option<usize>) {
	// Arrange
	let registry = ClassRegistry::new();
	let category = registry.register(
		MappedClass::builder("Category")
			.column(Column::new("id", StorageType::Integer).primary_key())
			.relationship(
				"children",
				declarative::relationship(
					registry.deferred("Category"),
					None,
					[("schema_includes", OverrideValue::names(["id", "children"]))],
				),
			)
			.build(),
	);
	let settings = DerivationSettings::default().with_max_depth(max_depth);

	// Act
	let result = ModelSchemaNode::builder(category).settings(settings).build();

	// Assert
	assert_eq!(
		result.unwrap_err(),
		SchemaError::DepthExceeded {
			class: "Category".to_string(),
			max_depth: max_depth.unwrap_or_default(),
		}
	);
}

#[rstest]
fn test_recursive_includes_within_depth_limit() {
	// Arrange
	let registry = ClassRegistry::new();
	let category = registry.register(
		MappedClass::builder("Category")
			.column(Column::new("id", StorageType::Integer).primary_key())
			.relationship("parent", Relationship::new(registry.deferred("Category")).scalar())
			.build(),
	);
	let overrides = Overrides::new().attribute(
		"parent",
		OverrideRegistry::new()
			.with("includes", OverrideValue::names(["id", "parent"]))
			.with(
				"overrides",
				Overrides::new().attribute(
					"parent",
					OverrideRegistry::new().with("missing", json!(null)),
				),
			),
	);

	// Act
	let schema = ModelSchemaNode::builder(category)
		.overrides(overrides)
		.build()
		.unwrap();

	// Assert
	let parent = schema.child("parent").unwrap();
	let grandparent = parent.child("parent").unwrap();
	assert_eq!(grandparent.child_names(), vec!["id"]);
	assert_eq!(grandparent.missing, Missing::Null);
}

#[rstest]
fn test_callable_default_is_deferred() {
	// Arrange
	let counter = Arc::new(AtomicI64::new(0));
	let source = Arc::clone(&counter);
	let ticket = MappedClass::builder("Ticket")
		.column(Column::new("id", StorageType::Integer).primary_key())
		.column(Column::new("number", StorageType::BigInteger).with_default(ColumnDefault::callable(
			move || json!(source.fetch_add(1, Ordering::SeqCst) + 100),
		)))
		.build();

	// Act
	let schema = ModelSchemaNode::new(ticket).unwrap();
	let first = schema.serialize(&json!({"id": 1})).unwrap();
	let second = schema.serialize(&json!({"id": 2})).unwrap();

	// Assert
	assert_eq!(schema.child("number").map(|n| n.missing.clone()), Some(Missing::Value(json!(100))));
	assert_eq!(first["number"], json!(101));
	assert_eq!(second["number"], json!(102));
	assert_eq!(counter.load(Ordering::SeqCst), 3);
}

#[rstest]
fn test_settings_from_toml_apply_to_nested_nodes(pet_owner: (Arc<MappedClass>, Arc<MappedClass>)) {
	// Arrange
	let (person, _) = pet_owner;
	let settings = DerivationSettings::from_toml_str("unknown = \"ignore\"").unwrap();

	// Act
	let schema = ModelSchemaNode::builder(person)
		.settings(settings)
		.build()
		.unwrap();
	let data = schema
		.deserialize(&json!({"id": 1, "name": "Alice", "age": 30, "pets": [{"id": 2, "color": "black"}]}))
		.unwrap();

	// Assert
	assert_eq!(data, json!({"id": 1, "name": "Alice", "pets": [{"id": 2, "name": null}]}));
}

#[rstest]
fn test_derived_nodes_cross_threads(person: Arc<MappedClass>) {
	// Arrange
	let handles: Vec<_> = (0..4)
		.map(|_| {
			let class = Arc::clone(&person);
			std::thread::spawn(move || ModelSchemaNode::new(class).map(|schema| schema.child_names().len()))
		})
		.collect();

	// Act
	let counts: Vec<usize> = handles
		.into_iter()
		.map(|handle| handle.join().unwrap().unwrap())
		.collect();

	// Assert
	assert_eq!(counts, vec![3; 4]);
}
