//! # Validator Behavior Tests
//!
//! End-to-end checks through the public [`Validator`] API: construction
//! failures, reference resolution across documents, targeted dispatch, and
//! the located violations produced for representative schemas.

use jsv_schema::{EvaluationError, SchemaError, ValidationResult, Validator, ValidatorConfig};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Violations rendered as `(instancePath, schemaPath, schemaURI)` triples.
fn located(result: &ValidationResult) -> Vec<(String, String, String)> {
    result
        .errors()
        .iter()
        .map(|e| {
            (
                e.instance_path.to_string(),
                e.schema_path.to_string(),
                e.schema_uri.clone(),
            )
        })
        .collect()
}

fn triple(instance: &str, schema: &str, uri: &str) -> (String, String, String) {
    (instance.to_string(), schema.to_string(), uri.to_string())
}

// ─── Construction ───────────────────────────────────────────────────

#[test]
fn test_bad_schemas_are_rejected() {
    let bad_schemas = [
        json!({"type": "not-a-type"}),
        json!({"type": 3.14}),
        json!({"type": ["not-a-type"]}),
        json!({"type": [3.14]}),
        json!({"items": 3}),
        json!({"items": {"type": "not-a-type"}}),
        json!({"items": ["not-a-schema"]}),
        json!({"items": [{"type": "not-a-type"}]}),
        json!({"$ref": 3.14}),
        json!({"$id": 3.14}),
        json!({"not": 3.14}),
        json!({"if": 3.14}),
        json!({"then": 3.14}),
        json!({"else": 3.14}),
        json!({"enum": 3.14}),
        json!({"multipleOf": "not-a-number"}),
        json!({"multipleOf": 0}),
        json!({"maximum": "not-a-number"}),
        json!({"minimum": "not-a-number"}),
        json!({"exclusiveMaximum": "not-a-number"}),
        json!({"exclusiveMinimum": "not-a-number"}),
        json!({"maxLength": "not-a-number"}),
        json!({"maxLength": 3.14}),
        json!({"minLength": "not-a-number"}),
        json!({"minLength": 3.14}),
        json!({"minLength": -1}),
        json!({"pattern": 3.14}),
        json!({"pattern": "[[["}),
        json!({"additionalItems": "not-a-schema"}),
        json!({"maxItems": "not-a-number"}),
        json!({"maxItems": 3.14}),
        json!({"minItems": "not-a-number"}),
        json!({"minItems": 3.14}),
        json!({"uniqueItems": "not-a-boolean"}),
        json!({"contains": "not-a-schema"}),
        json!({"maxProperties": "not-a-number"}),
        json!({"maxProperties": 3.14}),
        json!({"minProperties": "not-a-number"}),
        json!({"minProperties": 3.14}),
        json!({"required": "not-an-array"}),
        json!({"required": [3.14]}),
        json!({"properties": "not-an-object"}),
        json!({"properties": {"foo": "not-a-schema"}}),
        json!({"patternProperties": "not-an-object"}),
        json!({"patternProperties": {"[[[": {}}}),
        json!({"patternProperties": {"*": 3.14}}),
        json!({"additionalProperties": 3.14}),
        json!({"dependencies": "not-an-object"}),
        json!({"dependencies": {"foo": "not-an-object-or-array"}}),
        json!({"dependencies": {"foo": [3.14]}}),
        json!({"allOf": []}),
        json!({"anyOf": {}}),
        json!({"oneOf": [3.14]}),
        json!({"propertyNames": 3.14}),
        json!({"$id": "relative.json"}),
        json!({"$ref": "relative.json"}),
        json!(3.14),
    ];

    for schema in bad_schemas {
        let result = Validator::new(&[schema.clone()]);
        assert!(
            matches!(result, Err(SchemaError::Malformed { .. })),
            "expected {schema} to be rejected, got {result:?}"
        );
    }
}

#[test]
fn test_missing_uris_in_discovery_order() {
    let err = Validator::new(&[json!({
        "$ref": "http://example.com/1",
        "items": [
            {"$ref": "http://example.com/2"},
            {"$ref": "http://example.com/3"},
            {"$ref": "http://example.com/4#/fragment"}
        ]
    })])
    .unwrap_err();

    assert_eq!(
        err,
        SchemaError::UnresolvedReferences {
            uris: vec![
                "http://example.com/2".into(),
                "http://example.com/3".into(),
                "http://example.com/4".into(),
                "http://example.com/1".into(),
            ]
        }
    );
}

#[test]
fn test_same_document_supplied_twice_is_accepted() {
    let schema = json!({"$id": "urn:dup", "properties": {"a": {"type": "string"}}});
    let validator = Validator::new(&[schema.clone(), schema]).unwrap();
    assert_eq!(validator.roots(), vec!["urn:dup", "urn:dup"]);
    assert!(!validator.validate(&json!({"a": 1})).unwrap().is_valid());
}

#[test]
fn test_missing_uri_behind_referenced_sub_schema_is_reported() {
    let err = Validator::new(&[
        json!({"$id": "urn:b", "x": {"$ref": "urn:gone2"}}),
        json!({"$id": "urn:a", "allOf": [{"$ref": "urn:b#/x"}, {"$ref": "urn:gone1"}]}),
    ])
    .unwrap_err();
    assert_eq!(
        err,
        SchemaError::UnresolvedReferences {
            uris: vec!["urn:gone1".into(), "urn:gone2".into()]
        }
    );
}

#[test]
fn test_different_anonymous_documents_are_rejected() {
    for documents in [
        vec![json!({"type": "string"}), json!({"type": "number"})],
        vec![
            json!({"properties": {"a": {"type": "string"}}}),
            json!({"properties": {"a": {"type": "number"}}}),
        ],
    ] {
        let result = Validator::new(&documents);
        assert!(
            matches!(result, Err(SchemaError::Malformed { ref location, .. }) if location == "#"),
            "{result:?}"
        );
    }
}

#[test]
fn test_different_documents_with_one_id_are_rejected() {
    let result = Validator::new(&[
        json!({"$id": "http://example.com/s", "type": "string"}),
        json!({"$id": "http://example.com/s", "type": "number"}),
    ]);
    assert!(matches!(result, Err(SchemaError::Malformed { .. })), "{result:?}");
}

#[test]
fn test_anonymous_document_with_identified_dependency() {
    let validator = Validator::new(&[
        json!({"$id": "urn:defs", "definitions": {"n": {"type": "number"}}}),
        json!({"properties": {"a": {"$ref": "urn:defs#/definitions/n"}}}),
    ])
    .unwrap();
    assert!(validator.validate(&json!({"a": 1})).unwrap().is_valid());
    assert!(!validator.validate(&json!({"a": "x"})).unwrap().is_valid());
}

// ─── Evaluation failures ────────────────────────────────────────────

#[test]
fn test_circular_schema_overflows() {
    let validator = Validator::with_config(
        &[json!({"$ref": "#"})],
        ValidatorConfig::default().with_max_stack_depth(16),
    )
    .unwrap();
    assert_eq!(
        validator.validate(&Value::Null).unwrap_err(),
        EvaluationError::StackOverflow { max_depth: 16 }
    );
}

#[test]
fn test_mutual_recursion_overflows() {
    let validator = Validator::new(&[
        json!({"$id": "urn:a", "$ref": "urn:b"}),
        json!({"$id": "urn:b", "$ref": "urn:a"}),
    ])
    .unwrap();
    assert!(matches!(
        validator.validate(&json!(1)),
        Err(EvaluationError::StackOverflow { max_depth: 128 })
    ));
}

#[test]
fn test_deep_but_finite_recursion_is_fine() {
    let schema = json!({
        "$id": "urn:tree",
        "properties": {"child": {"$ref": "urn:tree"}},
        "required": ["leaf"]
    });
    let mut instance = json!({"leaf": true});
    for _ in 0..50 {
        instance = json!({"leaf": true, "child": instance});
    }
    let validator = Validator::new(&[schema]).unwrap();
    assert!(validator.validate(&instance).unwrap().is_valid());
}

// ─── Located violations ─────────────────────────────────────────────

#[test]
fn test_targeted_dispatch() {
    let validator = Validator::new(&[
        json!({"$id": "urn:foo", "type": "boolean"}),
        json!({"$id": "urn:bar", "type": "number"}),
    ])
    .unwrap();

    assert!(validator.validate_uri("urn:foo", &json!(true)).unwrap().is_valid());
    assert!(!validator.validate_uri("urn:foo", &json!(3.14)).unwrap().is_valid());
    assert!(!validator.validate_uri("urn:bar", &json!(true)).unwrap().is_valid());
    assert!(validator.validate_uri("urn:bar", &json!(3.14)).unwrap().is_valid());
}

#[test]
fn test_integer_refinement() {
    let validator = Validator::new(&[json!({"type": "integer"})]).unwrap();
    assert!(validator.validate(&json!(3.0)).unwrap().is_valid());
    assert_eq!(
        located(&validator.validate(&json!(3.14)).unwrap()),
        vec![triple("", "/type", "")]
    );
}

#[test]
fn test_multiple_violations_are_all_reported() {
    let validator = Validator::new(&[json!({
        "properties": {
            "name": {"type": "string", "minLength": 3},
            "tags": {"items": {"type": "string"}, "uniqueItems": true}
        },
        "required": ["name", "id"]
    })])
    .unwrap();

    let result = validator
        .validate(&json!({"name": "ab", "tags": ["x", 1, "x"]}))
        .unwrap();
    assert_eq!(
        located(&result),
        vec![
            triple("", "/required/1", ""),
            triple("/name", "/properties/name/minLength", ""),
            triple("/tags/1", "/properties/tags/items/type", ""),
            triple("/tags", "/properties/tags/uniqueItems", ""),
        ]
    );
}

#[test]
fn test_string_length_counts_surrogate_pairs_once() {
    let validator = Validator::new(&[json!({"maxLength": 1})]).unwrap();
    assert!(validator.validate(&json!("\u{1F4A9}")).unwrap().is_valid());
    assert!(!validator.validate(&json!("\u{1F4A9}\u{1F4A9}")).unwrap().is_valid());
}

#[test]
fn test_violations_through_ref_are_relative_to_target_document() {
    let validator = Validator::new(&[
        json!({
            "$id": "http://example.com/defs.json",
            "definitions": {"positive": {"type": "number", "exclusiveMinimum": 0}}
        }),
        json!({
            "$id": "http://example.com/root.json",
            "items": {"$ref": "defs.json#/definitions/positive"}
        }),
    ])
    .unwrap();

    let result = validator.validate(&json!([1, -1, "x"])).unwrap();
    assert_eq!(
        located(&result),
        vec![
            triple(
                "/1",
                "/definitions/positive/exclusiveMinimum",
                "http://example.com/defs.json"
            ),
            triple("/2", "/definitions/positive/type", "http://example.com/defs.json"),
        ]
    );
}

#[test]
fn test_result_serializes_for_reporting() {
    let validator = Validator::new(&[json!({"$id": "urn:s", "required": ["a/b"]})]).unwrap();
    let result = validator.validate(&json!({})).unwrap();
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!([{"instancePath": "", "schemaPath": "/required/0", "schemaURI": "urn:s"}])
    );
    assert_eq!(result.to_string(), "(root) violates urn:s#/required/0");
}

// ─── Properties ─────────────────────────────────────────────────────

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,3}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn true_schema_accepts_everything(instance in arb_json()) {
        let validator = Validator::new(&[json!(true)]).unwrap();
        prop_assert!(validator.validate(&instance).unwrap().is_valid());
    }

    #[test]
    fn false_schema_rejects_everything_at_root(instance in arb_json()) {
        let validator = Validator::new(&[json!(false)]).unwrap();
        let result = validator.validate(&instance).unwrap();
        prop_assert_eq!(located(&result), vec![triple("", "", "")]);
    }

    #[test]
    fn const_accepts_itself(value in arb_json()) {
        let validator = Validator::new(&[json!({"const": value.clone(), "enum": [value.clone()]})]).unwrap();
        prop_assert!(validator.validate(&value).unwrap().is_valid());
    }

    #[test]
    fn validation_is_repeatable(instance in arb_json()) {
        let validator = Validator::new(&[json!({
            "items": {"type": ["string", "integer"]},
            "additionalProperties": {"type": "null"}
        })]).unwrap();
        let first = validator.validate(&instance).unwrap();
        let second = validator.validate(&instance).unwrap();
        prop_assert_eq!(first, second);
    }
}
