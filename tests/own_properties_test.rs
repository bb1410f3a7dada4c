//! Integration tests for the own-properties option.
//!
//! Inherited properties are supplied through an instance prototype.

use depgen::{compile, CompileOptions, Instance, Validator};
use serde_json::{json, Map, Value};

fn validator(schema: Value, own_properties: bool) -> Validator {
    compile(
        &schema,
        &CompileOptions::new().own_properties(own_properties),
    )
    .unwrap()
}

fn prototype(keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .map(|k| (k.to_string(), json!("inherited")))
        .collect()
}

fn passes(validator: &Validator, value: &Value, proto: &Map<String, Value>) -> bool {
    let instance = Instance::new(value).with_prototype(proto);
    validator.validate_instance(&instance).unwrap().is_success()
}

#[test]
fn test_inherited_required_dependency() {
    let schema = json!({"dependencies": {"a": ["b"]}});
    let proto = prototype(&["b"]);
    let value = json!({"a": 1});

    assert!(passes(&validator(schema.clone(), false), &value, &proto));
    assert!(!passes(&validator(schema, true), &value, &proto));
}

#[test]
fn test_inherited_trigger() {
    let schema = json!({"dependencies": {"a": ["b"]}});
    let proto = prototype(&["a"]);
    let value = json!({});

    assert!(!passes(&validator(schema.clone(), false), &value, &proto));
    assert!(passes(&validator(schema, true), &value, &proto));
}

#[test]
fn test_inherited_trigger_of_schema_dependency() {
    let schema = json!({"dependencies": {"a": {"required": ["x"]}}});
    let proto = prototype(&["a"]);
    let value = json!({"y": 1});

    assert!(!passes(&validator(schema.clone(), false), &value, &proto));
    assert!(passes(&validator(schema, true), &value, &proto));
}

#[test]
fn test_inherited_property_inside_schema_dependency() {
    let schema = json!({"dependencies": {"a": {"required": ["x"]}}});
    let proto = prototype(&["x"]);
    let value = json!({"a": 1});

    assert!(passes(&validator(schema.clone(), false), &value, &proto));
    assert!(!passes(&validator(schema, true), &value, &proto));
}

#[test]
fn test_own_properties_behave_the_same_either_way() {
    let schema = json!({"dependencies": {"a": ["b"], "c": {"required": ["d"]}}});
    let proto = prototype(&["unrelated"]);

    for own in [false, true] {
        let v = validator(schema.clone(), own);
        assert!(passes(&v, &json!({"a": 1, "b": 1}), &proto));
        assert!(!passes(&v, &json!({"a": 1}), &proto));
        assert!(!passes(&v, &json!({"c": 1}), &proto));
        assert!(passes(&v, &json!({"c": 1, "d": 1}), &proto));
    }
}

#[test]
fn test_own_check_is_rendered() {
    let v = validator(json!({"dependencies": {"a": ["b"]}}), true);
    let listing = v.code().to_string();
    assert!(listing.contains(r#"hasOwn(data, "a")"#));
    assert!(listing.contains(r#"hasOwn(data, "b")"#));
}
