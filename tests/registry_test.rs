//! Tests for validator registry operations.

use depgen::{CompileOptions, RegistryError, ValidatorRegistry};
use serde_json::json;

#[test]
fn test_register_and_get() {
    let registry = ValidatorRegistry::new();

    registry
        .register("Payment", &json!({"dependencies": {"card": ["cvv"]}}))
        .unwrap();

    let validator = registry.get("Payment");
    assert!(validator.is_some());

    let missing = registry.get("Missing");
    assert!(missing.is_none());
}

#[test]
fn test_duplicate_registration_fails() {
    let registry = ValidatorRegistry::new();

    registry.register("Payment", &json!(true)).unwrap();

    let result = registry.register("Payment", &json!(false));
    assert!(matches!(result, Err(RegistryError::DuplicateName(name)) if name == "Payment"));

    // The first registration is kept.
    assert!(registry.validate("Payment", &json!({})).unwrap().is_success());
}

#[test]
fn test_validate_with_registry() {
    let registry = ValidatorRegistry::new();

    registry
        .register(
            "Payment",
            &json!({
                "dependencies": {
                    "card": ["billing_address"],
                    "name": {"required": ["surname"]}
                }
            }),
        )
        .unwrap();

    let result = registry
        .validate("Payment", &json!({"card": 1, "billing_address": "x"}))
        .unwrap();
    assert!(result.is_success());

    let result = registry
        .validate("Payment", &json!({"name": "Ada"}))
        .unwrap();
    assert!(result.is_failure());
}

#[test]
fn test_validate_missing_schema() {
    let registry = ValidatorRegistry::new();

    let result = registry.validate("Missing", &json!({}));
    assert!(matches!(result, Err(RegistryError::SchemaNotFound(_))));
}

#[test]
fn test_invalid_schema_is_rejected() {
    let registry = ValidatorRegistry::new();

    let err = registry
        .register("Bad", &json!({"dependencies": {"a": "b"}}))
        .unwrap_err();
    assert!(matches!(err, RegistryError::Compile(_)));
    assert!(err.to_string().contains("dependency 'a'"));
}

#[test]
fn test_registry_options_apply_to_all_schemas() {
    let registry = ValidatorRegistry::with_options(CompileOptions::new().all_errors(true));

    registry
        .register("Deps", &json!({"dependencies": {"a": ["b", "c"]}}))
        .unwrap();

    let errors = registry
        .validate("Deps", &json!({"a": 1}))
        .unwrap()
        .into_result()
        .unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(registry.get("Deps").unwrap().options().is_all_errors());
}

#[test]
fn test_registry_clone() {
    let registry = ValidatorRegistry::new();

    registry.register("Any", &json!({})).unwrap();

    let cloned = registry.clone();

    // Both should have access to the same validators
    assert!(registry.get("Any").is_some());
    assert!(cloned.get("Any").is_some());
}

#[test]
fn test_names_and_export() {
    let registry = ValidatorRegistry::new();

    registry.register("B", &json!({"required": ["b"]})).unwrap();
    registry.register("A", &json!(true)).unwrap();

    assert_eq!(registry.names(), vec!["A", "B"]);
    assert_eq!(
        registry.to_json_schema(),
        json!({"$defs": {"A": true, "B": {"required": ["b"]}}})
    );
}

#[test]
fn test_default_registry() {
    let registry = ValidatorRegistry::default();

    registry.register("Test", &json!({"required": ["x"]})).unwrap();

    let result = registry.validate("Test", &json!({"x": 1})).unwrap();
    assert!(result.is_success());
}
