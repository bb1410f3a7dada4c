//! Integration tests for SchemaError and SchemaErrors.

use depgen::{DependencyError, JsonPointer, SchemaError, SchemaErrors, ValidationResult};
use serde_json::json;
use stillwater::prelude::*;
use stillwater::Validation;

#[test]
fn test_schema_error_full_context() {
    let error = SchemaError::new(
        "dependencies",
        JsonPointer::root().push_key("payment"),
        "should have property cvv when property card is present",
    )
    .with_schema_path(JsonPointer::root().push_key("dependencies"))
    .with_param("property", json!("card"))
    .with_param("missingProperty", json!("cvv"));

    assert_eq!(error.instance_path.to_string(), "/payment");
    assert_eq!(error.keyword, "dependencies");
    assert_eq!(error.param_str("property"), Some("card"));
    assert_eq!(error.param_str("missingProperty"), Some("cvv"));
    assert_eq!(
        error.to_string(),
        "/payment: should have property cvv when property card is present (at #/dependencies)"
    );
}

#[test]
fn test_schema_errors_never_empty() {
    let errors = SchemaErrors::single(SchemaError::new("required", JsonPointer::root(), "x"));

    // is_empty always returns false for SchemaErrors (guarantees at least one error)
    assert!(!errors.is_empty());
    assert_eq!(errors.len(), 1);
    assert!(SchemaErrors::try_from_vec(Vec::new()).is_none());
}

#[test]
fn test_errors_combine_via_semigroup() {
    let e1 = SchemaErrors::single(SchemaError::new("required", JsonPointer::root(), "first"));
    let e2 = SchemaErrors::single(SchemaError::new("dependencies", JsonPointer::root(), "second"));
    let e3 = SchemaErrors::single(SchemaError::new("false schema", JsonPointer::root(), "third"));

    let combined = e1.combine(e2).combine(e3);

    let messages: Vec<&str> = combined.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);
}

#[test]
fn test_validation_and_accumulates_errors() {
    let v1: ValidationResult<()> = Validation::Failure(SchemaErrors::single(SchemaError::new(
        "required",
        JsonPointer::root().push_key("a"),
        "error a",
    )));
    let v2: ValidationResult<()> = Validation::Failure(SchemaErrors::single(SchemaError::new(
        "required",
        JsonPointer::root().push_key("b"),
        "error b",
    )));

    // Combine with .and() - should accumulate both errors
    match v1.and(v2) {
        Validation::Failure(errors) => {
            let paths: Vec<String> = errors.iter().map(|e| e.instance_path.to_string()).collect();
            assert_eq!(paths, vec!["/a", "/b"]);
        }
        Validation::Success(_) => panic!("Expected failure"),
    }
}

#[test]
fn test_query_errors_by_path_and_keyword() {
    let payment = JsonPointer::root().push_key("payment");

    let errors = SchemaErrors::single(SchemaError::new("dependencies", payment.clone(), "a"))
        .combine(SchemaErrors::single(SchemaError::new("required", payment.clone(), "b")))
        .combine(SchemaErrors::single(SchemaError::new("required", JsonPointer::root(), "c")));

    assert_eq!(errors.at_path(&payment).len(), 2);
    assert_eq!(errors.with_keyword("required").len(), 2);
    assert_eq!(errors.with_keyword("dependencies").len(), 1);
    assert!(errors.with_keyword("nonexistent").is_empty());
}

#[test]
fn test_errors_display() {
    let errors = SchemaErrors::single(SchemaError::new("required", JsonPointer::root(), "missing"))
        .combine(SchemaErrors::single(SchemaError::new(
            "required",
            JsonPointer::root().push_key("a"),
            "also missing",
        )));

    let text = errors.to_string();
    assert!(text.starts_with("Validation failed with 2 error(s):"));
    assert!(text.contains("1. (root): missing"));
    assert!(text.contains("2. /a: also missing"));
}

#[test]
fn test_dependency_error_rendering() {
    let deps = vec!["b".to_string(), "c".to_string()];
    let err = DependencyError::new("a", &deps).with_missing("b");

    assert_eq!(err.deps_count, 2);
    assert_eq!(err.message(), "should have properties b, c when property a is present");
    assert_eq!(
        serde_json::Value::Object(err.params()),
        json!({"property": "a", "missingProperty": "b", "depsCount": 2, "deps": "b, c"})
    );
    assert_eq!(DependencyError::from_params(&err.params()), err);
}
