//! The `required` keyword.

use crate::error::CompileError;
use crate::keyword::{ErrorDescriptor, ErrorParams, KeywordCxt, KeywordDefinition};
use crate::schema::JsonType;

use super::missing::{check_missing_prop, check_report_missing_prop, report_missing_prop};

pub const DEF: KeywordDefinition = KeywordDefinition {
    keyword: "required",
    data_type: Some(JsonType::Object),
    schema_type: JsonType::Array,
    code,
    error: Some(ErrorDescriptor {
        message: error_message,
        params: error_params,
    }),
};

fn code(cxt: &mut KeywordCxt<'_>) -> Result<(), CompileError> {
    let schema = cxt.schema;
    let Some(required) = schema.required() else {
        return Ok(());
    };
    if required.is_empty() {
        return Ok(());
    }

    if cxt.it.all_errors() {
        for property in required {
            check_report_missing_prop(cxt, property);
        }
    } else {
        let missing = cxt.gen.declare("missing");
        let cond = check_missing_prop(cxt, required, &missing);
        cxt.gen.if_(cond);
        report_missing_prop(cxt, &missing);
        cxt.gen.else_();
    }
    Ok(())
}

fn error_message(params: &ErrorParams) -> String {
    let missing = params
        .get("missingProperty")
        .and_then(|v| v.as_str())
        .unwrap_or_default();
    format!("should have required property '{}'", missing)
}

fn error_params(params: &ErrorParams) -> ErrorParams {
    let mut out = ErrorParams::new();
    if let Some(missing) = params.get("missingProperty") {
        out.insert("missingProperty".to_string(), missing.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile, CompileOptions};
    use serde_json::json;
    use stillwater::Validation;

    fn unwrap_failure<T: std::fmt::Debug, E>(v: Validation<T, E>) -> E {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_stop_at_first_reports_first_missing() {
        let validator = compile(&json!({"required": ["a", "b", "c"]}), &CompileOptions::new()).unwrap();

        let errors = unwrap_failure(validator.validate(&json!({"a": 1})).unwrap());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().params["missingProperty"], "b");
        assert_eq!(errors.first().message, "should have required property 'b'");
        assert_eq!(errors.first().schema_path.to_fragment(), "#/required");
    }

    #[test]
    fn test_accumulate_all_reports_each_missing() {
        let options = CompileOptions::new().all_errors(true);
        let validator = compile(&json!({"required": ["a", "b", "c"]}), &options).unwrap();

        let errors = unwrap_failure(validator.validate(&json!({"b": 1})).unwrap());
        let missing: Vec<_> = errors.iter().filter_map(|e| e.param_str("missingProperty")).collect();
        assert_eq!(missing, vec!["a", "c"]);
    }

    #[test]
    fn test_empty_required_emits_nothing() {
        let validator = compile(&json!({"required": []}), &CompileOptions::new()).unwrap();
        // Only the object type guard remains.
        assert_eq!(validator.code().to_string(), "if (typeof data == \"object\") {\n}\n");
        assert!(validator.is_valid(&json!({})).unwrap());
    }
}
