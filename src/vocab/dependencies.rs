//! The `dependencies` keyword.
//!
//! Each member of the keyword's object names a trigger property. When the
//! trigger is present in the instance:
//!
//! - an array value lists properties that must be present too (a property
//!   dependency);
//! - a schema value must hold of the whole instance (a schema dependency).
//!
//! The constraint map is split by value shape first, then each half is
//! compiled on its own. Property dependencies generate different code under
//! the two error policies: accumulate-all reports every missing property,
//! stop-at-first reports the first missing property of the first failing
//! trigger and stops.
//!
//! # Example
//!
//! ```rust
//! use depgen::{compile, CompileOptions};
//! use serde_json::json;
//!
//! let schema = json!({"dependencies": {"a": ["b", "c"]}});
//! let validator = compile(&schema, &CompileOptions::new()).unwrap();
//!
//! let errors = validator.validate(&json!({"a": 1, "b": 2})).unwrap().into_result().unwrap_err();
//! assert_eq!(errors.first().message, "should have properties b, c when property a is present");
//! assert_eq!(errors.first().params["missingProperty"], "c");
//! ```

use indexmap::IndexMap;
use serde_json::Value;

use crate::codegen::{Expr, Name, ParamValue};
use crate::compile::subschema::Subschema;
use crate::compile::util::{always_valid_schema, property_in_data};
use crate::error::CompileError;
use crate::keyword::{ErrorDescriptor, ErrorParams, KeywordCxt, KeywordDefinition};
use crate::schema::{ConstraintMap, ConstraintValue, JsonType, SchemaNode};

use super::missing::{check_missing_prop, check_report_missing_prop, report_missing_prop};

pub const DEF: KeywordDefinition = KeywordDefinition {
    keyword: "dependencies",
    data_type: Some(JsonType::Object),
    schema_type: JsonType::Object,
    code,
    error: Some(ErrorDescriptor {
        message: error_message,
        params: error_params,
    }),
};

/// Trigger property → properties required alongside it.
pub type PropertyDependencies<'s> = IndexMap<&'s str, &'s [String]>;

/// Trigger property → schema the whole instance must satisfy.
pub type SchemaDependencies<'s> = IndexMap<&'s str, &'s SchemaNode>;

/// Partitions a constraint map by value shape.
///
/// Every key lands in exactly one output, in document order. A key named
/// `__proto__` is dropped.
pub fn split_dependencies(map: &ConstraintMap) -> (PropertyDependencies<'_>, SchemaDependencies<'_>) {
    let mut property_deps = PropertyDependencies::new();
    let mut schema_deps = SchemaDependencies::new();

    for (key, value) in map.iter() {
        if key == "__proto__" {
            continue;
        }
        match value {
            ConstraintValue::RequiredList(deps) => {
                property_deps.insert(key, deps.as_slice());
            }
            ConstraintValue::EmbeddedSchema(schema) => {
                schema_deps.insert(key, schema);
            }
        }
    }

    tracing::trace!(
        property_deps = property_deps.len(),
        schema_deps = schema_deps.len(),
        "split dependencies"
    );
    (property_deps, schema_deps)
}

fn code(cxt: &mut KeywordCxt<'_>) -> Result<(), CompileError> {
    let schema = cxt.schema;
    let Some(map) = schema.dependencies() else {
        return Ok(());
    };

    let (property_deps, schema_deps) = split_dependencies(map);
    let valid = cxt.gen.name("valid");
    validate_property_deps(cxt, &property_deps);
    validate_schema_deps(cxt, &schema_deps, &valid)
}

fn validate_property_deps(cxt: &mut KeywordCxt<'_>, property_deps: &PropertyDependencies<'_>) {
    if property_deps.is_empty() {
        return;
    }

    let missing = cxt.gen.declare("missing");
    for (&property, &deps) in property_deps {
        if deps.is_empty() {
            continue;
        }

        let has_property = property_in_data(cxt.data(), property, cxt.it.own_properties());
        cxt.set_params(
            [
                ("property", ParamValue::from(property)),
                ("depsCount", ParamValue::from(deps.len())),
                ("deps", ParamValue::from(deps.join(", "))),
            ],
            false,
        );

        if cxt.it.all_errors() {
            cxt.gen.if_(has_property);
            for dep in deps {
                check_report_missing_prop(cxt, dep);
            }
            cxt.gen.end_if();
        } else {
            let cond = Expr::and([has_property, check_missing_prop(cxt, deps, &missing)]);
            cxt.gen.if_(cond);
            report_missing_prop(cxt, &missing);
            // Later triggers nest in the else branch; the compiler closes it.
            cxt.gen.else_();
        }
    }
}

fn validate_schema_deps(
    cxt: &mut KeywordCxt<'_>,
    schema_deps: &SchemaDependencies<'_>,
    valid: &Name,
) -> Result<(), CompileError> {
    for (&property, &schema) in schema_deps {
        if always_valid_schema(schema) {
            continue;
        }

        let present = property_in_data(cxt.data(), property, cxt.it.own_properties());
        cxt.gen.if_(present);
        cxt.subschema(
            Subschema {
                keyword: "dependencies",
                schema_prop: property,
                schema,
                data_prop: None,
            },
            valid,
        )?;
        cxt.gen.else_();
        cxt.gen.assign(valid, Expr::Bool(true));
        cxt.gen.end_if();
        cxt.ok(valid);
    }
    Ok(())
}

/// A property dependency failure, as exposed to error consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyError {
    /// The trigger property.
    pub property: String,
    /// A required property that was absent, when known.
    pub missing_property: Option<String>,
    /// Number of properties declared for the trigger.
    pub deps_count: usize,
    /// All declared properties, joined with `", "`.
    pub deps: String,
}

impl DependencyError {
    /// Describes a failure of `property`'s declared dependencies.
    pub fn new(property: impl Into<String>, deps: &[String]) -> Self {
        Self {
            property: property.into(),
            missing_property: None,
            deps_count: deps.len(),
            deps: deps.join(", "),
        }
    }

    /// Sets the missing property and returns self for chaining.
    pub fn with_missing(mut self, missing: impl Into<String>) -> Self {
        self.missing_property = Some(missing.into());
        self
    }

    /// Reads the fields back from raw error parameters.
    pub fn from_params(params: &ErrorParams) -> Self {
        let text = |key: &str| params.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            property: text("property").unwrap_or_default(),
            missing_property: text("missingProperty"),
            deps_count: params
                .get("depsCount")
                .and_then(Value::as_u64)
                .map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX)),
            deps: text("deps").unwrap_or_default(),
        }
    }

    /// Renders the human-readable message.
    pub fn message(&self) -> String {
        let property_ies = if self.deps_count == 1 {
            "property"
        } else {
            "properties"
        };
        format!(
            "should have {} {} when property {} is present",
            property_ies, self.deps, self.property
        )
    }

    /// Renders the structured parameters.
    pub fn params(&self) -> ErrorParams {
        let mut out = ErrorParams::new();
        out.insert("property".to_string(), Value::from(self.property.as_str()));
        out.insert(
            "missingProperty".to_string(),
            self.missing_property
                .as_deref()
                .map_or(Value::Null, Value::from),
        );
        out.insert("depsCount".to_string(), Value::from(self.deps_count));
        out.insert("deps".to_string(), Value::from(self.deps.as_str()));
        out
    }
}

fn error_message(params: &ErrorParams) -> String {
    DependencyError::from_params(params).message()
}

fn error_params(params: &ErrorParams) -> ErrorParams {
    DependencyError::from_params(params).params()
}
