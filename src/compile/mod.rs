//! Schema compilation.
//!
//! [`compile`] parses a schema document once, walks the resulting tree and
//! lets every keyword emit its checks into a shared code buffer. The result is
//! a [`Validator`] holding the generated code and the options it was compiled
//! with.
//!
//! # Example
//!
//! ```rust
//! use depgen::{compile, CompileOptions};
//! use serde_json::json;
//!
//! let validator = compile(
//!     &json!({"dependencies": {"credit_card": ["billing_address"]}}),
//!     &CompileOptions::new(),
//! )
//! .unwrap();
//!
//! assert!(validator.is_valid(&json!({"credit_card": 1, "billing_address": "x"})).unwrap());
//! assert!(!validator.is_valid(&json!({"credit_card": 1})).unwrap());
//! ```

pub mod subschema;
pub mod util;

use std::sync::Arc;

use serde_json::{Map, Value};
use stillwater::Validation;

use crate::codegen::{Block, CodeGen, ErrorSite, Expr, Name};
use crate::error::{CompileError, ExecError, SchemaErrors};
use crate::exec::{self, Instance};
use crate::keyword::{report, ErrorDescriptor, KeywordCxt, KeywordDefinition};
use crate::options::CompileOptions;
use crate::schema::{SchemaNode, SchemaObject};
use crate::validation::ValidationContext;
use crate::vocab;
use crate::ValidationResult;

/// Error reported by the `false` schema.
const FALSE_SCHEMA_ERROR: ErrorDescriptor = ErrorDescriptor {
    message: |_| "boolean schema is false".to_string(),
    params: |_| Map::new(),
};

/// Compiles a schema document.
///
/// # Errors
///
/// Returns a [`CompileError`] if the document is not a valid schema for the
/// supported keywords or nests deeper than the configured limit.
pub fn compile(schema: &Value, options: &CompileOptions) -> Result<Validator, CompileError> {
    let root = SchemaNode::from_value_with_depth(schema, options.max_depth())?;
    compile_node(&root, options)
}

/// Compiles an already parsed schema.
pub fn compile_node(root: &SchemaNode, options: &CompileOptions) -> Result<Validator, CompileError> {
    let mut gen = CodeGen::new();
    let it = ValidationContext::new(Arc::new(options.clone()), Name::data());

    schema_code(&mut gen, &it, root)?;
    let code = gen.finish()?;

    tracing::debug!(
        statements = code.len(),
        all_errors = options.is_all_errors(),
        own_properties = options.is_own_properties(),
        "compiled schema"
    );

    Ok(Validator {
        code: Arc::new(code),
        options: options.clone(),
    })
}

/// Emits the checks of one schema node.
pub(crate) fn schema_code(
    gen: &mut CodeGen,
    it: &ValidationContext,
    node: &SchemaNode,
) -> Result<(), CompileError> {
    match node {
        SchemaNode::Bool(true) => Ok(()),
        SchemaNode::Bool(false) => {
            let site = ErrorSite {
                keyword: "false schema",
                data: it.data().clone(),
                schema_path: it.schema_path().clone(),
                params: Vec::new(),
                descriptor: FALSE_SCHEMA_ERROR,
            };
            report(gen, it, site);
            Ok(())
        }
        SchemaNode::Object(schema) => {
            for def in vocab::KEYWORDS {
                if schema.has_keyword(def.keyword) {
                    keyword_code(gen, it, schema, def)?;
                }
            }
            Ok(())
        }
    }
}

fn keyword_code(
    gen: &mut CodeGen,
    it: &ValidationContext,
    schema: &SchemaObject,
    def: &KeywordDefinition,
) -> Result<(), CompileError> {
    tracing::trace!(
        keyword = def.keyword,
        schema_path = %it.schema_path(),
        depth = it.depth(),
        "compiling keyword"
    );

    if let Some(ty) = def.data_type {
        gen.if_(Expr::IsType {
            data: it.data().clone(),
            ty,
        });
    }

    // Keywords may leave else-branches open; close them here.
    let depth = gen.depth();
    let mut cxt = KeywordCxt::new(gen, it, schema, def);
    (def.code)(&mut cxt)?;
    gen.end_blocks(depth);

    if def.data_type.is_some() {
        gen.end_if();
    }
    Ok(())
}

/// A compiled schema.
///
/// Validators are immutable; validating an instance keeps all state local to
/// the call, so one validator can be shared between threads. Clones share
/// the generated code.
#[derive(Debug, Clone)]
pub struct Validator {
    code: Arc<Block>,
    options: CompileOptions,
}

impl Validator {
    /// The generated code.
    pub fn code(&self) -> &Block {
        &self.code
    }

    /// The options the validator was compiled with.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Validates a JSON value with no inherited properties.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecError`] only if the generated code is inconsistent.
    pub fn validate(&self, value: &Value) -> Result<ValidationResult<()>, ExecError> {
        self.validate_instance(&Instance::new(value))
    }

    /// Validates an instance, honouring its prototype properties.
    pub fn validate_instance(&self, instance: &Instance<'_>) -> Result<ValidationResult<()>, ExecError> {
        let errors = exec::run(&self.code, instance)?;
        Ok(match SchemaErrors::try_from_vec(errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(()),
        })
    }

    /// Returns true if the value passes validation.
    pub fn is_valid(&self, value: &Value) -> Result<bool, ExecError> {
        Ok(self.validate(value)?.is_success())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Validator>();
    assert_sync::<Validator>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Stmt;
    use serde_json::json;

    fn unwrap_failure<T: std::fmt::Debug, E>(v: Validation<T, E>) -> E {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_true_schema_emits_nothing() {
        let validator = compile(&json!(true), &CompileOptions::new()).unwrap();
        assert!(validator.code().is_empty());
        assert!(validator.is_valid(&json!("anything")).unwrap());
    }

    #[test]
    fn test_false_schema_rejects_everything() {
        let validator = compile(&json!(false), &CompileOptions::new()).unwrap();
        let errors = unwrap_failure(validator.validate(&json!({})).unwrap());

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first().keyword, "false schema");
        assert_eq!(errors.first().message, "boolean schema is false");
    }

    #[test]
    fn test_object_keywords_are_guarded_by_type() {
        let validator = compile(&json!({"required": ["a"]}), &CompileOptions::new()).unwrap();

        assert!(validator.is_valid(&json!("not an object")).unwrap());
        assert!(validator.is_valid(&json!([1, 2])).unwrap());
        assert!(!validator.is_valid(&json!({})).unwrap());
    }

    #[test]
    fn test_compile_leaves_no_open_blocks() {
        let schema = json!({
            "required": ["a", "b"],
            "dependencies": {"a": ["c"], "b": ["d"]}
        });
        let validator = compile(&schema, &CompileOptions::new()).unwrap();
        assert_eq!(
            validator.code().count_where(|s| matches!(s, Stmt::Fail(_))),
            3
        );
    }

    #[test]
    fn test_compile_errors_propagate() {
        let err = compile(&json!({"dependencies": {"a": 1}}), &CompileOptions::new()).unwrap_err();
        assert!(matches!(err, CompileError::InvalidDependency { .. }));
    }

    #[test]
    fn test_max_depth_from_options() {
        let schema = json!({"properties": {"a": {"properties": {"b": {}}}}});
        assert!(compile(&schema, &CompileOptions::new().with_max_depth(2)).is_ok());
        assert!(compile(&schema, &CompileOptions::new().with_max_depth(1)).is_err());
    }
}
