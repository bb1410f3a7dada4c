//! Keyword definitions and the per-keyword compilation context.
//!
//! Each keyword the compiler understands is described by a
//! [`KeywordDefinition`]: its name, the instance type it applies to, the shape
//! of its schema value, a code generation entry point and an
//! [`ErrorDescriptor`] that renders reported failures.

use std::fmt;

use serde_json::{Map, Value};

use crate::codegen::{CodeGen, ErrorSite, Expr, Name, ParamValue, Stmt};
use crate::compile::subschema::{apply_subschema, Subschema};
use crate::error::CompileError;
use crate::path::JsonPointer;
use crate::schema::{JsonType, SchemaObject};
use crate::validation::ValidationContext;

/// Raw parameters collected for an error at validation time.
pub type ErrorParams = Map<String, Value>;

/// Renders a reported failure.
#[derive(Clone, Copy)]
pub struct ErrorDescriptor {
    /// Builds the human-readable message.
    pub message: fn(&ErrorParams) -> String,
    /// Builds the parameters exposed on the error.
    pub params: fn(&ErrorParams) -> ErrorParams,
}

impl ErrorDescriptor {
    /// Used by keywords that never define their own error.
    pub const GENERIC: ErrorDescriptor = ErrorDescriptor {
        message: |_| "should pass keyword validation".to_string(),
        params: |params| params.clone(),
    };
}

impl fmt::Debug for ErrorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorDescriptor").finish_non_exhaustive()
    }
}

/// Code generation entry point of a keyword.
pub type CodeFn = fn(&mut KeywordCxt<'_>) -> Result<(), CompileError>;

/// Describes one keyword to the compiler.
#[derive(Clone, Copy)]
pub struct KeywordDefinition {
    /// Keyword name as it appears in schemas.
    pub keyword: &'static str,
    /// Instance type the keyword applies to; other types skip it.
    pub data_type: Option<JsonType>,
    /// Expected JSON type of the keyword's schema value.
    ///
    /// Descriptive only: values are type-checked once, when the schema is
    /// parsed, and parse errors report this same type.
    pub schema_type: JsonType,
    /// Emits the keyword's validation code.
    pub code: CodeFn,
    /// Renders errors reported by the keyword.
    pub error: Option<ErrorDescriptor>,
}

impl fmt::Debug for KeywordDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeywordDefinition")
            .field("keyword", &self.keyword)
            .field("data_type", &self.data_type)
            .field("schema_type", &self.schema_type)
            .finish_non_exhaustive()
    }
}

/// Emits an error report following the context's error policy.
///
/// Under stop-at-first the report also ends validation.
pub(crate) fn report(gen: &mut CodeGen, it: &ValidationContext, site: ErrorSite) {
    if it.all_errors() {
        gen.push(Stmt::Report(site));
    } else {
        gen.push(Stmt::Fail(site));
    }
}

/// State available to a keyword while it emits code.
pub struct KeywordCxt<'a> {
    /// The code buffer.
    pub gen: &'a mut CodeGen,
    /// The schema node's compilation context.
    pub it: &'a ValidationContext,
    /// The schema object containing the keyword.
    pub schema: &'a SchemaObject,
    def: &'a KeywordDefinition,
    params: Vec<(String, ParamValue)>,
}

impl<'a> KeywordCxt<'a> {
    pub(crate) fn new(
        gen: &'a mut CodeGen,
        it: &'a ValidationContext,
        schema: &'a SchemaObject,
        def: &'a KeywordDefinition,
    ) -> Self {
        Self {
            gen,
            it,
            schema,
            def,
            params: Vec::new(),
        }
    }

    /// The keyword being compiled.
    pub fn keyword(&self) -> &'static str {
        self.def.keyword
    }

    /// The data reference the keyword validates.
    pub fn data(&self) -> &Name {
        self.it.data()
    }

    /// Location of the keyword in the schema.
    pub fn schema_path(&self) -> JsonPointer {
        self.it.schema_path().push_key(self.def.keyword)
    }

    /// Sets parameters for the next reported error.
    ///
    /// With `append` the given entries are merged into the current ones,
    /// otherwise they replace them.
    pub fn set_params<K: Into<String>>(
        &mut self,
        params: impl IntoIterator<Item = (K, ParamValue)>,
        append: bool,
    ) {
        if !append {
            self.params.clear();
        }
        for (key, value) in params {
            let key = key.into();
            match self.params.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => self.params.push((key, value)),
            }
        }
    }

    /// Emits a report of the keyword's error with the current parameters.
    pub fn error(&mut self) {
        let site = ErrorSite {
            keyword: self.def.keyword,
            data: self.it.data().clone(),
            schema_path: self.schema_path(),
            params: self.params.clone(),
            descriptor: self.def.error.unwrap_or(ErrorDescriptor::GENERIC),
        };
        report(self.gen, self.it, site);
    }

    /// Reports the result held in `valid` to the enclosing schema.
    ///
    /// Under stop-at-first a false result ends validation; under
    /// accumulate-all the failing checks have already been recorded.
    pub fn ok(&mut self, valid: &Name) {
        if !self.it.all_errors() {
            self.gen.if_(Expr::not(Expr::var(valid)));
            self.gen.push(Stmt::Return(false));
            self.gen.end_if();
        }
    }

    /// Applies a subschema, assigning its result to `valid`.
    pub fn subschema(&mut self, sub: Subschema<'_>, valid: &Name) -> Result<(), CompileError> {
        apply_subschema(self.gen, self.it, sub, valid)
    }
}
