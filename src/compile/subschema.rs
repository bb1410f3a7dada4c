//! Applying a subschema in place.

use crate::codegen::{CodeGen, Expr, Name};
use crate::error::CompileError;
use crate::schema::SchemaNode;
use crate::validation::ValidationContext;

use super::schema_code;

/// A subschema reached from a keyword of the current schema.
#[derive(Debug, Clone, Copy)]
pub struct Subschema<'a> {
    /// Keyword holding the subschema (e.g. `dependencies`).
    pub keyword: &'static str,
    /// Member of the keyword's value holding the subschema (e.g. the trigger).
    pub schema_prop: &'a str,
    /// The subschema itself.
    pub schema: &'a SchemaNode,
    /// Property of the current data to validate, or None for the data itself.
    pub data_prop: Option<&'a str>,
}

/// Emits the subschema's checks inline and assigns its result to `valid`.
///
/// `valid` is true when the subschema reported no error, which makes the
/// result meaningful under both error policies.
pub fn apply_subschema(
    gen: &mut CodeGen,
    it: &ValidationContext,
    sub: Subschema<'_>,
    valid: &Name,
) -> Result<(), CompileError> {
    let data = sub.data_prop.map(|prop| gen.bind_data(it.data(), prop));
    let sub_it = it.descend(sub.keyword, sub.schema_prop, data);

    let errors_before = gen.let_("errs", Expr::ErrorCount);
    schema_code(gen, &sub_it, sub.schema)?;
    gen.assign(valid, Expr::NoErrorsSince(errors_before));
    Ok(())
}
