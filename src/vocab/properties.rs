//! The `properties` keyword.

use crate::codegen::Expr;
use crate::compile::subschema::Subschema;
use crate::compile::util::{always_valid_schema, property_in_data};
use crate::error::CompileError;
use crate::keyword::{KeywordCxt, KeywordDefinition};
use crate::schema::JsonType;

pub const DEF: KeywordDefinition = KeywordDefinition {
    keyword: "properties",
    data_type: Some(JsonType::Object),
    schema_type: JsonType::Object,
    code,
    error: None,
};

fn code(cxt: &mut KeywordCxt<'_>) -> Result<(), CompileError> {
    let schema = cxt.schema;
    let Some(properties) = schema.properties() else {
        return Ok(());
    };

    let valid = cxt.gen.name("valid");
    for (property, sub) in properties {
        if always_valid_schema(sub) {
            continue;
        }

        let present = property_in_data(cxt.data(), property, cxt.it.own_properties());
        cxt.gen.if_(present);
        cxt.subschema(
            Subschema {
                keyword: "properties",
                schema_prop: property,
                schema: sub,
                data_prop: Some(property),
            },
            &valid,
        )?;
        if !cxt.it.all_errors() {
            cxt.gen.else_();
            cxt.gen.assign(&valid, Expr::Bool(true));
        }
        cxt.gen.end_if();
        cxt.ok(&valid);
    }
    Ok(())
}
