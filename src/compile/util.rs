//! Helpers shared by keyword compilers.

use crate::codegen::{Expr, Name};
use crate::schema::SchemaNode;

/// Returns true if `schema` accepts every instance.
///
/// That is the `true` schema and any schema object without a keyword that can
/// produce a check.
pub fn always_valid_schema(schema: &SchemaNode) -> bool {
    match schema {
        SchemaNode::Bool(b) => *b,
        SchemaNode::Object(obj) => !obj.has_rules(),
    }
}

/// Expression testing that `property` is present on `data`.
///
/// With `own` set, only properties held by the object itself count; otherwise
/// inherited properties count too.
pub fn property_in_data(data: &Name, property: &str, own: bool) -> Expr {
    Expr::HasProperty {
        data: data.clone(),
        property: property.to_string(),
        own,
    }
}

/// Expression testing that `property` is absent from `data`.
pub fn no_property_in_data(data: &Name, property: &str, own: bool) -> Expr {
    Expr::not(property_in_data(data, property, own))
}
