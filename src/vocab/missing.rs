//! Missing-property checks shared by `required` and `dependencies`.

use crate::codegen::{Expr, Name, ParamValue};
use crate::compile::util::no_property_in_data;
use crate::keyword::KeywordCxt;

/// Emits a check for one property and reports it as `missingProperty` when
/// absent. Used when every failure is reported.
pub fn check_report_missing_prop(cxt: &mut KeywordCxt<'_>, property: &str) {
    let cond = no_property_in_data(cxt.data(), property, cxt.it.own_properties());
    cxt.gen.if_(cond);
    cxt.set_params([("missingProperty", ParamValue::from(property))], true);
    cxt.error();
    cxt.gen.end_if();
}

/// Expression that is true if any of `properties` is absent, binding the
/// first absent one (scanning left to right) to `missing`.
pub fn check_missing_prop(cxt: &KeywordCxt<'_>, properties: &[String], missing: &Name) -> Expr {
    let own = cxt.it.own_properties();
    Expr::or(properties.iter().map(|property| {
        Expr::and([
            no_property_in_data(cxt.data(), property, own),
            Expr::bind(missing, Expr::Str(property.clone())),
        ])
    }))
}

/// Reports the property held in `missing` as `missingProperty`.
pub fn report_missing_prop(cxt: &mut KeywordCxt<'_>, missing: &Name) {
    cxt.set_params([("missingProperty", ParamValue::from(missing))], true);
    cxt.error();
}
