//! Boolean and value expressions used by generated code.

use crate::schema::JsonType;

use super::Name;

/// An expression in generated code.
///
/// Conditions are evaluated for truthiness: `null`, `false`, `0` and the empty
/// string are false, everything else is true.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// No value; the initial value of a declared variable.
    Undefined,
    /// A boolean literal.
    Bool(bool),
    /// A string literal.
    Str(String),
    /// The current value of a variable.
    Var(Name),
    /// Logical negation.
    Not(Box<Expr>),
    /// Short-circuit conjunction; true when empty.
    And(Vec<Expr>),
    /// Short-circuit disjunction; false when empty.
    Or(Vec<Expr>),
    /// True if the referenced data has the given JSON type.
    IsType { data: Name, ty: JsonType },
    /// True if `property` is present on the referenced object.
    HasProperty {
        data: Name,
        property: String,
        own: bool,
    },
    /// Assigns `value` to `name` and evaluates to true.
    Bind { name: Name, value: Box<Expr> },
    /// Number of errors reported so far.
    ErrorCount,
    /// True if no error was reported since the count stored in the variable.
    NoErrorsSince(Name),
}

impl Expr {
    /// Negates an expression, folding literals and double negation.
    pub fn not(expr: Expr) -> Expr {
        match expr {
            Expr::Bool(b) => Expr::Bool(!b),
            Expr::Not(inner) => *inner,
            other => Expr::Not(Box::new(other)),
        }
    }

    /// Builds a conjunction, flattening nested conjunctions and dropping `true`.
    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        let mut parts = Vec::new();
        for expr in exprs {
            match expr {
                Expr::Bool(true) => {}
                Expr::And(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Expr::And(parts)
        }
    }

    /// Builds a disjunction, flattening nested disjunctions and dropping `false`.
    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Expr {
        let mut parts = Vec::new();
        for expr in exprs {
            match expr {
                Expr::Bool(false) => {}
                Expr::Or(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            Expr::Or(parts)
        }
    }

    /// Assignment used as a condition.
    pub fn bind(name: &Name, value: Expr) -> Expr {
        Expr::Bind {
            name: name.clone(),
            value: Box::new(value),
        }
    }

    /// A variable reference.
    pub fn var(name: &Name) -> Expr {
        Expr::Var(name.clone())
    }
}
