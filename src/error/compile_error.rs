//! Faults raised while compiling or executing a schema.

use crate::path::JsonPointer;
use crate::schema::JsonType;

/// Errors that prevent a schema from being compiled.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// A schema position held something other than an object or a boolean.
    #[error("schema at '{}' must be an object or a boolean, found {found}", .path.to_fragment())]
    InvalidSchema { path: JsonPointer, found: JsonType },

    /// A recognised keyword had a value of the wrong JSON type.
    #[error("keyword '{keyword}' at '{}' must be {expected}, found {found}", .path.to_fragment())]
    KeywordType {
        keyword: &'static str,
        path: JsonPointer,
        expected: JsonType,
        found: JsonType,
    },

    /// A `dependencies` entry was neither a list of property names nor a schema.
    #[error("dependency '{property}' at '{}' must be an array of strings or a schema, found {found}", .path.to_fragment())]
    InvalidDependency {
        property: String,
        path: JsonPointer,
        found: JsonType,
    },

    /// Schema nesting exceeded the configured limit.
    #[error("maximum schema depth {max_depth} exceeded at '{}'", .path.to_fragment())]
    MaxDepthExceeded { path: JsonPointer, max_depth: usize },

    /// Code generation finished with conditional blocks still open.
    #[error("{0} conditional block(s) left open")]
    UnclosedBlock(usize),
}

/// Errors raised by generated code that reads a name it never bound.
///
/// Seeing one of these means the generator emitted inconsistent code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecError {
    /// A variable was read before any statement assigned it.
    #[error("variable '{0}' read before assignment")]
    UnboundName(String),

    /// A data reference was used before it was bound to an instance value.
    #[error("data reference '{0}' is not bound")]
    UnboundData(String),
}
