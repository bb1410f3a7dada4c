//! Error types for validation failures and compilation faults.
//!
//! Validation failures are values ([`SchemaError`], [`SchemaErrors`]) carried
//! by `stillwater::Validation`. Compilation and execution faults are ordinary
//! `Result` errors ([`CompileError`], [`ExecError`]).

mod compile_error;
mod schema_error;

pub use compile_error::{CompileError, ExecError};
pub use schema_error::{SchemaError, SchemaErrors};
