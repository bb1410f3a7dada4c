//! # Depgen
//!
//! A JSON Schema validator compiler centred on the `dependencies` keyword.
//!
//! ## Overview
//!
//! A schema document is compiled once into generated code: a small tree of
//! statements that tests property presence, records errors and nests
//! subschema checks. The code is then run against any number of instances.
//!
//! Two error policies are supported:
//!
//! - stop-at-first (the default) reports the first failure and stops;
//! - accumulate-all reports every failure, collected through stillwater's
//!   `Validation` type.
//!
//! ## Core Types
//!
//! - [`compile`]: turns a schema document into a [`Validator`]
//! - [`CompileOptions`]: error policy, own-properties mode and depth limit
//! - [`SchemaError`]: one reported failure with instance path, schema path,
//!   keyword, parameters and message
//! - [`SchemaErrors`]: a non-empty collection of failures
//! - [`ValidatorRegistry`]: named, shareable validators
//!
//! ## Example
//!
//! ```rust
//! use depgen::{compile, CompileOptions};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "dependencies": {
//!         "credit_card": ["billing_address"],
//!         "name": {"required": ["surname"]}
//!     }
//! });
//!
//! let validator = compile(&schema, &CompileOptions::new().all_errors(true)).unwrap();
//!
//! let result = validator.validate(&json!({"credit_card": 1, "name": "x"})).unwrap();
//! let errors = result.into_result().unwrap_err();
//! assert_eq!(errors.len(), 2);
//! assert_eq!(
//!     errors.first().message,
//!     "should have property billing_address when property credit_card is present"
//! );
//! ```

pub mod codegen;
pub mod compile;
pub mod error;
pub mod exec;
pub mod keyword;
pub mod options;
pub mod path;
pub mod registry;
pub mod schema;
pub mod validation;
pub mod vocab;

pub use compile::{compile, compile_node, Validator};
pub use error::{CompileError, ExecError, SchemaError, SchemaErrors};
pub use exec::Instance;
pub use keyword::{ErrorDescriptor, KeywordDefinition};
pub use options::{CompileOptions, ErrorPolicy};
pub use path::{JsonPointer, PathSegment};
pub use registry::{RegistryError, ValidatorRegistry};
pub use schema::{ConstraintMap, ConstraintValue, JsonType, SchemaNode, SchemaObject};
pub use vocab::dependencies::{split_dependencies, DependencyError};

/// Type alias for validation results using SchemaErrors
pub type ValidationResult<T> = stillwater::Validation<T, SchemaErrors>;
