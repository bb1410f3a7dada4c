//! Named storage for compiled validators.
//!
//! This module provides the [`ValidatorRegistry`] type, which compiles schema
//! documents once under shared options and hands out the resulting
//! [`Validator`]s by name.

use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::compile::{compile, Validator};
use crate::error::{CompileError, ExecError};
use crate::options::CompileOptions;
use crate::ValidationResult;

struct Entry {
    source: Value,
    validator: Arc<Validator>,
}

/// Type alias for the validator storage map.
type ValidatorMap = Arc<RwLock<HashMap<String, Entry>>>;

/// A thread-safe registry of compiled validators.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Multiple threads can validate concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// Clones share the same storage.
///
/// # Example
///
/// ```rust
/// use depgen::ValidatorRegistry;
/// use serde_json::json;
///
/// let registry = ValidatorRegistry::new();
/// registry
///     .register("Payment", &json!({"dependencies": {"card": ["billing_address"]}}))
///     .unwrap();
///
/// let result = registry.validate("Payment", &json!({"card": "4111"})).unwrap();
/// assert!(result.is_failure());
/// ```
pub struct ValidatorRegistry {
    validators: ValidatorMap,
    options: CompileOptions,
}

impl ValidatorRegistry {
    /// Creates an empty registry compiling with default options.
    pub fn new() -> Self {
        Self::with_options(CompileOptions::default())
    }

    /// Creates an empty registry compiling with `options`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgen::{CompileOptions, ValidatorRegistry};
    ///
    /// let registry = ValidatorRegistry::with_options(CompileOptions::new().all_errors(true));
    /// assert!(registry.options().is_all_errors());
    /// ```
    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            validators: Arc::new(RwLock::new(HashMap::new())),
            options,
        }
    }

    /// The options every registered schema is compiled with.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compiles `schema` and stores it under `name`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already taken and
    /// `RegistryError::Compile` if the schema does not compile. Nothing is
    /// stored in either case.
    pub fn register(&self, name: impl Into<String>, schema: &Value) -> Result<(), RegistryError> {
        let name = name.into();
        if self.validators.read().contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        let validator = compile(schema, &self.options)?;

        let mut validators = self.validators.write();
        if validators.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        tracing::debug!(name = %name, statements = validator.code().len(), "registered schema");
        validators.insert(
            name,
            Entry {
                source: schema.clone(),
                validator: Arc::new(validator),
            },
        );
        Ok(())
    }

    /// Retrieves a validator by name.
    pub fn get(&self, name: &str) -> Option<Arc<Validator>> {
        self.validators
            .read()
            .get(name)
            .map(|entry| Arc::clone(&entry.validator))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.validators.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Validates a value against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SchemaNotFound` if the name is not registered.
    pub fn validate(&self, name: &str, value: &Value) -> Result<ValidationResult<()>, RegistryError> {
        let validator = self
            .get(name)
            .ok_or_else(|| RegistryError::SchemaNotFound(name.to_string()))?;
        Ok(validator.validate(value)?)
    }

    /// Exports the registered schema documents under `$defs`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgen::ValidatorRegistry;
    /// use serde_json::json;
    ///
    /// let registry = ValidatorRegistry::new();
    /// registry.register("Named", &json!({"required": ["name"]})).unwrap();
    ///
    /// let doc = registry.to_json_schema();
    /// assert_eq!(doc["$defs"]["Named"], json!({"required": ["name"]}));
    /// ```
    pub fn to_json_schema(&self) -> Value {
        let validators = self.validators.read();
        let mut names: Vec<_> = validators.keys().collect();
        names.sort();

        let mut defs = serde_json::Map::new();
        for name in names {
            defs.insert(name.clone(), validators[name].source.clone());
        }
        json!({ "$defs": defs })
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ValidatorRegistry {
    fn clone(&self) -> Self {
        Self {
            validators: Arc::clone(&self.validators),
            options: self.options.clone(),
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a schema with a name that already exists.
    #[error("schema '{0}' already registered")]
    DuplicateName(String),

    /// Attempted to validate with a schema name that doesn't exist.
    #[error("schema '{0}' not found")]
    SchemaNotFound(String),

    /// The schema document did not compile.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The generated code failed to run.
    #[error(transparent)]
    Exec(#[from] ExecError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_compile_stores_nothing() {
        let registry = ValidatorRegistry::new();
        let err = registry
            .register("Bad", &json!({"dependencies": {"a": 42}}))
            .unwrap_err();

        assert!(matches!(err, RegistryError::Compile(_)));
        assert!(registry.get("Bad").is_none());
        assert!(registry.names().is_empty());
    }

    #[test]
    fn test_clones_share_storage() {
        let registry = ValidatorRegistry::new();
        let clone = registry.clone();
        registry.register("A", &json!(true)).unwrap();
        assert!(clone.get("A").is_some());
    }
}
