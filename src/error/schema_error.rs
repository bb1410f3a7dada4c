//! Validation error types.
//!
//! This module provides [`SchemaError`] for a single failed keyword and
//! [`SchemaErrors`] for the non-empty set of failures a validator reports.

use std::fmt::{self, Display};

use serde_json::{Map, Value};
use stillwater::prelude::*;

use crate::path::JsonPointer;

/// A single validation error with full context.
///
/// `SchemaError` captures everything an error consumer needs:
/// - **instance_path**: where in the data the failure was detected
/// - **schema_path**: which keyword of the schema produced it
/// - **keyword**: the keyword name (e.g. `dependencies`)
/// - **params**: the keyword's structured parameters
/// - **message**: the rendered human-readable description
///
/// # Example
///
/// ```rust
/// use depgen::{JsonPointer, SchemaError};
/// use serde_json::json;
///
/// let error = SchemaError::new("required", JsonPointer::root(), "should have required property 'id'")
///     .with_schema_path(JsonPointer::root().push_key("required"))
///     .with_param("missingProperty", json!("id"));
///
/// assert_eq!(error.keyword, "required");
/// assert_eq!(error.params["missingProperty"], "id");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    /// Pointer to the instance value that failed validation.
    pub instance_path: JsonPointer,
    /// Pointer to the failing keyword inside the schema.
    pub schema_path: JsonPointer,
    /// The keyword that reported the failure.
    pub keyword: String,
    /// Structured keyword parameters.
    pub params: Map<String, Value>,
    /// Human-readable error message.
    pub message: String,
}

impl SchemaError {
    /// Creates a new error for `keyword` at the given instance path.
    pub fn new(
        keyword: impl Into<String>,
        instance_path: JsonPointer,
        message: impl Into<String>,
    ) -> Self {
        Self {
            instance_path,
            schema_path: JsonPointer::root(),
            keyword: keyword.into(),
            params: Map::new(),
            message: message.into(),
        }
    }

    /// Sets the schema path and returns self for chaining.
    pub fn with_schema_path(mut self, schema_path: JsonPointer) -> Self {
        self.schema_path = schema_path;
        self
    }

    /// Replaces all parameters and returns self for chaining.
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    /// Sets a single parameter and returns self for chaining.
    pub fn with_param(mut self, name: impl Into<String>, value: Value) -> Self {
        self.params.insert(name.into(), value);
        self
    }

    /// Returns a parameter as a string slice, if it is one.
    pub fn param_str(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.instance_path.is_root() {
            "(root)".to_string()
        } else {
            self.instance_path.to_string()
        };

        write!(
            f,
            "{}: {} (at {})",
            path_str,
            self.message,
            self.schema_path.to_fragment()
        )
    }
}

impl std::error::Error for SchemaError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<SchemaError>();
    assert_sync::<SchemaError>();
};

/// A non-empty collection of validation errors.
///
/// `SchemaErrors` wraps a `NonEmptyVec<SchemaError>` so a failed
/// `Validation<(), SchemaErrors>` always carries at least one error.
///
/// # Combining Errors
///
/// ```rust
/// use depgen::{JsonPointer, SchemaError, SchemaErrors};
/// use stillwater::prelude::*;
///
/// let a = SchemaErrors::single(SchemaError::new("required", JsonPointer::root(), "first"));
/// let b = SchemaErrors::single(SchemaError::new("dependencies", JsonPointer::root(), "second"));
///
/// assert_eq!(a.combine(b).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaErrors(NonEmptyVec<SchemaError>);

impl SchemaErrors {
    /// Creates a `SchemaErrors` containing a single error.
    pub fn single(error: SchemaError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a `SchemaErrors` from a `NonEmptyVec` of errors.
    pub fn from_non_empty(errors: NonEmptyVec<SchemaError>) -> Self {
        Self(errors)
    }

    /// Creates a `SchemaErrors` from a vec, or `None` if it is empty.
    pub fn try_from_vec(errors: Vec<SchemaError>) -> Option<Self> {
        let mut errors = errors.into_iter();
        let head = errors.next()?;
        Some(errors.fold(Self::single(head), |acc, e| acc.combine(Self::single(e))))
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is non-empty by construction.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &SchemaError> {
        self.0.iter()
    }

    /// Returns all errors at the given instance path.
    pub fn at_path(&self, path: &JsonPointer) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| &e.instance_path == path).collect()
    }

    /// Returns all errors reported by the given keyword.
    pub fn with_keyword(&self, keyword: &str) -> Vec<&SchemaError> {
        self.0.iter().filter(|e| e.keyword == keyword).collect()
    }

    /// Returns the first error in the collection.
    pub fn first(&self) -> &SchemaError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<SchemaError>`.
    pub fn into_vec(self) -> Vec<SchemaError> {
        self.0.into_vec()
    }

    /// Returns a reference to the underlying `NonEmptyVec`.
    pub fn as_non_empty_vec(&self) -> &NonEmptyVec<SchemaError> {
        &self.0
    }
}

impl Semigroup for SchemaErrors {
    fn combine(self, other: Self) -> Self {
        SchemaErrors(self.0.combine(other.0))
    }
}

impl Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaErrors {}

impl IntoIterator for SchemaErrors {
    type Item = SchemaError;
    type IntoIter = std::vec::IntoIter<SchemaError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a SchemaErrors {
    type Item = &'a SchemaError;
    type IntoIter = Box<dyn Iterator<Item = &'a SchemaError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}
