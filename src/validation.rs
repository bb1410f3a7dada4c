//! Compilation context threaded through keyword compilers.
//!
//! This module provides the [`ValidationContext`] type that tells a keyword
//! compiler which data reference it validates, where it sits in the schema and
//! which options are in effect. Descending into a subschema produces a new
//! context; the parent is never mutated.

use std::sync::Arc;

use crate::codegen::Name;
use crate::options::CompileOptions;
use crate::path::JsonPointer;

/// Compile-time state for one schema node.
///
/// The options are shared through an `Arc` so descending into subschemas does
/// not copy them.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    options: Arc<CompileOptions>,
    data: Name,
    schema_path: JsonPointer,
    depth: usize,
}

impl ValidationContext {
    /// Creates the context for the root schema, validating `data`.
    pub fn new(options: Arc<CompileOptions>, data: Name) -> Self {
        Self {
            options,
            data,
            schema_path: JsonPointer::root(),
            depth: 0,
        }
    }

    /// Creates the context for the subschema at `keyword/schema_prop`.
    ///
    /// `data` replaces the data reference when the subschema validates a
    /// property of the current value; `None` keeps validating the same value.
    pub fn descend(&self, keyword: &str, schema_prop: &str, data: Option<Name>) -> Self {
        Self {
            options: Arc::clone(&self.options),
            data: data.unwrap_or_else(|| self.data.clone()),
            schema_path: self.schema_path.push_key(keyword).push_key(schema_prop),
            depth: self.depth + 1,
        }
    }

    /// The data reference validated by this schema node.
    pub fn data(&self) -> &Name {
        &self.data
    }

    /// Location of this schema node.
    pub fn schema_path(&self) -> &JsonPointer {
        &self.schema_path
    }

    /// Number of subschema applications above this node.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The options in effect.
    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Returns true if every failure must be reported.
    pub fn all_errors(&self) -> bool {
        self.options.is_all_errors()
    }

    /// Returns true if only own properties count as present.
    pub fn own_properties(&self) -> bool {
        self.options.is_own_properties()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::CodeGen;

    #[test]
    fn test_descend_keeps_data_by_default() {
        let it = ValidationContext::new(Arc::new(CompileOptions::new()), Name::data());
        let sub = it.descend("dependencies", "a", None);

        assert_eq!(sub.data(), &Name::data());
        assert_eq!(sub.schema_path().to_string(), "/dependencies/a");
        assert_eq!(sub.depth(), 1);
        assert_eq!(it.depth(), 0);
    }

    #[test]
    fn test_descend_with_property_data() {
        let mut gen = CodeGen::new();
        let data1 = gen.name("data");
        let it = ValidationContext::new(
            Arc::new(CompileOptions::new().own_properties(true)),
            Name::data(),
        );
        let sub = it.descend("properties", "user", Some(data1.clone()));

        assert_eq!(sub.data(), &data1);
        assert!(sub.own_properties());
        assert!(!sub.all_errors());
    }
}
