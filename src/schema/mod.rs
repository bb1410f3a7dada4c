//! Typed schema model.
//!
//! A schema document is parsed once into a [`SchemaNode`] tree. Keywords the
//! compiler understands are turned into typed fields during that pass, so
//! keyword compilers never re-inspect raw JSON shapes. Unrecognised keywords
//! are kept as annotations and never produce checks.
//!
//! # Example
//!
//! ```rust
//! use depgen::schema::{ConstraintValue, SchemaNode};
//! use serde_json::json;
//!
//! let node = SchemaNode::from_value(&json!({
//!     "dependencies": {
//!         "card": ["billing_address"],
//!         "name": {"required": ["surname"]}
//!     }
//! }))
//! .unwrap();
//!
//! let deps = node.as_object().unwrap().dependencies().unwrap();
//! assert!(matches!(deps.get("card"), Some(ConstraintValue::RequiredList(_))));
//! assert!(matches!(deps.get("name"), Some(ConstraintValue::EmbeddedSchema(_))));
//! ```

mod constraint;

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::CompileError;
use crate::path::JsonPointer;

pub use constraint::{ConstraintMap, ConstraintValue};

/// Maximum nesting depth used by [`SchemaNode::from_value`].
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// The JSON type of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl JsonType {
    /// Returns the JSON type of `value`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonType::Null,
            Value::Bool(_) => JsonType::Boolean,
            Value::Number(_) => JsonType::Number,
            Value::String(_) => JsonType::String,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }

    /// Returns the JSON Schema name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::Null => "null",
            JsonType::Boolean => "boolean",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        }
    }
}

impl Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed schema: either a boolean schema or a keyword object.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// `true` accepts everything, `false` rejects everything.
    Bool(bool),
    /// A schema object.
    Object(SchemaObject),
}

impl SchemaNode {
    /// Parses a schema document with the default nesting limit.
    pub fn from_value(value: &Value) -> Result<Self, CompileError> {
        Self::from_value_with_depth(value, DEFAULT_MAX_DEPTH)
    }

    /// Parses a schema document, rejecting nesting deeper than `max_depth`.
    pub fn from_value_with_depth(value: &Value, max_depth: usize) -> Result<Self, CompileError> {
        Parser { max_depth }.node(value, &JsonPointer::root(), 0)
    }

    /// Returns the schema object, or None for a boolean schema.
    pub fn as_object(&self) -> Option<&SchemaObject> {
        match self {
            SchemaNode::Object(obj) => Some(obj),
            SchemaNode::Bool(_) => None,
        }
    }
}

/// A schema object with its recognised keywords parsed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaObject {
    required: Option<Vec<String>>,
    properties: Option<IndexMap<String, SchemaNode>>,
    dependencies: Option<ConstraintMap>,
    annotations: Map<String, Value>,
}

impl SchemaObject {
    /// Names listed by the `required` keyword.
    pub fn required(&self) -> Option<&[String]> {
        self.required.as_deref()
    }

    /// Per-property schemas from the `properties` keyword.
    pub fn properties(&self) -> Option<&IndexMap<String, SchemaNode>> {
        self.properties.as_ref()
    }

    /// The `dependencies` constraint map.
    pub fn dependencies(&self) -> Option<&ConstraintMap> {
        self.dependencies.as_ref()
    }

    /// Keywords the compiler does not act on (`title`, `description`, ...).
    pub fn annotations(&self) -> &Map<String, Value> {
        &self.annotations
    }

    /// Returns true if the object holds the given recognised keyword.
    pub fn has_keyword(&self, keyword: &str) -> bool {
        match keyword {
            "required" => self.required.is_some(),
            "properties" => self.properties.is_some(),
            "dependencies" => self.dependencies.is_some(),
            _ => false,
        }
    }

    /// Returns true if any keyword in this object can produce a check.
    pub fn has_rules(&self) -> bool {
        self.required.is_some() || self.properties.is_some() || self.dependencies.is_some()
    }
}

/// Single-pass schema parser.
pub(crate) struct Parser {
    max_depth: usize,
}

impl Parser {
    pub(crate) fn node(
        &self,
        value: &Value,
        path: &JsonPointer,
        depth: usize,
    ) -> Result<SchemaNode, CompileError> {
        if depth > self.max_depth {
            return Err(CompileError::MaxDepthExceeded {
                path: path.clone(),
                max_depth: self.max_depth,
            });
        }

        match value {
            Value::Bool(b) => Ok(SchemaNode::Bool(*b)),
            Value::Object(map) => self.object(map, path, depth).map(SchemaNode::Object),
            other => Err(CompileError::InvalidSchema {
                path: path.clone(),
                found: JsonType::of(other),
            }),
        }
    }

    fn object(
        &self,
        map: &Map<String, Value>,
        path: &JsonPointer,
        depth: usize,
    ) -> Result<SchemaObject, CompileError> {
        let mut schema = SchemaObject::default();

        for (keyword, value) in map {
            let keyword_path = path.push_key(keyword);
            match keyword.as_str() {
                "required" => {
                    schema.required = Some(required_names(value, &keyword_path)?);
                }
                "properties" => {
                    let members = expect_object("properties", value, &keyword_path)?;
                    let mut properties = IndexMap::with_capacity(members.len());
                    for (name, sub) in members {
                        let node = self.node(sub, &keyword_path.push_key(name), depth + 1)?;
                        properties.insert(name.clone(), node);
                    }
                    schema.properties = Some(properties);
                }
                "dependencies" => {
                    let members = expect_object("dependencies", value, &keyword_path)?;
                    schema.dependencies =
                        Some(ConstraintMap::parse(self, members, &keyword_path, depth + 1)?);
                }
                _ => {
                    schema.annotations.insert(keyword.clone(), value.clone());
                }
            }
        }

        Ok(schema)
    }
}

fn expect_object<'v>(
    keyword: &'static str,
    value: &'v Value,
    path: &JsonPointer,
) -> Result<&'v Map<String, Value>, CompileError> {
    value.as_object().ok_or_else(|| CompileError::KeywordType {
        keyword,
        path: path.clone(),
        expected: JsonType::Object,
        found: JsonType::of(value),
    })
}

fn required_names(value: &Value, path: &JsonPointer) -> Result<Vec<String>, CompileError> {
    let items = value.as_array().ok_or_else(|| CompileError::KeywordType {
        keyword: "required",
        path: path.clone(),
        expected: JsonType::Array,
        found: JsonType::of(value),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| CompileError::KeywordType {
                    keyword: "required",
                    path: path.push_index(i),
                    expected: JsonType::String,
                    found: JsonType::of(item),
                })
        })
        .collect()
}
