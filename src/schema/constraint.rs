//! The `dependencies` constraint map.

use serde_json::{Map, Value};

use crate::error::CompileError;
use crate::path::JsonPointer;

use super::{JsonType, Parser, SchemaNode};

/// The value attached to one trigger property.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintValue {
    /// Properties that must be present alongside the trigger.
    RequiredList(Vec<String>),
    /// A schema the whole instance must satisfy when the trigger is present.
    EmbeddedSchema(SchemaNode),
}

/// The parsed `dependencies` object, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConstraintMap {
    entries: Vec<(String, ConstraintValue)>,
}

impl ConstraintMap {
    pub(super) fn parse(
        parser: &Parser,
        members: &Map<String, Value>,
        path: &JsonPointer,
        depth: usize,
    ) -> Result<Self, CompileError> {
        let mut entries = Vec::with_capacity(members.len());

        for (property, value) in members {
            let entry_path = path.push_key(property);
            let constraint = match value {
                Value::Array(items) => {
                    ConstraintValue::RequiredList(dependency_names(property, items, &entry_path)?)
                }
                Value::Object(_) | Value::Bool(_) => {
                    ConstraintValue::EmbeddedSchema(parser.node(value, &entry_path, depth)?)
                }
                other => {
                    return Err(CompileError::InvalidDependency {
                        property: property.clone(),
                        path: entry_path,
                        found: JsonType::of(other),
                    })
                }
            };
            entries.push((property.clone(), constraint));
        }

        Ok(Self { entries })
    }

    /// Iterates over `(trigger, constraint)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConstraintValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over trigger names in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Looks up the constraint for a trigger.
    pub fn get(&self, key: &str) -> Option<&ConstraintValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ConstraintValue)> for ConstraintMap {
    fn from_iter<I: IntoIterator<Item = (String, ConstraintValue)>>(iter: I) -> Self {
        let mut entries: Vec<(String, ConstraintValue)> = Vec::new();
        for (key, value) in iter {
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => entries.push((key, value)),
            }
        }
        Self { entries }
    }
}

fn dependency_names(
    property: &str,
    items: &[Value],
    path: &JsonPointer,
) -> Result<Vec<String>, CompileError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| CompileError::InvalidDependency {
                    property: property.to_string(),
                    path: path.push_index(i),
                    found: JsonType::of(item),
                })
        })
        .collect()
}
