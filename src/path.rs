//! JSON Pointer paths for locating instance values and schema keywords.
//!
//! This module provides [`JsonPointer`] and [`PathSegment`]. The same type is
//! used for the instance path of an error (where in the data it happened) and
//! for its schema path (which keyword produced it).

use std::fmt::{self, Display};

/// A segment of a JSON Pointer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object member (e.g. `/user`)
    Key(String),
    /// An array element (e.g. `/0`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new key segment.
    pub fn key(name: impl Into<String>) -> Self {
        PathSegment::Key(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(name) => {
                for c in name.chars() {
                    match c {
                        '~' => write!(f, "~0")?,
                        '/' => write!(f, "~1")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                Ok(())
            }
            PathSegment::Index(idx) => write!(f, "{}", idx),
        }
    }
}

/// An RFC 6901 JSON Pointer.
///
/// Pointers are immutable; `push_key` and `push_index` return a new pointer.
/// The root pointer renders as the empty string.
///
/// # Example
///
/// ```rust
/// use depgen::JsonPointer;
///
/// let path = JsonPointer::root()
///     .push_key("dependencies")
///     .push_key("a/b");
///
/// assert_eq!(path.to_string(), "/dependencies/a~1b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPointer {
    segments: Vec<PathSegment>,
}

impl JsonPointer {
    /// Creates an empty pointer referring to the whole document.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new pointer with a key segment appended.
    pub fn push_key(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(name.into()));
        Self { segments }
    }

    /// Returns a new pointer with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this pointer refers to the whole document.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this pointer has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the last segment, or None for the root pointer.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Renders the pointer as a URI fragment (`#/dependencies/a`).
    pub fn to_fragment(&self) -> String {
        format!("#{}", self)
    }
}

impl Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for JsonPointer {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(PathSegment::key).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_renders_empty() {
        let path = JsonPointer::root();
        assert!(path.is_root());
        assert_eq!(path.len(), 0);
        assert_eq!(path.to_string(), "");
        assert_eq!(path.to_fragment(), "#");
    }

    #[test]
    fn test_nested_keys() {
        let path = JsonPointer::root().push_key("user").push_key("email");
        assert_eq!(path.to_string(), "/user/email");
    }

    #[test]
    fn test_key_with_index() {
        let path = JsonPointer::root().push_key("users").push_index(3);
        assert_eq!(path.to_string(), "/users/3");
        assert_eq!(path.last(), Some(&PathSegment::Index(3)));
    }

    #[test]
    fn test_escaping() {
        let path = JsonPointer::root().push_key("a~b").push_key("c/d");
        assert_eq!(path.to_string(), "/a~0b/c~1d");
    }

    #[test]
    fn test_immutability() {
        let base = JsonPointer::root().push_key("dependencies");
        let a = base.push_key("a");
        let b = base.push_key("b");

        assert_eq!(base.to_string(), "/dependencies");
        assert_eq!(a.to_string(), "/dependencies/a");
        assert_eq!(b.to_string(), "/dependencies/b");
    }

    #[test]
    fn test_from_iter() {
        let path: JsonPointer = ["properties", "user"].into_iter().collect();
        assert_eq!(path.to_fragment(), "#/properties/user");
    }
}
