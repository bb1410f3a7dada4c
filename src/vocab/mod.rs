//! Keywords understood by the compiler.
//!
//! Keywords of a schema object are compiled in the order of [`KEYWORDS`],
//! regardless of their order in the document.

pub mod dependencies;
pub mod missing;
pub mod properties;
pub mod required;

use crate::keyword::KeywordDefinition;

/// All supported keywords, in compilation order.
pub const KEYWORDS: &[KeywordDefinition] = &[required::DEF, dependencies::DEF, properties::DEF];
