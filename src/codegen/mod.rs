//! Code emission primitives.
//!
//! Keyword compilers do not build validators directly. They emit statements
//! into a [`CodeGen`] buffer, which produces a [`Block`] of generated code.
//! The block is executed by [`exec`](crate::exec) and can be printed through
//! its `Display` implementation for inspection.
//!
//! Conditionals are emitted with an open/else/close discipline so a keyword
//! can leave an `else` branch open and let the following checks nest inside
//! it. The compiler closes every block a keyword left open once its code has
//! been emitted.
//!
//! # Example
//!
//! ```rust
//! use depgen::codegen::{CodeGen, Expr, Name};
//!
//! let mut gen = CodeGen::new();
//! let valid = gen.name("valid");
//! gen.if_(Expr::HasProperty { data: Name::data(), property: "a".into(), own: false });
//! gen.assign(&valid, Expr::Bool(false));
//! gen.else_();
//! gen.assign(&valid, Expr::Bool(true));
//! gen.end_if();
//!
//! let code = gen.finish().unwrap();
//! assert_eq!(code.len(), 1);
//! assert!(code.to_string().contains("} else {"));
//! ```

mod expr;
mod render;

use std::collections::HashMap;
use std::fmt::{self, Display};

use serde_json::Value;

use crate::error::CompileError;
use crate::keyword::ErrorDescriptor;
use crate::path::JsonPointer;

pub use expr::Expr;

/// A variable or data reference in generated code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    /// The reference to the root instance value.
    pub fn data() -> Self {
        Name("data".to_string())
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A value placed into an error's parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Known at compile time.
    Literal(Value),
    /// Read from a variable when the error is reported.
    Var(Name),
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Literal(Value::String(s.to_string()))
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Literal(Value::String(s))
    }
}

impl From<usize> for ParamValue {
    fn from(n: usize) -> Self {
        ParamValue::Literal(Value::from(n))
    }
}

impl From<&Name> for ParamValue {
    fn from(name: &Name) -> Self {
        ParamValue::Var(name.clone())
    }
}

/// Everything needed to turn a failed check into a [`SchemaError`](crate::SchemaError).
#[derive(Debug, Clone)]
pub struct ErrorSite {
    /// Keyword reporting the error.
    pub keyword: &'static str,
    /// Data reference whose instance path the error carries.
    pub data: Name,
    /// Location of the keyword in the schema.
    pub schema_path: JsonPointer,
    /// Parameters in the order they were set.
    pub params: Vec<(String, ParamValue)>,
    /// Renders the message and the public parameters.
    pub descriptor: ErrorDescriptor,
}

/// A statement in generated code.
#[derive(Debug)]
pub enum Stmt {
    /// Declares a fresh variable.
    Let { name: Name, value: Expr },
    /// Overwrites a variable.
    Assign { name: Name, value: Expr },
    /// Binds a data reference to a property of another one.
    BindData {
        name: Name,
        parent: Name,
        property: String,
    },
    /// A conditional with an optional else branch.
    If {
        cond: Expr,
        then: Block,
        otherwise: Option<Block>,
    },
    /// Records an error and continues.
    Report(ErrorSite),
    /// Records an error and stops validation.
    Fail(ErrorSite),
    /// Stops validation.
    Return(bool),
}

/// A sequence of statements.
///
/// Stop-at-first chains nest one conditional per check, so a block can be
/// arbitrarily deep. Walking, dropping and printing blocks never recurse on
/// that depth.
#[derive(Default)]
pub struct Block {
    stmts: Vec<Stmt>,
}

impl Block {
    /// Returns the top-level statements.
    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    /// Number of top-level statements.
    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    /// Returns true if the block has no statements.
    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    /// Counts statements at any nesting level that satisfy `pred`.
    pub fn count_where(&self, pred: impl Fn(&Stmt) -> bool) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(block) = pending.pop() {
            for stmt in &block.stmts {
                count += usize::from(pred(stmt));
                if let Stmt::If {
                    then, otherwise, ..
                } = stmt
                {
                    pending.push(then);
                    pending.extend(otherwise.as_ref());
                }
            }
        }
        count
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("stmts", &self.stmts.len())
            .finish_non_exhaustive()
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.stmts);
        while let Some(stmt) = pending.pop() {
            if let Stmt::If {
                mut then,
                otherwise,
                ..
            } = stmt
            {
                pending.append(&mut then.stmts);
                if let Some(mut otherwise) = otherwise {
                    pending.append(&mut otherwise.stmts);
                }
            }
        }
    }
}

struct Frame {
    cond: Expr,
    then: Vec<Stmt>,
    otherwise: Option<Vec<Stmt>>,
}

/// Buffer that generated code is emitted into.
pub struct CodeGen {
    root: Vec<Stmt>,
    frames: Vec<Frame>,
    counters: HashMap<&'static str, usize>,
}

impl CodeGen {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        let mut counters = HashMap::new();
        // `data` itself is the root reference.
        counters.insert("data", 1);
        Self {
            root: Vec::new(),
            frames: Vec::new(),
            counters,
        }
    }

    /// Returns a fresh, unique name starting with `prefix`.
    pub fn name(&mut self, prefix: &'static str) -> Name {
        let counter = self.counters.entry(prefix).or_insert(0);
        let name = Name(format!("{}{}", prefix, counter));
        *counter += 1;
        name
    }

    /// Declares a fresh variable initialised to `value`.
    pub fn let_(&mut self, prefix: &'static str, value: Expr) -> Name {
        let name = self.name(prefix);
        self.push(Stmt::Let {
            name: name.clone(),
            value,
        });
        name
    }

    /// Declares a fresh variable without a value.
    pub fn declare(&mut self, prefix: &'static str) -> Name {
        self.let_(prefix, Expr::Undefined)
    }

    /// Assigns `value` to an existing name.
    pub fn assign(&mut self, name: &Name, value: Expr) {
        self.push(Stmt::Assign {
            name: name.clone(),
            value,
        });
    }

    /// Binds a fresh data reference to `parent[property]`.
    pub fn bind_data(&mut self, parent: &Name, property: &str) -> Name {
        let name = self.name("data");
        self.push(Stmt::BindData {
            name: name.clone(),
            parent: parent.clone(),
            property: property.to_string(),
        });
        name
    }

    /// Opens a conditional block.
    pub fn if_(&mut self, cond: Expr) {
        self.frames.push(Frame {
            cond,
            then: Vec::new(),
            otherwise: None,
        });
    }

    /// Switches the innermost open conditional to its else branch.
    pub fn else_(&mut self) {
        match self.frames.last_mut() {
            Some(frame) if frame.otherwise.is_none() => frame.otherwise = Some(Vec::new()),
            _ => debug_assert!(false, "else_ without an open if"),
        }
    }

    /// Closes the innermost open conditional.
    pub fn end_if(&mut self) {
        match self.frames.pop() {
            Some(frame) => self.push(Stmt::If {
                cond: frame.cond,
                then: Block { stmts: frame.then },
                otherwise: frame.otherwise.map(|stmts| Block { stmts }),
            }),
            None => debug_assert!(false, "end_if without an open if"),
        }
    }

    /// Number of currently open conditionals.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Closes open conditionals until `depth` remain.
    pub fn end_blocks(&mut self, depth: usize) {
        while self.frames.len() > depth {
            self.end_if();
        }
    }

    /// Appends a statement to the current block.
    pub fn push(&mut self, stmt: Stmt) {
        let target = match self.frames.last_mut() {
            Some(Frame {
                otherwise: Some(stmts),
                ..
            }) => stmts,
            Some(frame) => &mut frame.then,
            None => &mut self.root,
        };
        target.push(stmt);
    }

    /// Returns the generated code, failing if a conditional is still open.
    pub fn finish(self) -> Result<Block, CompileError> {
        if !self.frames.is_empty() {
            return Err(CompileError::UnclosedBlock(self.frames.len()));
        }
        Ok(Block { stmts: self.root })
    }
}

impl Default for CodeGen {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique_per_prefix() {
        let mut gen = CodeGen::new();
        assert_eq!(gen.name("valid").as_str(), "valid0");
        assert_eq!(gen.name("valid").as_str(), "valid1");
        assert_eq!(gen.name("missing").as_str(), "missing0");
        assert_eq!(gen.name("data").as_str(), "data1");
    }

    #[test]
    fn test_statements_land_in_open_branch() {
        let mut gen = CodeGen::new();
        let v = gen.name("valid");
        gen.if_(Expr::Bool(true));
        gen.assign(&v, Expr::Bool(true));
        gen.else_();
        gen.assign(&v, Expr::Bool(false));
        gen.assign(&v, Expr::Bool(false));
        gen.end_if();

        let code = gen.finish().unwrap();
        match &code.stmts()[0] {
            Stmt::If {
                then, otherwise, ..
            } => {
                assert_eq!(then.len(), 1);
                assert_eq!(otherwise.as_ref().map(Block::len), Some(2));
            }
            other => panic!("expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_end_blocks_closes_nested_else_chain() {
        let mut gen = CodeGen::new();
        let start = gen.depth();
        for _ in 0..3 {
            gen.if_(Expr::Bool(false));
            gen.push(Stmt::Return(false));
            gen.else_();
        }
        assert_eq!(gen.depth(), 3);
        gen.end_blocks(start);

        let code = gen.finish().unwrap();
        assert_eq!(code.len(), 1);
        assert_eq!(code.count_where(|s| matches!(s, Stmt::If { .. })), 3);
        assert_eq!(code.count_where(|s| matches!(s, Stmt::Return(_))), 3);
    }

    #[test]
    fn test_deep_else_chain_is_walked_and_dropped() {
        let mut gen = CodeGen::new();
        for _ in 0..50_000 {
            gen.if_(Expr::Bool(false));
            gen.push(Stmt::Return(false));
            gen.else_();
        }
        gen.end_blocks(0);

        let code = gen.finish().unwrap();
        assert_eq!(code.count_where(|s| matches!(s, Stmt::Return(_))), 50_000);
        drop(code);
    }

    #[test]
    fn test_finish_rejects_open_block() {
        let mut gen = CodeGen::new();
        gen.if_(Expr::Bool(true));
        assert_eq!(gen.finish().unwrap_err(), CompileError::UnclosedBlock(1));
    }
}
