//! Text rendering of generated code.
//!
//! The output is a JavaScript-like listing meant for debugging and tests. It
//! is not parsed back.

use std::fmt::{self, Display, Write};

use serde_json::Value;

use super::{Block, ErrorSite, Expr, ParamValue, Stmt};

const INDENT: &str = "  ";

fn quoted(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn needs_parens(expr: &Expr) -> bool {
    matches!(expr, Expr::And(_) | Expr::Or(_) | Expr::Bind { .. })
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr) -> fmt::Result {
    if needs_parens(expr) {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, exprs: &[Expr], op: &str, empty: &str) -> fmt::Result {
    if exprs.is_empty() {
        return f.write_str(empty);
    }
    for (i, expr) in exprs.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", op)?;
        }
        write_operand(f, expr)?;
    }
    Ok(())
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Undefined => f.write_str("undefined"),
            Expr::Bool(b) => write!(f, "{}", b),
            Expr::Str(s) => f.write_str(&quoted(s)),
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Not(inner) => {
                f.write_char('!')?;
                match inner.as_ref() {
                    Expr::HasProperty { .. } | Expr::IsType { .. } => write!(f, "({})", inner),
                    other => write_operand(f, other),
                }
            }
            Expr::And(exprs) => write_joined(f, exprs, "&&", "true"),
            Expr::Or(exprs) => write_joined(f, exprs, "||", "false"),
            Expr::IsType { data, ty } => write!(f, "typeof {} == {}", data, quoted(ty.as_str())),
            Expr::HasProperty {
                data,
                property,
                own,
            } => {
                let key = quoted(property);
                write!(f, "{}[{}] !== undefined", data, key)?;
                if *own {
                    write!(f, " && hasOwn({}, {})", data, key)?;
                }
                Ok(())
            }
            Expr::Bind { name, value } => write!(f, "{} = {}", name, value),
            Expr::ErrorCount => f.write_str("errors"),
            Expr::NoErrorsSince(name) => write!(f, "errors === {}", name),
        }
    }
}

fn write_site(out: &mut String, site: &ErrorSite) -> fmt::Result {
    write!(
        out,
        "report({}, {}, {}, {{",
        quoted(site.keyword),
        site.data,
        quoted(&site.schema_path.to_fragment())
    )?;
    for (i, (key, value)) in site.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        match value {
            ParamValue::Literal(v) => write!(out, "{}: {}", key, v)?,
            ParamValue::Var(name) => write!(out, "{}: {}", key, name)?,
        }
    }
    out.push_str("});");
    Ok(())
}

enum Pending<'b> {
    Stmt(&'b Stmt, usize),
    Line(String),
}

fn push_stmts<'b>(pending: &mut Vec<Pending<'b>>, stmts: &'b [Stmt], level: usize) {
    pending.extend(stmts.iter().rev().map(|stmt| Pending::Stmt(stmt, level)));
}

/// Writes statements, expanding conditionals through a work stack rather
/// than recursion.
fn write_stmts(out: &mut String, stmts: &[Stmt], level: usize) -> fmt::Result {
    let mut pending = Vec::new();
    push_stmts(&mut pending, stmts, level);

    while let Some(item) = pending.pop() {
        match item {
            Pending::Line(line) => out.push_str(&line),
            Pending::Stmt(
                Stmt::If {
                    cond,
                    then,
                    otherwise,
                },
                level,
            ) => {
                let pad = INDENT.repeat(level);
                writeln!(out, "{}if ({}) {{", pad, cond)?;
                pending.push(Pending::Line(format!("{}}}\n", pad)));
                if let Some(otherwise) = otherwise {
                    push_stmts(&mut pending, otherwise.stmts(), level + 1);
                    pending.push(Pending::Line(format!("{}}} else {{\n", pad)));
                }
                push_stmts(&mut pending, then.stmts(), level + 1);
            }
            Pending::Stmt(stmt, level) => write_simple(out, stmt, level)?,
        }
    }
    Ok(())
}

fn write_simple(out: &mut String, stmt: &Stmt, level: usize) -> fmt::Result {
    let pad = INDENT.repeat(level);
    match stmt {
        Stmt::Let {
            name,
            value: Expr::Undefined,
        } => writeln!(out, "{}let {};", pad, name),
        Stmt::Let { name, value } => writeln!(out, "{}let {} = {};", pad, name, value),
        Stmt::Assign { name, value } => writeln!(out, "{}{} = {};", pad, name, value),
        Stmt::BindData {
            name,
            parent,
            property,
        } => writeln!(out, "{}const {} = {}[{}];", pad, name, parent, quoted(property)),
        // Expanded by write_stmts.
        Stmt::If { .. } => Ok(()),
        Stmt::Report(site) => {
            out.push_str(&pad);
            write_site(out, site)?;
            out.push('\n');
            Ok(())
        }
        Stmt::Fail(site) => {
            out.push_str(&pad);
            write_site(out, site)?;
            out.push('\n');
            writeln!(out, "{}return false;", pad)
        }
        Stmt::Return(valid) => writeln!(out, "{}return {};", pad, valid),
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_stmts(&mut out, std::slice::from_ref(self), 0)?;
        f.write_str(&out)
    }
}

impl Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_stmts(&mut out, self.stmts(), 0)?;
        f.write_str(&out)
    }
}
